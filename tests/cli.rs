use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(bin: &str, dir: &Path, args: &[&str]) -> Output {
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn binary")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn compare_writes_unique_rows() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("existing.csv"), "Title,Authors\nDune,Frank Herbert\n").unwrap();
    fs::write(
        dir.path().join("new.csv"),
        "Title,Author\nDune,Frank Herbert\nNeuromancer,William Gibson\n",
    )
    .unwrap();

    let out = run(
        env!("CARGO_BIN_EXE_compare"),
        dir.path(),
        &["new.csv", "existing.csv", "unique.csv"],
    );
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(
        fs::read_to_string(dir.path().join("unique.csv")).unwrap(),
        "Title,Author\nNeuromancer,William Gibson\n"
    );
}

#[test]
fn compare_reports_missing_key_column() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "title\nDune\n").unwrap();
    fs::write(dir.path().join("b.csv"), "title\nDune\n").unwrap();

    let out = run(
        env!("CARGO_BIN_EXE_compare"),
        dir.path(),
        &["a.csv", "b.csv", "out.csv", "--key", "title", "--key", "author"],
    );
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Missing column 'author'"));
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn compare_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "title\nDune\n").unwrap();

    let out = run(
        env!("CARGO_BIN_EXE_compare"),
        dir.path(),
        &["a.csv", "absent.csv", "out.csv"],
    );
    assert!(!out.status.success());
    assert!(stderr(&out).contains("File not found: absent.csv"));
}

#[test]
fn split_defaults_to_fifty_row_chunks() {
    let dir = TempDir::new().unwrap();
    let mut csv = String::from("Title\n");
    for i in 0..120 {
        csv.push_str(&format!("Book {i}\n"));
    }
    fs::write(dir.path().join("library.csv"), csv).unwrap();

    let out = run(env!("CARGO_BIN_EXE_split"), dir.path(), &["library.csv", "part"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let lines = |n: usize| {
        fs::read_to_string(dir.path().join(format!("part_{n}.csv")))
            .unwrap()
            .lines()
            .count()
    };
    assert_eq!((lines(1), lines(2), lines(3)), (51, 51, 21));
    assert!(!dir.path().join("part_4.csv").exists());
}

#[test]
fn split_rejects_bad_chunk_size() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("library.csv"), "Title\nDune\n").unwrap();

    for size in ["0", "-5"] {
        let out = run(
            env!("CARGO_BIN_EXE_split"),
            dir.path(),
            &["library.csv", "--chunk-size", size],
        );
        assert!(!out.status.success());
        assert!(stderr(&out).contains("chunk size must be a positive integer"));
    }
}

#[test]
fn split_modes_are_exclusive() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("library.csv"), "Title\nDune\n").unwrap();

    let out = run(
        env!("CARGO_BIN_EXE_split"),
        dir.path(),
        &["library.csv", "--chunk-size", "5", "--by-status"],
    );
    assert!(!out.status.success());
}

#[test]
fn status_column_requires_by_status() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("library.csv"), "Title,Shelf\nDune,read\n").unwrap();

    let out = run(
        env!("CARGO_BIN_EXE_split"),
        dir.path(),
        &["library.csv", "--status-column", "Shelf"],
    );
    assert!(!out.status.success());
    assert!(!dir.path().join("library_1.csv").exists());
}

#[test]
fn split_by_status_names_files_after_shelves() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("goodreads.csv"),
        "Title,Exclusive Shelf\nDune,read\nEmma,to-read\nUbik,Read \nOdd,\n",
    )
    .unwrap();

    let out = run(
        env!("CARGO_BIN_EXE_split"),
        dir.path(),
        &["goodreads.csv", "--by-status"],
    );
    assert!(out.status.success(), "{}", stderr(&out));

    let read = fs::read_to_string(dir.path().join("goodreads_read.csv")).unwrap();
    assert_eq!(read.lines().count(), 3);
    assert!(dir.path().join("goodreads_to-read.csv").exists());
    assert!(dir.path().join("goodreads_unknown.csv").exists());
}

#[test]
fn split_by_status_needs_status_column() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("plain.csv"), "Title\nDune\n").unwrap();

    let out = run(
        env!("CARGO_BIN_EXE_split"),
        dir.path(),
        &["plain.csv", "--by-status"],
    );
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Missing column 'Exclusive Shelf'"));
}

#[test]
fn convert_produces_goodreads_header() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("storygraph.csv"),
        "Title,Authors,Read Status,Date Added\nDune,Frank Herbert,read,2024-01-05\n",
    )
    .unwrap();

    let out = run(
        env!("CARGO_BIN_EXE_convert"),
        dir.path(),
        &["storygraph.csv", "goodreads.csv"],
    );
    assert!(out.status.success(), "{}", stderr(&out));

    let converted = fs::read_to_string(dir.path().join("goodreads.csv")).unwrap();
    let mut lines = converted.lines();
    assert!(lines.next().unwrap().starts_with("Book Id,Title,Author,Author l-f,"));
    let row = lines.next().unwrap();
    assert!(row.contains("Herbert, Frank"));
    assert!(row.contains("2024/01/05"));
    assert!(row.contains("read (#1)"));
    assert!(String::from_utf8_lossy(&out.stdout).contains("read: 1 books"));
}

#[test]
fn convert_rejects_foreign_schema() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("other.csv"), "Name,Writer\nDune,Frank Herbert\n").unwrap();

    let out = run(
        env!("CARGO_BIN_EXE_convert"),
        dir.path(),
        &["other.csv", "goodreads.csv"],
    );
    assert!(!out.status.success());
    assert!(stderr(&out).contains("does not look like a StoryGraph export"));
    assert!(!dir.path().join("goodreads.csv").exists());
}

#[test]
fn convert_rejects_bad_date_format_in_config() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("storygraph.csv"),
        "Title,Authors,Date Added\nDune,Frank Herbert,2024-01-05\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("bookshelf.toml"),
        "[convert]\ndate_format = \"%Q\"\n",
    )
    .unwrap();

    let out = run(
        env!("CARGO_BIN_EXE_convert"),
        dir.path(),
        &["storygraph.csv", "goodreads.csv"],
    );
    assert!(!out.status.success());
    assert!(stderr(&out).contains("invalid date format '%Q'"), "{}", stderr(&out));
    assert!(!stderr(&out).contains("panicked"));
    assert!(!dir.path().join("goodreads.csv").exists());
}
