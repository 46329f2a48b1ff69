use anyhow::Context;
use bookshelf_csv::csv_processor::{read_table, write_table, CsvTable};
use bookshelf_csv::utils::init_tracing;
use bookshelf_csv::{compare, compare_libraries, AppConfig, LibraryColumns};
use clap::Parser;
use std::path::PathBuf;

/// Extract the books in a new library export that are missing from an existing one.
#[derive(Parser)]
#[command(name = "compare", version)]
struct Args {
    /// New CSV file (source of potential new entries)
    new_file: PathBuf,

    /// Existing CSV file (entries to filter out)
    existing_file: PathBuf,

    /// Where to write the unique entries
    output_file: PathBuf,

    /// Match on exactly these columns instead of detecting title/author/ISBN
    #[arg(long = "key", value_name = "COLUMN")]
    keys: Vec<String>,

    /// Log headers and leading rows of both inputs
    #[arg(long)]
    debug: bool,

    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load_or_default(args.config.as_deref())?;
    init_tracing(&config.logging, args.verbose || args.debug);

    let new = read_table(&args.new_file)?;
    let existing = read_table(&args.existing_file)?;

    if args.debug {
        preview(&new);
        preview(&existing);
    }

    let unique = if args.keys.is_empty() {
        compare_libraries(&new, &existing, &LibraryColumns::from(&config.compare))?
    } else {
        compare(&new, &existing, args.keys.as_slice())?
    };

    write_table(&args.output_file, &unique)
        .with_context(|| format!("writing {}", args.output_file.display()))?;

    println!(
        "Comparison complete! Found {} books in '{}' that aren't in '{}'",
        unique.row_count(),
        args.new_file.display(),
        args.existing_file.display()
    );
    println!("Unique books saved to '{}'", args.output_file.display());
    Ok(())
}

fn preview(table: &CsvTable) {
    tracing::debug!(table = %table.name(), headers = ?table.headers(), "Headers");
    for (i, row) in table.rows().iter().take(3).enumerate() {
        tracing::debug!(table = %table.name(), row = i + 1, values = ?row.values(), "Sample row");
    }
}
