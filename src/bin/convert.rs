use anyhow::Context;
use bookshelf_csv::csv_processor::{read_table, write_table, CsvTable};
use bookshelf_csv::mapping::goodreads::{shelf_vocabulary, SHELF_COLUMN, STATUS_SOURCE};
use bookshelf_csv::mapping::{remap_with_report, storygraph_to_goodreads, ValueTranslation};
use bookshelf_csv::utils::init_tracing;
use bookshelf_csv::AppConfig;
use clap::Parser;
use std::path::PathBuf;

const PREVIEW_ROWS: usize = 5;

/// Convert a StoryGraph CSV export to the Goodreads import format.
#[derive(Parser)]
#[command(name = "convert", version)]
struct Args {
    /// StoryGraph CSV export
    storygraph_file: PathBuf,

    /// Output Goodreads-compatible CSV
    goodreads_file: PathBuf,

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
    init_tracing(&config.logging, args.verbose);

    let source = read_table(&args.storygraph_file)?;
    let mapping = storygraph_to_goodreads(&config.convert)?;
    mapping
        .check_source(&source)
        .context("source file does not look like a StoryGraph export")?;

    preview_statuses(&source);

    let (converted, report) = remap_with_report(&source, &mapping)?;
    write_table(&args.goodreads_file, &converted)
        .with_context(|| format!("writing {}", args.goodreads_file.display()))?;

    println!(
        "Conversion complete! Goodreads-compatible file saved to {}",
        args.goodreads_file.display()
    );
    print_summary(&converted);

    if !report.is_clean() {
        println!(
            "\n{} values could not be translated and were kept unchanged (run with -v for details).",
            report.untranslated.len()
        );
    }
    Ok(())
}

fn preview_statuses(source: &CsvTable) {
    let Some(column) = source.column_index(STATUS_SOURCE) else {
        tracing::debug!("No '{}' column, every book defaults to to-read", STATUS_SOURCE);
        return;
    };
    let translation = ValueTranslation::Status(shelf_vocabulary());
    for (i, row) in source.rows().iter().take(PREVIEW_ROWS).enumerate() {
        let raw = row.get(column);
        tracing::debug!(
            row = i + 1,
            status = raw,
            shelf = translation.apply(raw).as_deref().unwrap_or("<unchanged>"),
            "Read Status preview"
        );
    }
}

fn print_summary(converted: &CsvTable) {
    let Some(column) = converted.column_index(SHELF_COLUMN) else {
        return;
    };

    let mut counts: Vec<(String, usize)> = ["read", "to-read", "currently-reading"]
        .iter()
        .map(|s| (s.to_string(), 0))
        .collect();
    for row in converted.rows() {
        let shelf = row.get(column);
        match counts.iter_mut().find(|(name, _)| name == shelf) {
            Some((_, count)) => *count += 1,
            None => counts.push((shelf.to_string(), 1)),
        }
    }

    println!("\nSummary of converted books by status:");
    for (shelf, count) in counts.iter().filter(|(_, count)| *count > 0) {
        println!("  {shelf}: {count} books");
    }
}
