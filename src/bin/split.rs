use anyhow::Context;
use bookshelf_csv::csv_processor::{partition, read_table, ChunkSpec, OutputBatch};
use bookshelf_csv::utils::init_tracing;
use bookshelf_csv::{AppConfig, BookshelfError};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Split a large CSV file into smaller files, by row count or by shelf.
#[derive(Parser)]
#[command(name = "split", version)]
struct Args {
    /// Input CSV file
    input_file: PathBuf,

    /// Prefix for output files, placed next to the input (default: input file stem)
    output_prefix: Option<String>,

    /// Rows per output file (default from config, 50)
    #[arg(long, value_name = "N", allow_negative_numbers = true, conflicts_with = "by_status")]
    chunk_size: Option<i64>,

    /// Write one file per status value instead of fixed-size chunks
    #[arg(long)]
    by_status: bool,

    /// Column holding the status (default from config, "Exclusive Shelf")
    #[arg(long, value_name = "NAME", requires = "by_status")]
    status_column: Option<String>,

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

    let spec = if args.by_status {
        ChunkSpec::ByColumn(
            args.status_column
                .clone()
                .unwrap_or_else(|| config.split.status_column.clone()),
        )
    } else {
        let size = match args.chunk_size {
            Some(n) => usize::try_from(n).map_err(|_| {
                BookshelfError::InvalidArgument(format!(
                    "chunk size must be a positive integer, got {n}"
                ))
            })?,
            None => config.split.default_chunk_size,
        };
        ChunkSpec::Count(size)
    };

    let table = read_table(&args.input_file)?;
    let parts = partition(&table, &spec, &config.split.unknown_group)?;

    let prefix = match &args.output_prefix {
        Some(prefix) => prefix.clone(),
        None => default_prefix(&args.input_file)?,
    };
    let output_dir = match args.input_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    match &spec {
        ChunkSpec::Count(size) => println!(
            "Splitting {} ({} rows) into {} files with {} rows each.",
            args.input_file.display(),
            table.row_count(),
            parts.len(),
            size
        ),
        ChunkSpec::ByColumn(column) => println!(
            "Splitting {} ({} rows) by '{}' into {} files.",
            args.input_file.display(),
            table.row_count(),
            column,
            parts.len()
        ),
    }

    let mut batch = OutputBatch::new();
    for (suffix, part) in &parts {
        let path = output_dir.join(format!("{prefix}_{suffix}.csv"));
        batch
            .stage(&path, part)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    for file in batch.commit()? {
        println!("  {}: {} books", file.path.display(), file.rows);
    }
    Ok(())
}

fn default_prefix(input: &Path) -> anyhow::Result<String> {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| {
            BookshelfError::InvalidArgument(format!(
                "cannot derive an output prefix from {}",
                input.display()
            ))
            .into()
        })
}
