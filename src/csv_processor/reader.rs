use crate::csv_processor::table::CsvTable;
use crate::utils::{BookshelfError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// Reads a whole CSV file into memory.
pub fn read_table(path: impl AsRef<Path>) -> Result<CsvTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BookshelfError::FileNotFound(path.to_path_buf()),
        _ => BookshelfError::IoError(e),
    })?;

    let table = read_table_from(file, path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.headers().len(),
        "Loaded CSV"
    );
    Ok(table)
}

pub fn read_table_from<R: Read>(reader: R, name: impl Into<String>) -> Result<CsvTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches(UTF8_BOM).to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(record.iter().map(|s| s.to_string()).collect());
    }

    CsvTable::new(name, headers, records)
}
