//! Finds rows of one export that are absent from another.
//!
//! `compare` matches on an explicit list of key columns. `compare_libraries`
//! detects title, author and ISBN columns per file and treats a row as known
//! when any of its identity keys already appears in the existing library.

pub mod library;

pub use library::{compare_libraries, LibraryColumns};

use crate::csv_processor::{CsvTable, Row};
use crate::utils::Result;
use std::collections::HashSet;

/// Normalized composite identity of a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let parts: Vec<String> = values.into_iter().map(normalize_value).collect();
        Self(parts.join("|"))
    }

    pub fn tagged(kind: &str, value: &str) -> Self {
        Self(format!("{kind}:{value}"))
    }
}

pub fn normalize_value(value: &str) -> String {
    value.trim().to_lowercase()
}

pub(crate) fn keep_unknown_rows<F>(
    new_table: &CsvTable,
    known: &HashSet<IdentityKey>,
    keys_of: F,
) -> CsvTable
where
    F: Fn(&Row) -> Vec<IdentityKey>,
{
    let rows: Vec<Row> = new_table
        .rows()
        .iter()
        .filter(|row| !keys_of(row).iter().any(|key| known.contains(key)))
        .cloned()
        .collect();
    new_table.with_rows(rows)
}

/// Rows of `new_table` whose key over `key_columns` does not occur in
/// `existing_table`, in their original order.
pub fn compare<S: AsRef<str>>(
    new_table: &CsvTable,
    existing_table: &CsvTable,
    key_columns: &[S],
) -> Result<CsvTable> {
    let new_columns = resolve_columns(new_table, key_columns)?;
    let existing_columns = resolve_columns(existing_table, key_columns)?;

    let known: HashSet<IdentityKey> = existing_table
        .rows()
        .iter()
        .map(|row| row_key(row, &existing_columns))
        .collect();

    let result = keep_unknown_rows(new_table, &known, |row| vec![row_key(row, &new_columns)]);

    tracing::info!(
        new = new_table.row_count(),
        existing = existing_table.row_count(),
        unique = result.row_count(),
        "Comparison complete"
    );
    Ok(result)
}

fn resolve_columns<S: AsRef<str>>(table: &CsvTable, key_columns: &[S]) -> Result<Vec<usize>> {
    key_columns
        .iter()
        .map(|column| table.require_column(column.as_ref()))
        .collect()
}

fn row_key(row: &Row, columns: &[usize]) -> IdentityKey {
    IdentityKey::from_values(columns.iter().map(|&i| row.get(i)))
}
