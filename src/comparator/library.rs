use crate::comparator::{keep_unknown_rows, normalize_value, IdentityKey};
use crate::csv_processor::{CsvTable, Row};
use crate::utils::{BookshelfError, CompareConfig, Result};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LibraryColumns {
    pub title: Vec<String>,
    pub author: Vec<String>,
    pub isbn: Vec<String>,
}

impl Default for LibraryColumns {
    fn default() -> Self {
        Self::from(&CompareConfig::default())
    }
}

impl From<&CompareConfig> for LibraryColumns {
    fn from(config: &CompareConfig) -> Self {
        Self {
            title: config.title_columns.clone(),
            author: config.author_columns.clone(),
            isbn: config.isbn_columns.clone(),
        }
    }
}

struct Detected {
    title: usize,
    author: Option<usize>,
    isbn: Option<usize>,
}

impl Detected {
    fn detect(table: &CsvTable, columns: &LibraryColumns) -> Result<Self> {
        let (title, _) = table.find_column(columns.title.as_slice()).ok_or_else(|| {
            let wanted = columns.title.first().cloned().unwrap_or_else(|| "Title".to_string());
            BookshelfError::missing_column(wanted, table.name())
        })?;
        let author = table.find_column(columns.author.as_slice()).map(|(i, _)| i);
        let isbn = table.find_column(columns.isbn.as_slice()).map(|(i, _)| i);

        tracing::debug!(
            table = %table.name(),
            title = %table.headers()[title],
            author = ?author.map(|i| table.headers()[i].as_str()),
            isbn = ?isbn.map(|i| table.headers()[i].as_str()),
            "Detected identity columns"
        );
        Ok(Self { title, author, isbn })
    }

    fn parts(&self, row: &Row) -> (String, String, String) {
        let title = normalize_value(row.get(self.title));
        let author = self
            .author
            .map(|i| normalize_value(row.get(i)))
            .unwrap_or_default();
        let isbn = self.isbn.map(|i| normalize_isbn(row.get(i))).unwrap_or_default();
        (title, author, isbn)
    }

    /// Keys an existing row registers.
    fn known_keys(&self, row: &Row) -> Vec<IdentityKey> {
        let (title, author, isbn) = self.parts(row);
        let mut keys = Vec::with_capacity(2);
        if !isbn.is_empty() {
            keys.push(IdentityKey::tagged("isbn", &isbn));
        }
        if author.is_empty() {
            keys.push(IdentityKey::tagged("title", &title));
        } else {
            keys.push(IdentityKey::tagged("title+author", &format!("{title}|{author}")));
        }
        keys
    }

    /// Keys a new row is looked up by.
    fn probe_keys(&self, row: &Row) -> Vec<IdentityKey> {
        let (title, author, isbn) = self.parts(row);
        let mut keys = Vec::with_capacity(3);
        if !isbn.is_empty() {
            keys.push(IdentityKey::tagged("isbn", &isbn));
        }
        if !author.is_empty() {
            keys.push(IdentityKey::tagged("title+author", &format!("{title}|{author}")));
        }
        keys.push(IdentityKey::tagged("title", &title));
        keys
    }
}

/// Strips hyphens and the spreadsheet `="..."` wrapping around ISBNs.
pub fn normalize_isbn(value: &str) -> String {
    value
        .trim()
        .replace('-', "")
        .replace("=\"", "")
        .replace('"', "")
}

pub fn compare_libraries(
    new_table: &CsvTable,
    existing_table: &CsvTable,
    columns: &LibraryColumns,
) -> Result<CsvTable> {
    let existing = Detected::detect(existing_table, columns)?;
    let new = Detected::detect(new_table, columns)?;

    let known: HashSet<IdentityKey> = existing_table
        .rows()
        .iter()
        .flat_map(|row| existing.known_keys(row))
        .collect();

    let result = keep_unknown_rows(new_table, &known, |row| new.probe_keys(row));

    tracing::info!(
        new = new_table.row_count(),
        existing = existing_table.row_count(),
        unique = result.row_count(),
        "Library comparison complete"
    );
    Ok(result)
}
