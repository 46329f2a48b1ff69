use crate::utils::{BookshelfError, Result};
use std::collections::HashMap;

/// One record, positionally aligned with the owning table's header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Header plus ordered rows. Every row has exactly one value per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    name: String,
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Row>,
}

impl CsvTable {
    /// Builds a table from a header and raw records. Short records are padded
    /// with empty strings; long ones are truncated.
    pub fn new(
        name: impl Into<String>,
        headers: Vec<String>,
        records: Vec<Vec<String>>,
    ) -> Result<Self> {
        let name = name.into();
        let mut index = HashMap::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            if index.insert(header.clone(), i).is_some() {
                return Err(BookshelfError::DuplicateColumn {
                    column: header.clone(),
                    table: name,
                });
            }
        }

        let width = headers.len();
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, mut values)| {
                if values.len() > width {
                    tracing::warn!(
                        table = %name,
                        row = i + 1,
                        extra = values.len() - width,
                        "Dropping fields beyond the header width"
                    );
                }
                values.resize(width, String::new());
                Row::new(values)
            })
            .collect();

        Ok(Self {
            name,
            headers,
            index,
            rows,
        })
    }

    /// A table sharing this one's name and header but holding other rows.
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            name: self.name.clone(),
            headers: self.headers.clone(),
            index: self.index.clone(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| BookshelfError::missing_column(column, self.name.clone()))
    }

    /// First of `candidates` present in the header.
    pub fn find_column<S: AsRef<str>>(&self, candidates: &[S]) -> Option<(usize, &str)> {
        candidates.iter().find_map(|candidate| {
            let candidate = candidate.as_ref();
            self.column_index(candidate)
                .map(|i| (i, self.headers[i].as_str()))
        })
    }

    pub fn value<'a>(&self, row: &'a Row, column: &str) -> Option<&'a str> {
        self.column_index(column).map(|i| row.get(i))
    }
}
