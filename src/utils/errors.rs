use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookshelfError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Missing column '{column}' in {table}")]
    MissingColumn { column: String, table: String },

    #[error("Duplicate column '{column}' in {table}")]
    DuplicateColumn { column: String, table: String },

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl BookshelfError {
    pub fn missing_column(column: impl Into<String>, table: impl Into<String>) -> Self {
        BookshelfError::MissingColumn {
            column: column.into(),
            table: table.into(),
        }
    }

    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            BookshelfError::MissingColumn { .. }
                | BookshelfError::DuplicateColumn { .. }
                | BookshelfError::SchemaMismatch(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BookshelfError>;
