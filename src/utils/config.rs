use crate::utils::errors::{BookshelfError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "bookshelf.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub compare: CompareConfig,
    pub split: SplitConfig,
    pub convert: ConvertConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

/// Header candidates used to locate the identity columns of a library export.
/// The first candidate present in a header wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    pub title_columns: Vec<String>,
    pub author_columns: Vec<String>,
    pub isbn_columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub default_chunk_size: usize,
    pub status_column: String,
    pub unknown_group: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub date_format: String,
    /// Falls back to the current date when unset.
    pub default_date_added: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            title_columns: strings(&["Title", "title"]),
            author_columns: strings(&["Authors", "Author", "authors", "author"]),
            isbn_columns: strings(&["ISBN/UID", "ISBN", "isbn", "ISBN13", "isbn13"]),
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            default_chunk_size: 50,
            status_column: "Exclusive Shelf".to_string(),
            unknown_group: "unknown".to_string(),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y/%m/%d".to_string(),
            default_date_added: None,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BookshelfError::ConfigError(format!("{}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| BookshelfError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// An explicit path must load. Without one, `bookshelf.toml` is used if it
    /// exists and built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
