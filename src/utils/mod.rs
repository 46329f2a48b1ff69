pub mod config;
pub mod errors;
pub mod logging;

pub use config::{AppConfig, CompareConfig, ConvertConfig, LoggingConfig, SplitConfig};
pub use errors::{BookshelfError, Result};
pub use logging::init_tracing;

/// Lower-cases, trims and joins internal whitespace runs with `-`, so
/// `"Currently Reading "` and `"currently-reading"` compare equal.
pub fn normalize_label(value: &str) -> String {
    value
        .split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
