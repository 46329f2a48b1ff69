use crate::utils::{normalize_label, BookshelfError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt::Write;

const INPUT_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%B %d, %Y", "%Y/%m/%d"];

const TRUTHY: [&str; 4] = ["yes", "true", "y", "1"];
const FALSY: [&str; 4] = ["no", "false", "n", "0"];

/// Lookup from normalized source status to target status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusVocabulary {
    entries: HashMap<String, String>,
}

impl StatusVocabulary {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (normalize_label(k.as_ref()), v.into()))
                .collect(),
        }
    }

    pub fn lookup(&self, value: &str) -> Option<&str> {
        self.entries.get(&normalize_label(value)).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsbnKind {
    Isbn10,
    Isbn13,
}

impl IsbnKind {
    fn digits(self) -> usize {
        match self {
            IsbnKind::Isbn10 => 10,
            IsbnKind::Isbn13 => 13,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueTranslation {
    Status(StatusVocabulary),
    /// Status rendered as a Goodreads shelf position, `read (#1)`.
    ShelfPosition(StatusVocabulary),
    Date { output_format: String },
    Rating,
    Isbn(IsbnKind),
    AuthorLastFirst,
    Count,
    Flag,
}

impl ValueTranslation {
    /// `None` means the value is outside what this translation understands.
    pub fn apply(&self, raw: &str) -> Option<String> {
        let value = raw.trim();
        match self {
            ValueTranslation::Status(vocabulary) => vocabulary.lookup(value).map(str::to_string),
            ValueTranslation::ShelfPosition(vocabulary) => {
                vocabulary.lookup(value).map(|status| format!("{status} (#1)"))
            }
            ValueTranslation::Date { output_format } => {
                let date = parse_date(value)?;
                let mut out = String::new();
                write!(out, "{}", date.format(output_format)).ok()?;
                Some(out)
            }
            ValueTranslation::Rating => parse_rating(value),
            ValueTranslation::Isbn(kind) => Some(format_isbn(value, *kind)),
            ValueTranslation::AuthorLastFirst => Some(author_last_first(value)),
            ValueTranslation::Count => parse_count(value),
            ValueTranslation::Flag => {
                let lower = value.to_lowercase();
                if TRUTHY.contains(&lower.as_str()) {
                    Some("1".to_string())
                } else if FALSY.contains(&lower.as_str()) {
                    Some("0".to_string())
                } else {
                    None
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueTranslation::Status(_) => "status",
            ValueTranslation::ShelfPosition(_) => "shelf position",
            ValueTranslation::Date { .. } => "date",
            ValueTranslation::Rating => "rating",
            ValueTranslation::Isbn(_) => "isbn",
            ValueTranslation::AuthorLastFirst => "author last-first",
            ValueTranslation::Count => "count",
            ValueTranslation::Flag => "flag",
        }
    }
}

/// Rejects strftime patterns chrono cannot render, such as `%Q`.
pub fn check_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(BookshelfError::ConfigError(format!(
            "invalid date format '{format}'"
        )));
    }
    Ok(())
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    INPUT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Whole stars; `4.5 stars` becomes `4`.
fn parse_rating(value: &str) -> Option<String> {
    let number = value.split_whitespace().next()?;
    let stars: f64 = number.parse().ok()?;
    if !stars.is_finite() || stars < 0.0 {
        return None;
    }
    Some((stars.trunc() as u32).to_string())
}

fn parse_count(value: &str) -> Option<String> {
    let count: f64 = value.parse().ok()?;
    if !count.is_finite() {
        return None;
    }
    Some((count.trunc().max(0.0) as u64).to_string())
}

/// Goodreads keeps ISBNs as `="..."` so spreadsheets do not mangle them.
fn format_isbn(value: &str, kind: IsbnKind) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == kind.digits() {
        format!("=\"{digits}\"")
    } else {
        "=\"\"".to_string()
    }
}

fn author_last_first(value: &str) -> String {
    let first_author = value.split(',').next().unwrap_or("").trim();
    let mut names: Vec<&str> = first_author.split_whitespace().collect();
    match names.pop() {
        Some(last) if !names.is_empty() => format!("{last}, {}", names.join(" ")),
        Some(last) => last.to_string(),
        None => String::new(),
    }
}
