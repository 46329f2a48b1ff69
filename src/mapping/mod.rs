pub mod goodreads;
pub mod translate;

pub use goodreads::storygraph_to_goodreads;
pub use translate::{check_date_format, IsbnKind, StatusVocabulary, ValueTranslation};

use crate::csv_processor::{CsvTable, Row};
use crate::utils::{BookshelfError, Result};

/// One output column: where its value comes from and how it is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    target: String,
    source: Option<String>,
    default: Option<String>,
    translation: Option<ValueTranslation>,
}

impl ColumnMapping {
    pub fn renamed(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: Some(source.into()),
            default: None,
            translation: None,
        }
    }

    pub fn same(column: impl Into<String>) -> Self {
        let column = column.into();
        Self::renamed(column.clone(), column)
    }

    pub fn constant(target: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: None,
            default: Some(value.into()),
            translation: None,
        }
    }

    /// Used when the source column is absent or the cell is blank.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_translation(mut self, translation: ValueTranslation) -> Self {
        self.translation = Some(translation);
        self
    }
}

/// Conditions spanning several output columns, applied after translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRule {
    ClearUnless {
        target: String,
        column: String,
        equals: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaMapping {
    columns: Vec<ColumnMapping>,
    rules: Vec<RowRule>,
}

impl SchemaMapping {
    pub fn new(columns: Vec<ColumnMapping>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for column in &columns {
            if column.source.is_none() && column.default.is_none() {
                return Err(BookshelfError::InvalidArgument(format!(
                    "target column '{}' has neither a source nor a default",
                    column.target
                )));
            }
            if !seen.insert(column.target.as_str()) {
                return Err(BookshelfError::InvalidArgument(format!(
                    "target column '{}' is mapped twice",
                    column.target
                )));
            }
        }
        Ok(Self {
            columns,
            rules: Vec::new(),
        })
    }

    /// Maps every column to itself with no translations.
    pub fn identity<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        Self::new(headers.iter().map(|h| ColumnMapping::same(h.as_ref())).collect())
    }

    pub fn with_rule(mut self, rule: RowRule) -> Result<Self> {
        let RowRule::ClearUnless { target, column, .. } = &rule;
        for name in [target, column] {
            if !self.columns.iter().any(|c| &c.target == name) {
                return Err(BookshelfError::InvalidArgument(format!(
                    "rule refers to unmapped column '{name}'"
                )));
            }
        }
        self.rules.push(rule);
        Ok(self)
    }

    pub fn target_headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.target.clone()).collect()
    }

    /// Source columns the table must provide.
    pub fn required_sources(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.default.is_none())
            .filter_map(|c| c.source.as_deref())
            .collect()
    }

    /// Fails when the table shares no source column with the mapping, or
    /// lacks a column that has no default.
    pub fn check_source(&self, table: &CsvTable) -> Result<()> {
        let mut sources = self
            .columns
            .iter()
            .filter_map(|c| c.source.as_deref())
            .peekable();
        if sources.peek().is_some() && !sources.any(|s| table.column_index(s).is_some()) {
            return Err(BookshelfError::SchemaMismatch(format!(
                "{} has none of the expected source columns",
                table.name()
            )));
        }
        for source in self.required_sources() {
            table.require_column(source)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntranslatedValue {
    /// Zero-based data row index.
    pub row: usize,
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct RemapReport {
    pub rows: usize,
    pub untranslated: Vec<UntranslatedValue>,
}

impl RemapReport {
    pub fn is_clean(&self) -> bool {
        self.untranslated.is_empty()
    }
}

pub fn remap(table: &CsvTable, mapping: &SchemaMapping) -> Result<CsvTable> {
    remap_with_report(table, mapping).map(|(out, _)| out)
}

pub fn remap_with_report(
    table: &CsvTable,
    mapping: &SchemaMapping,
) -> Result<(CsvTable, RemapReport)> {
    mapping.check_source(table)?;

    let sources: Vec<Option<usize>> = mapping
        .columns
        .iter()
        .map(|c| c.source.as_deref().and_then(|s| table.column_index(s)))
        .collect();

    for (column, index) in mapping.columns.iter().zip(&sources) {
        if let (Some(source), None) = (column.source.as_deref(), index) {
            tracing::debug!(
                source,
                target = %column.target,
                "Source column absent, using default"
            );
        }
    }

    let headers = mapping.target_headers();
    let rules: Vec<(usize, usize, &str)> = mapping
        .rules
        .iter()
        .filter_map(|rule| {
            let RowRule::ClearUnless {
                target,
                column,
                equals,
            } = rule;
            let target = headers.iter().position(|h| h == target)?;
            let column = headers.iter().position(|h| h == column)?;
            Some((target, column, equals.as_str()))
        })
        .collect();

    let mut report = RemapReport::default();
    let mut records = Vec::with_capacity(table.row_count());

    for (row_index, row) in table.rows().iter().enumerate() {
        let mut values: Vec<String> = mapping
            .columns
            .iter()
            .zip(&sources)
            .map(|(column, source)| map_cell(row_index, row, column, *source, &mut report))
            .collect();

        for &(target, column, equals) in &rules {
            if values[column] != equals {
                values[target].clear();
            }
        }
        records.push(values);
    }

    report.rows = records.len();
    if !report.is_clean() {
        tracing::warn!(
            count = report.untranslated.len(),
            "Some values could not be translated and were kept as-is"
        );
    }

    let out = CsvTable::new(table.name(), headers, records)?;
    Ok((out, report))
}

fn map_cell(
    row_index: usize,
    row: &Row,
    column: &ColumnMapping,
    source: Option<usize>,
    report: &mut RemapReport,
) -> String {
    let raw = match source {
        Some(index) => row.get(index),
        None => return column.default.clone().unwrap_or_default(),
    };

    if raw.trim().is_empty() {
        if let Some(default) = &column.default {
            return default.clone();
        }
    }

    let Some(translation) = &column.translation else {
        return raw.to_string();
    };

    match translation.apply(raw) {
        Some(translated) => translated,
        None => {
            tracing::warn!(
                row = row_index + 1,
                column = %column.target,
                value = raw,
                translation = translation.name(),
                "Untranslatable value passed through"
            );
            report.untranslated.push(UntranslatedValue {
                row: row_index,
                column: column.target.clone(),
                value: raw.to_string(),
            });
            raw.to_string()
        }
    }
}
