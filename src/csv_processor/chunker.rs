use crate::csv_processor::table::{CsvTable, Row};
use crate::utils::{normalize_label, BookshelfError, Result};
use std::collections::HashMap;

pub const DEFAULT_UNKNOWN_GROUP: &str = "unknown";

/// How a table is partitioned into output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkSpec {
    Count(usize),
    ByColumn(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRange {
    pub index: usize,
    pub start_row: usize,
    pub end_row: usize,
}

impl ChunkRange {
    pub fn row_count(&self) -> usize {
        self.end_row - self.start_row
    }
}

pub struct CsvChunker {
    chunk_size: usize,
}

impl CsvChunker {
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(BookshelfError::InvalidArgument(
                "chunk size must be a positive integer".to_string(),
            ));
        }
        Ok(Self { chunk_size })
    }

    pub fn calculate_chunks(&self, total_rows: usize) -> Vec<ChunkRange> {
        let mut chunks = Vec::new();
        let mut current_start = 0;
        let mut chunk_index = 0;

        while current_start < total_rows {
            let end_row = (current_start + self.chunk_size).min(total_rows);

            chunks.push(ChunkRange {
                index: chunk_index,
                start_row: current_start,
                end_row,
            });

            current_start = end_row;
            chunk_index += 1;
        }

        chunks
    }
}

/// Lazily materializes one table per chunk range.
pub struct Chunks<'a> {
    table: &'a CsvTable,
    ranges: std::vec::IntoIter<ChunkRange>,
    total: usize,
}

impl<'a> Chunks<'a> {
    pub fn chunk_count(&self) -> usize {
        self.total
    }

    /// Ranges not yet yielded.
    pub fn ranges(&self) -> &[ChunkRange] {
        self.ranges.as_slice()
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = CsvTable;

    fn next(&mut self) -> Option<Self::Item> {
        let range = self.ranges.next()?;
        let rows = self.table.rows()[range.start_row..range.end_row].to_vec();
        Some(self.table.with_rows(rows))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ranges.size_hint()
    }
}

impl<'a> ExactSizeIterator for Chunks<'a> {}

pub fn split_by_count(table: &CsvTable, chunk_size: usize) -> Result<Chunks<'_>> {
    let chunker = CsvChunker::new(chunk_size)?;
    let ranges = chunker.calculate_chunks(table.row_count());
    tracing::debug!(
        table = %table.name(),
        rows = table.row_count(),
        chunk_size,
        chunks = ranges.len(),
        "Calculated chunks"
    );
    Ok(Chunks {
        table,
        total: ranges.len(),
        ranges: ranges.into_iter(),
    })
}

/// Groups in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct StatusGroups {
    groups: Vec<(String, CsvTable)>,
}

impl StatusGroups {
    pub fn get(&self, status: &str) -> Option<&CsvTable> {
        self.groups
            .iter()
            .find(|(key, _)| key == status)
            .map(|(_, table)| table)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CsvTable)> {
        self.groups.iter().map(|(key, table)| (key.as_str(), table))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl IntoIterator for StatusGroups {
    type Item = (String, CsvTable);
    type IntoIter = std::vec::IntoIter<(String, CsvTable)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

pub fn split_by_status(table: &CsvTable, status_column: &str) -> Result<StatusGroups> {
    split_by_status_with(table, status_column, DEFAULT_UNKNOWN_GROUP)
}

pub fn split_by_status_with(
    table: &CsvTable,
    status_column: &str,
    unknown_group: &str,
) -> Result<StatusGroups> {
    let column = table.require_column(status_column)?;

    let mut order: Vec<(String, Vec<Row>)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for row in table.rows() {
        let mut key = normalize_label(row.get(column));
        if key.is_empty() {
            key = unknown_group.to_string();
        }
        let slot = match slots.get(&key) {
            Some(&slot) => slot,
            None => {
                order.push((key.clone(), Vec::new()));
                slots.insert(key, order.len() - 1);
                order.len() - 1
            }
        };
        order[slot].1.push(row.clone());
    }

    let groups = order
        .into_iter()
        .map(|(key, rows)| {
            tracing::debug!(status = %key, rows = rows.len(), "Grouped rows");
            let group = table.with_rows(rows);
            (key, group)
        })
        .collect();

    Ok(StatusGroups { groups })
}

/// Splits `table` per `spec` into `(file suffix, table)` pairs: 1-based chunk
/// numbers in count mode, sanitized group names in column mode.
pub fn partition(
    table: &CsvTable,
    spec: &ChunkSpec,
    unknown_group: &str,
) -> Result<Vec<(String, CsvTable)>> {
    match spec {
        ChunkSpec::Count(size) => Ok(split_by_count(table, *size)?
            .enumerate()
            .map(|(i, chunk)| ((i + 1).to_string(), chunk))
            .collect()),
        ChunkSpec::ByColumn(column) => Ok(split_by_status_with(table, column, unknown_group)?
            .into_iter()
            .map(|(status, group)| (file_suffix(&status), group))
            .collect()),
    }
}

/// Keeps a status usable as a file-name suffix.
pub fn file_suffix(status: &str) -> String {
    status
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(rows: usize) -> CsvTable {
        CsvTable::new(
            "numbers",
            vec!["n".to_string()],
            (0..rows).map(|i| vec![i.to_string()]).collect(),
        )
        .unwrap()
    }

    fn with_statuses(statuses: &[&str]) -> CsvTable {
        CsvTable::new(
            "shelves",
            vec!["Title".to_string(), "Exclusive Shelf".to_string()],
            statuses
                .iter()
                .enumerate()
                .map(|(i, s)| vec![format!("book {i}"), s.to_string()])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn zero_chunk_size_is_invalid() {
        let err = split_by_count(&numbered(3), 0).err().unwrap();
        assert!(matches!(err, BookshelfError::InvalidArgument(_)));
    }

    #[test]
    fn hundred_twenty_rows_by_fifty() {
        let table = numbered(120);
        let chunks = split_by_count(&table, 50).unwrap();
        assert_eq!(chunks.chunk_count(), 3);
        let bounds: Vec<(usize, usize)> = chunks
            .ranges()
            .iter()
            .map(|r| (r.start_row, r.end_row))
            .collect();
        assert_eq!(bounds, vec![(0, 50), (50, 100), (100, 120)]);
        let sizes: Vec<usize> = chunks.map(|c| c.row_count()).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
    }

    #[test]
    fn chunks_concatenate_back_to_input() {
        for (rows, size) in [(0, 1), (1, 1), (7, 3), (9, 3), (10, 25), (31, 4)] {
            let table = numbered(rows);
            let chunks: Vec<CsvTable> = split_by_count(&table, size).unwrap().collect();

            assert_eq!(chunks.len(), rows.div_ceil(size));
            let (last, full) = chunks.split_last().map_or((None, &[][..]), |(l, f)| (Some(l), f));
            assert!(full.iter().all(|c| c.row_count() == size));
            if let Some(last) = last {
                assert!(last.row_count() >= 1 && last.row_count() <= size);
            }

            let joined: Vec<Row> = chunks.iter().flat_map(|c| c.rows().to_vec()).collect();
            assert_eq!(joined, table.rows());
            assert!(chunks.iter().all(|c| c.headers() == table.headers()));
        }
    }

    #[test]
    fn ranges_shrink_as_chunks_are_taken() {
        let table = numbered(10);
        let mut chunks = split_by_count(&table, 4).unwrap();
        assert_eq!(chunks.ranges().len(), 3);

        let first = chunks.next().unwrap();
        assert_eq!(first.rows()[0].get(0), "0");
        let rest = chunks.ranges();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].index, 1);
        assert_eq!(rest[1].row_count(), 2);
        assert_eq!(chunks.chunk_count(), 3);
    }

    #[test]
    fn status_groups_in_first_seen_order() {
        let table = with_statuses(&["to-read", "read", "to-read", "", "read", "to-read"]);
        let groups = split_by_status(&table, "Exclusive Shelf").unwrap();

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["to-read", "read", "unknown"]);
        assert_eq!(groups.get("to-read").unwrap().row_count(), 3);
        assert_eq!(groups.get("read").unwrap().row_count(), 2);
        assert_eq!(groups.get("unknown").unwrap().row_count(), 1);
    }

    #[test]
    fn status_variants_share_a_group() {
        let table = with_statuses(&["Read", "read ", " READ", "Currently Reading", "currently-reading"]);
        let groups = split_by_status(&table, "Exclusive Shelf").unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get("read").unwrap().row_count(), 3);
        assert_eq!(groups.get("currently-reading").unwrap().row_count(), 2);
    }

    #[test]
    fn status_groups_partition_rows() {
        let table = with_statuses(&["a", "b", "", "a", "c", "  ", "b"]);
        let groups = split_by_status(&table, "Exclusive Shelf").unwrap();

        let total: usize = groups.iter().map(|(_, t)| t.row_count()).sum();
        assert_eq!(total, table.row_count());

        let mut seen: Vec<Row> = groups.into_iter().flat_map(|(_, t)| t.rows().to_vec()).collect();
        let mut expected = table.rows().to_vec();
        seen.sort_by(|a, b| a.values().cmp(b.values()));
        expected.sort_by(|a, b| a.values().cmp(b.values()));
        assert_eq!(seen, expected);
    }

    #[test]
    fn relative_order_kept_within_group() {
        let table = with_statuses(&["read", "to-read", "read"]);
        let groups = split_by_status(&table, "Exclusive Shelf").unwrap();
        let read = groups.get("read").unwrap();
        assert_eq!(read.rows()[0].get(0), "book 0");
        assert_eq!(read.rows()[1].get(0), "book 2");
    }

    #[test]
    fn missing_status_column_is_schema_error() {
        let err = split_by_status(&numbered(2), "Exclusive Shelf").unwrap_err();
        assert!(err.is_schema_error());
    }

    #[test]
    fn custom_unknown_label() {
        let table = with_statuses(&["", "read"]);
        let groups = split_by_status_with(&table, "Exclusive Shelf", "no-shelf").unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["no-shelf", "read"]);
    }

    #[test]
    fn partition_names_files() {
        let table = with_statuses(&["read", "to-read", "read", ""]);

        let by_count = partition(&table, &ChunkSpec::Count(3), DEFAULT_UNKNOWN_GROUP).unwrap();
        let names: Vec<&str> = by_count.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec!["1", "2"]);

        let spec = ChunkSpec::ByColumn("Exclusive Shelf".to_string());
        let by_status = partition(&table, &spec, DEFAULT_UNKNOWN_GROUP).unwrap();
        let names: Vec<&str> = by_status.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec!["read", "to-read", "unknown"]);
    }

    #[test]
    fn file_suffix_replaces_path_characters() {
        assert_eq!(file_suffix("to-read"), "to-read");
        assert_eq!(file_suffix("sci/fi"), "sci_fi");
        assert_eq!(file_suffix("a.b"), "a_b");
    }
}
