use crate::csv_processor::table::CsvTable;
use crate::utils::{BookshelfError, Result};
use csv::Writer;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub fn write_table_to<W: Write>(writer: W, table: &CsvTable) -> Result<usize> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.values())?;
    }
    writer.flush()?;
    Ok(table.row_count())
}

/// Writes a single table atomically.
pub fn write_table(path: impl AsRef<Path>, table: &CsvTable) -> Result<usize> {
    let mut batch = OutputBatch::new();
    batch.stage(path, table)?;
    let written = batch.commit()?;
    Ok(written.first().map(|f| f.rows).unwrap_or(0))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub rows: usize,
}

/// Collects every output of a run in temporary files next to their targets
/// and only renames them into place on `commit`. Dropping an uncommitted
/// batch removes the temporaries and leaves the targets untouched.
#[derive(Default)]
pub struct OutputBatch {
    staged: Vec<(NamedTempFile, WrittenFile)>,
}

impl OutputBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, path: impl AsRef<Path>, table: &CsvTable) -> Result<()> {
        let path = path.as_ref();
        if self.staged.iter().any(|(_, f)| f.path == path) {
            return Err(BookshelfError::InvalidArgument(format!(
                "output {} would be written twice",
                path.display()
            )));
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = NamedTempFile::new_in(&dir)?;
        let rows = write_table_to(tmp.as_file_mut(), table)?;
        tmp.as_file().sync_all()?;

        tracing::debug!(path = %path.display(), rows, "Staged output");
        self.staged.push((
            tmp,
            WrittenFile {
                path: path.to_path_buf(),
                rows,
            },
        ));
        Ok(())
    }

    /// Renames the staged files in order. A rename failure stops the commit
    /// but leaves the files already renamed in place.
    pub fn commit(self) -> Result<Vec<WrittenFile>> {
        let mut written = Vec::with_capacity(self.staged.len());
        for (tmp, file) in self.staged {
            tmp.persist(&file.path).map_err(|e| BookshelfError::IoError(e.error))?;
            tracing::info!(path = %file.path.display(), rows = file.rows, "Wrote CSV");
            written.push(file);
        }
        Ok(written)
    }
}
