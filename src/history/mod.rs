//! Newest-first calculation history with CSV persistence.
//!
//! On disk the log is a `;`-separated file with a UTF-8 byte-order mark and
//! a two-column header row, so spreadsheet tools open it directly. Row 1
//! after the header is the newest entry, exactly as the log orders them in
//! memory.
//!
//! A missing file loads as an empty log. Every other read or write failure
//! is returned to the caller, who decides how to tell the user; the
//! in-memory log is never damaged by a failed load or save.

use crate::model::{HistoryEntry, HistoryReadError, HistoryWriteError};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column delimiter of the history file.
pub const DELIMITER: u8 = b';';

/// Byte-order mark written before the header.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Calculation history, most recent entry first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A log holding `entries` in the given (newest-first) order.
    pub fn from_entries(entries: impl IntoIterator<Item = HistoryEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Read a history file.
    ///
    /// The first row is the header and is skipped whatever it says. Rows
    /// with more than two fields keep the first two.
    ///
    /// # Errors
    ///
    /// Any failure other than the file not existing: unreadable file,
    /// malformed or non-UTF-8 content, a row without a result column.
    pub fn load(path: &Path) -> Result<Self, HistoryReadError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no history file, starting empty");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(HistoryReadError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_reader(content);

        let mut entries = VecDeque::new();
        for result in reader.records().skip(1) {
            let record = result.map_err(|source| HistoryReadError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            match (record.get(0), record.get(1)) {
                (Some(expression), Some(result)) => {
                    entries.push_back(HistoryEntry::new(expression, result));
                }
                _ => {
                    return Err(HistoryReadError::MissingColumn {
                        path: path.to_path_buf(),
                        line: record.position().map_or(0, |p| line_at(content, p.byte())),
                    })
                }
            }
        }

        tracing::info!(path = %path.display(), entries = entries.len(), "history loaded");
        Ok(Self { entries })
    }

    /// Replace the entries with the file's; on error keep the current ones.
    ///
    /// # Errors
    ///
    /// Same as [`HistoryLog::load`].
    pub fn reload(&mut self, path: &Path) -> Result<(), HistoryReadError> {
        match Self::load(path) {
            Ok(loaded) => {
                *self = loaded;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "history reload failed, keeping current entries");
                Err(e)
            }
        }
    }

    /// Write the header and every entry, overwriting `path`.
    ///
    /// Fields are quoted only when they contain the delimiter, a quote or a
    /// line break. Lines end in CRLF.
    ///
    /// # Errors
    ///
    /// If the file cannot be created or written. The log itself is unchanged.
    pub fn save(&self, path: &Path, header: &(String, String)) -> Result<(), HistoryWriteError> {
        let io_error = |source| HistoryWriteError::Io {
            path: path.to_path_buf(),
            source,
        };
        let csv_error = |source| HistoryWriteError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(io_error)?;
        let mut out = BufWriter::new(file);
        out.write_all(UTF8_BOM).map_err(io_error)?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .terminator(csv::Terminator::CRLF)
            .from_writer(out);

        writer
            .write_record([header.0.as_str(), header.1.as_str()])
            .map_err(csv_error)?;
        for entry in &self.entries {
            writer
                .write_record([entry.expression(), entry.result()])
                .map_err(csv_error)?;
        }
        writer.flush().map_err(io_error)?;

        tracing::info!(path = %path.display(), entries = self.entries.len(), "history saved");
        Ok(())
    }

    /// Insert a new entry at the top.
    pub fn prepend(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Entry at `index`; `0` is the newest.
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// The newest entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a HistoryEntry;
    type IntoIter = std::collections::vec_deque::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// 1-based line of a byte offset. The csv reader's own line counter
/// undercounts rows that end in `\r\n`.
fn line_at(content: &[u8], byte: u64) -> u64 {
    let end = usize::try_from(byte).map_or(content.len(), |b| b.min(content.len()));
    let newlines = content[..end].iter().filter(|&&b| b == b'\n').count();
    newlines as u64 + 1
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
