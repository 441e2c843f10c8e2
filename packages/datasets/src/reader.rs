//! Shared CSV reader construction and row bookkeeping.

use std::fs::File;
use std::path::Path;

use crate::DatasetError;

/// Opens a semicolon-delimited, lenient CSV reader over `path`.
///
/// Variable field counts are allowed; quoting is lazy so stray quotes in
/// free-text cells do not abort the stream.
pub(crate) fn open_reader(path: &Path) -> Result<csv::Reader<File>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    Ok(csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .quoting(true)
        .double_quote(true)
        .from_reader(file))
}

/// Reads the header row, mapping failures to [`DatasetError::Header`].
pub(crate) fn read_header(
    reader: &mut csv::Reader<File>,
    path: &Path,
) -> Result<csv::StringRecord, DatasetError> {
    reader
        .headers()
        .map(Clone::clone)
        .map_err(|source| DatasetError::Header {
            path: path.display().to_string(),
            source,
        })
}

/// Row bookkeeping for one loader pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows turned into records.
    pub loaded: usize,
    /// Malformed rows that were dropped.
    pub skipped: usize,
}

impl LoadStats {
    pub(crate) fn record(&mut self) {
        self.loaded += 1;
    }

    pub(crate) fn skip(&mut self) {
        self.skipped += 1;
    }

    /// Logs the counters for `dataset`.
    pub(crate) fn log(&self, dataset: &str) {
        if self.skipped > 0 {
            log::debug!(
                "{dataset}: {} rows loaded, {} rows skipped",
                self.loaded,
                self.skipped
            );
        } else {
            log::debug!("{dataset}: {} rows loaded", self.loaded);
        }
    }
}

/// Parses a numeric cell, defaulting to `0.0` on failure.
pub(crate) fn parse_float(cell: &str) -> f64 {
    cell.trim().parse().unwrap_or(0.0)
}

/// Strips leading zeros from an INSEE or department code before map
/// lookups.
pub(crate) fn strip_leading_zeros(code: &str) -> &str {
    code.trim_start_matches('0')
}
