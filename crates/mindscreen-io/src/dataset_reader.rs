//! CSV reader for the student dataset.

use std::path::{Path, PathBuf};

use mindscreen_stats::{Cell, Column, Dataset, RawRow, StudentRecord};
use tracing::{debug, info, instrument, warn};

use crate::IoError;

fn csv_error(path: &Path, e: csv::Error) -> IoError {
    IoError::CsvParse {
        path: path.to_path_buf(),
        offset: e.position().map_or(0, |p| p.byte()),
        source: e,
    }
}

/// Reads the student dataset from a CSV file.
///
/// Expected CSV format:
/// - Header row required; known headers map onto [`StudentRecord`] fields,
///   others are kept by name only
/// - Fields are trimmed; empty fields are missing, fields that parse as
///   finite floats are numeric, everything else is text
/// - Short rows are padded with missing values and long rows truncated,
///   each with a warning
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
pub struct DatasetReader {
    path: PathBuf,
}

impl DatasetReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read the CSV file into a typed [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so ragged rows reach the padding logic below.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| csv_error(&self.path, e))?
            .iter()
            .map(String::from)
            .collect();
        let unknown: Vec<&str> = headers
            .iter()
            .filter(|h| Column::from_header(h).is_none())
            .map(String::as_str)
            .collect();
        debug!(n_headers = headers.len(), ?unknown, "read CSV header");

        let mut records = Vec::new();
        let (mut padded, mut truncated) = (0usize, 0usize);
        for (row_index, result) in rdr.records().enumerate() {
            let row = result.map_err(|e| csv_error(&self.path, e))?;

            if row.len() < headers.len() {
                padded += 1;
                warn!(row_index, got = row.len(), expected = headers.len(), "short row padded");
            } else if row.len() > headers.len() {
                truncated += 1;
                warn!(row_index, got = row.len(), expected = headers.len(), "long row truncated");
            }

            let mut raw = RawRow::new();
            for (i, header) in headers.iter().enumerate() {
                let cell = row.get(i).map_or(Cell::Missing, Cell::parse);
                raw.insert(header.clone(), cell);
            }
            records.push(StudentRecord::from_raw(&raw));
        }

        if records.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_records = records.len(),
            n_columns = headers.len(),
            padded,
            truncated,
            "dataset loaded"
        );

        Ok(Dataset::new(headers, records))
    }
}
