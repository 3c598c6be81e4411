//! The parsed dataset: headers as read plus typed rows.

use crate::record::{Column, StudentRecord};

/// A tabular dataset after parsing.
///
/// `headers` keeps every header of the source file in order, including ones
/// outside the known column set; `records` hold the typed rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<StudentRecord>,
}

impl Dataset {
    /// Create a dataset from its headers and typed rows.
    #[must_use]
    pub fn new(headers: Vec<String>, records: Vec<StudentRecord>) -> Self {
        Self { headers, records }
    }

    /// Return the headers in file order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Return the typed rows.
    #[must_use]
    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Return the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Known columns present in the headers, in file order.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.headers.iter().filter_map(|h| Column::from_header(h))
    }
}
