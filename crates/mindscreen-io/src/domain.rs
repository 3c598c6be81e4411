//! Report naming for mindscreen-io.

use std::fmt;
use std::str::FromStr;

use crate::IoError;

/// Which report a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// One scored record.
    Prediction,
    /// A full dataset analysis.
    Analytics,
}

impl ReportKind {
    /// Suffix used in the file name.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            ReportKind::Prediction => "prediction",
            ReportKind::Analytics => "analytics",
        }
    }
}

/// A report name, safe to use as a file name prefix.
///
/// Must match `[a-zA-Z0-9_-]+`, be at most [`ReportName::MAX_LEN`]
/// characters, and not start with `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportName(String);

impl ReportName {
    /// Longest accepted name.
    pub const MAX_LEN: usize = 64;

    /// Parse and validate a report name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidReportName`] if the name is empty, too
    /// long, starts with `-`, or contains characters outside
    /// `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        let valid = !name.is_empty()
            && name.len() <= Self::MAX_LEN
            && !name.starts_with('-')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(IoError::InvalidReportName { name });
        }
        Ok(Self(name))
    }

    /// Return the report name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name for one report kind: `{name}_{kind}.json`.
    #[must_use]
    pub fn file_name(&self, kind: ReportKind) -> String {
        format!("{}_{}.json", self.0, kind.suffix())
    }
}

impl FromStr for ReportName {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl fmt::Display for ReportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_safe_names() {
        let name = ReportName::new("cohort-2024_q1".to_string()).unwrap();
        assert_eq!(name.as_str(), "cohort-2024_q1");
        let longest = "x".repeat(ReportName::MAX_LEN);
        assert!(longest.parse::<ReportName>().is_ok());
    }

    #[test]
    fn rejects_unsafe_names() {
        let too_long = "a".repeat(ReportName::MAX_LEN + 1);
        for bad in ["", "../etc", "a b", "report.json", "-flag", too_long.as_str()] {
            assert!(
                matches!(bad.parse::<ReportName>(), Err(IoError::InvalidReportName { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn file_names_carry_the_kind() {
        let name: ReportName = "wk1".parse().unwrap();
        assert_eq!(name.file_name(ReportKind::Prediction), "wk1_prediction.json");
        assert_eq!(name.file_name(ReportKind::Analytics), "wk1_analytics.json");
    }
}
