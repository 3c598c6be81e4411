//! Per-field validation of numeric inputs.

use std::fmt;

use serde::Serialize;

use crate::record::{NumericInput, Record};
use crate::spec::PreprocessingSpec;

/// What is wrong with a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// The value does not parse as a number. Always blocks prediction.
    NotANumber {
        /// The offending raw text.
        raw: String,
    },
    /// The value lies outside `[min * 0.5, max * 2]` of the training range.
    OutOfTypicalRange {
        /// The parsed value.
        value: f64,
        /// Training minimum.
        min: f64,
        /// Training maximum.
        max: f64,
    },
}

/// A validation finding keyed by field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    /// The column the issue refers to.
    pub column: String,
    /// The finding.
    #[serde(flatten)]
    pub kind: IssueKind,
    /// Human-readable message for display next to the field.
    pub message: String,
}

impl FieldIssue {
    fn new(column: &str, kind: IssueKind) -> Self {
        let message = match &kind {
            IssueKind::NotANumber { .. } => "Must be a number".to_string(),
            IssueKind::OutOfTypicalRange { min, max, .. } => {
                format!("Typical range: {min:.1}-{max:.1}")
            }
        };
        Self {
            column: column.to_string(),
            kind,
            message,
        }
    }

    /// Return `true` if this issue must withhold a prediction regardless of
    /// range policy.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(self.kind, IssueKind::NotANumber { .. })
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.column, self.message)
    }
}

/// Check every numeric column of `record` against `spec`.
///
/// Missing values are fine (they are imputed). Returns issues in
/// `numeric_columns` order; an empty vector means the record is clean.
#[must_use]
pub fn validate_record(record: &Record, spec: &PreprocessingSpec) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    for column in &spec.numeric_columns {
        let Some(value) = record.get(column) else {
            continue;
        };
        match value.numeric() {
            NumericInput::Missing => {}
            NumericInput::Invalid(raw) => issues.push(FieldIssue::new(
                column,
                IssueKind::NotANumber {
                    raw: raw.to_string(),
                },
            )),
            NumericInput::Value(v) => {
                if let Some(range) = spec.numeric_ranges_train.get(column)
                    && !range.is_typical(v)
                {
                    issues.push(FieldIssue::new(
                        column,
                        IssueKind::OutOfTypicalRange {
                            value: v,
                            min: range.min,
                            max: range.max,
                        },
                    ));
                }
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::tests::sample_spec;

    #[test]
    fn clean_record_has_no_issues() {
        let record = Record::new().with("Age", "22").with("CGPA", 8.0);
        assert!(validate_record(&record, &sample_spec()).is_empty());
    }

    #[test]
    fn missing_values_are_not_issues() {
        assert!(validate_record(&Record::new(), &sample_spec()).is_empty());
    }

    #[test]
    fn non_numeric_is_blocking() {
        let record = Record::new().with("Age", "abc");
        let issues = validate_record(&record, &sample_spec());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].column, "Age");
        assert_eq!(issues[0].message, "Must be a number");
        assert!(issues[0].is_blocking());
    }

    #[test]
    fn out_of_range_is_advisory() {
        let record = Record::new().with("CGPA", 25.0);
        let issues = validate_record(&record, &sample_spec());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Typical range: 5.0-10.0");
        assert!(!issues[0].is_blocking());
    }

    #[test]
    fn categorical_fields_are_not_checked() {
        let record = Record::new().with("Gender", "???");
        assert!(validate_record(&record, &sample_spec()).is_empty());
    }

    #[test]
    fn issues_follow_column_order() {
        let record = Record::new().with("CGPA", "x").with("Age", "y");
        let issues = validate_record(&record, &sample_spec());
        let columns: Vec<&str> = issues.iter().map(|i| i.column.as_str()).collect();
        assert_eq!(columns, ["Age", "CGPA"]);
    }
}
