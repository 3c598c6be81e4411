//! Value counts per column and the outcome balance.

use std::collections::HashMap;

use serde::Serialize;

use crate::record::{Column, StudentRecord, Value};

/// Round `value` to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `count / total * 100`, 2 decimals, `0` for an empty total.
pub(crate) fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(count as f64 / total as f64 * 100.0, 2)
}

/// Count and share of one distinct value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionEntry {
    /// The value as text (numbers in shortest form, e.g. `3` or `7.5`).
    pub value: String,
    /// Number of rows holding it.
    pub count: usize,
    /// `count / total * 100`, 2 decimals.
    pub percentage: f64,
}

/// Distinct-value counts for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub column: Column,
    /// All rows, including those with a missing value.
    pub total: usize,
    /// Rows without a usable value; not bucketed.
    pub missing: usize,
    /// Ordered by descending count, ties by value.
    pub entries: Vec<DistributionEntry>,
}

/// Count each distinct value of `column`.
///
/// Percentages are taken over every row so that entries plus the missing
/// share add up to 100.
#[must_use]
pub fn distribution(records: &[StudentRecord], column: Column) -> Distribution {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut missing = 0;
    for record in records {
        let key = match record.value(column) {
            Value::Number(v) => format!("{v}"),
            Value::Text(s) => s.to_string(),
            Value::Missing => {
                missing += 1;
                continue;
            }
        };
        *counts.entry(key).or_insert(0) += 1;
    }

    let total = records.len();
    let mut entries: Vec<DistributionEntry> = counts
        .into_iter()
        .map(|(value, count)| DistributionEntry {
            value,
            count,
            percentage: percentage(count, total),
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

    Distribution {
        column,
        total,
        missing,
        entries,
    }
}

/// Shape of the binary outcome across the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeBalance {
    /// All rows.
    pub total: usize,
    /// Rows with outcome `1`.
    pub positive: usize,
    /// Rows with outcome `0`.
    pub negative: usize,
    /// Rows whose outcome is neither `0` nor `1`.
    pub unlabeled: usize,
    /// Over all rows, 2 decimals.
    pub positive_percentage: f64,
    /// Over all rows, 2 decimals.
    pub negative_percentage: f64,
    /// Positive share of all rows, 1 decimal.
    pub positive_rate: f64,
}

/// Count positive, negative and unlabeled rows.
#[must_use]
pub fn outcome_balance(records: &[StudentRecord]) -> OutcomeBalance {
    let positive = records.iter().filter(|r| r.depression == Some(true)).count();
    let negative = records.iter().filter(|r| r.depression == Some(false)).count();
    let total = records.len();
    let positive_rate = if total == 0 {
        0.0
    } else {
        round_to(positive as f64 / total as f64 * 100.0, 1)
    };

    OutcomeBalance {
        total,
        positive,
        negative,
        unlabeled: total - positive - negative,
        positive_percentage: percentage(positive, total),
        negative_percentage: percentage(negative, total),
        positive_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_outcome(outcome: Option<bool>) -> StudentRecord {
        StudentRecord {
            depression: outcome,
            ..StudentRecord::default()
        }
    }

    #[test]
    fn hundred_rows_thirty_positive() {
        let records: Vec<StudentRecord> = (0..100).map(|i| with_outcome(Some(i < 30))).collect();
        let balance = outcome_balance(&records);
        assert_eq!(balance.positive, 30);
        assert_eq!(balance.negative, 70);
        assert_eq!(balance.positive_percentage, 30.0);
        assert_eq!(balance.negative_percentage, 70.0);
        assert_eq!(balance.positive_rate, 30.0);

        let dist = distribution(&records, Column::Depression);
        assert_eq!(dist.entries[0].value, "0");
        assert_eq!(dist.entries[0].percentage, 70.0);
        assert_eq!(dist.entries[1].value, "1");
        assert_eq!(dist.entries[1].percentage, 30.0);
    }

    #[test]
    fn unlabeled_rows_count_in_total() {
        let records = vec![with_outcome(Some(true)), with_outcome(None), with_outcome(None)];
        let balance = outcome_balance(&records);
        assert_eq!(balance.unlabeled, 2);
        assert_eq!(balance.positive_percentage, 33.33);
        assert_eq!(balance.positive_rate, 33.3);
    }

    #[test]
    fn missing_values_are_counted_separately() {
        let mut records = vec![StudentRecord::default(); 4];
        records[0].family_history = Some("Yes".into());
        records[1].family_history = Some("No".into());
        records[2].family_history = Some("Yes".into());
        let dist = distribution(&records, Column::FamilyHistory);
        assert_eq!(dist.total, 4);
        assert_eq!(dist.missing, 1);
        assert_eq!(dist.entries.len(), 2);
        assert_eq!(dist.entries[0].value, "Yes");
        assert_eq!(dist.entries[0].percentage, 50.0);
        assert_eq!(dist.entries[1].percentage, 25.0);
    }

    #[test]
    fn ties_are_ordered_by_value() {
        let mut records = vec![StudentRecord::default(); 2];
        records[0].gender = Some("Male".into());
        records[1].gender = Some("Female".into());
        let dist = distribution(&records, Column::Gender);
        assert_eq!(dist.entries[0].value, "Female");
    }

    #[test]
    fn empty_dataset_is_all_zero() {
        let balance = outcome_balance(&[]);
        assert_eq!(balance.total, 0);
        assert_eq!(balance.positive_percentage, 0.0);
        assert!(distribution(&[], Column::Age).entries.is_empty());
    }
}
