//! Dataset-level overview figures.

use serde::Serialize;

use crate::dataset::Dataset;
use crate::distribution::{outcome_balance, round_to, OutcomeBalance};
use crate::record::{Column, Value};

/// Age statistics over rows with an age.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeStats {
    /// 1 decimal.
    pub mean: f64,
    /// Youngest age.
    pub min: f64,
    /// Oldest age.
    pub max: f64,
}

/// Overview of a dataset's shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Rows in the dataset.
    pub total_records: usize,
    /// Headers minus the outcome column.
    pub total_features: usize,
    /// Features holding a number in the first row.
    pub numeric_features: usize,
    /// Remaining features, excluding `id`.
    pub categorical_features: usize,
    /// Outcome balance over all rows.
    pub outcome: OutcomeBalance,
    /// `None` when no row has an age.
    pub age: Option<AgeStats>,
}

/// Summarize a dataset.
///
/// Feature kinds are judged from the first row: a header counts as numeric
/// when that row holds a number for it, excluding `id` and the outcome.
/// Everything else except those two counts as categorical.
#[must_use]
pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    let headers = dataset.headers().len();
    let numeric_features = dataset.records().first().map_or(0, |first| {
        dataset
            .columns()
            .filter(|&c| c != Column::Id && c != Column::Depression)
            .filter(|&c| matches!(first.value(c), Value::Number(_)))
            .count()
    });

    DatasetSummary {
        total_records: dataset.len(),
        total_features: headers.saturating_sub(1),
        numeric_features,
        categorical_features: headers.saturating_sub(numeric_features + 2),
        outcome: outcome_balance(dataset.records()),
        age: age_stats(dataset),
    }
}

fn age_stats(dataset: &Dataset) -> Option<AgeStats> {
    let ages: Vec<f64> = dataset.records().iter().filter_map(|r| r.age).collect();
    if ages.is_empty() {
        return None;
    }
    let mean = ages.iter().sum::<f64>() / ages.len() as f64;
    Some(AgeStats {
        mean: round_to(mean, 1),
        min: ages.iter().copied().fold(f64::INFINITY, f64::min),
        max: ages.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}
