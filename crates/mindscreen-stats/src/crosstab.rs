//! Cross-tabulation of numeric columns against the outcome.

use serde::Serialize;
use tracing::debug;

use crate::error::StatsError;
use crate::record::{Column, StudentRecord};

/// An inclusive `[min, max]` range with a display label.
///
/// Adjacent bins may share a boundary; a value on the boundary belongs to
/// both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub(crate) label: String,
    pub(crate) min: f64,
    pub(crate) max: f64,
}

impl Bin {
    /// Create a bin.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`StatsError::InvalidBin`] | A bound is not finite, or `min > max` |
    pub fn new(label: impl Into<String>, min: f64, max: f64) -> Result<Self, StatsError> {
        let label = label.into();
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(StatsError::InvalidBin { label, min, max });
        }
        Ok(Self { label, min, max })
    }

    /// Return the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Return the inclusive lower bound.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Return the inclusive upper bound.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Return `true` if `value` lies in `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Row counts split by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    /// All counted rows, including unlabeled ones.
    pub total: usize,
    /// Rows with outcome `1`.
    pub positive: usize,
    /// Rows with outcome `0`.
    pub negative: usize,
}

impl OutcomeCounts {
    fn add(&mut self, outcome: Option<bool>) {
        self.total += 1;
        match outcome {
            Some(true) => self.positive += 1,
            Some(false) => self.negative += 1,
            None => {}
        }
    }
}

/// Outcome counts for one bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinCount {
    /// Label of the bin.
    pub label: String,
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    #[serde(flatten)]
    pub counts: OutcomeCounts,
}

/// Count rows per bin of `column`, split by outcome.
///
/// Bins keep their input order. A row lands in every bin that contains its
/// value; rows without a value are skipped.
#[must_use]
pub fn binned_crosstab(records: &[StudentRecord], column: Column, bins: &[Bin]) -> Vec<BinCount> {
    let mut counts = vec![OutcomeCounts::default(); bins.len()];
    let mut skipped = 0usize;
    for record in records {
        let Some(value) = record.number(column) else {
            skipped += 1;
            continue;
        };
        for (bin, count) in bins.iter().zip(counts.iter_mut()) {
            if bin.contains(value) {
                count.add(record.depression);
            }
        }
    }
    debug!(column = %column, n_bins = bins.len(), skipped, "crosstab");

    bins.iter()
        .zip(counts)
        .map(|(bin, counts)| BinCount {
            label: bin.label.clone(),
            min: bin.min,
            max: bin.max,
            counts,
        })
        .collect()
}

/// Outcome counts above and below a cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdSplit {
    /// Column the split was made on.
    pub column: Column,
    /// Values at or above this count as high.
    pub cutoff: f64,
    /// Rows with `value >= cutoff`.
    pub high: OutcomeCounts,
    /// Rows with `value < cutoff`.
    pub low: OutcomeCounts,
}

/// Split rows at `cutoff` on `column` and count outcomes on each side.
#[must_use]
pub fn threshold_split(records: &[StudentRecord], column: Column, cutoff: f64) -> ThresholdSplit {
    let mut high = OutcomeCounts::default();
    let mut low = OutcomeCounts::default();
    for record in records {
        match record.number(column) {
            Some(v) if v >= cutoff => high.add(record.depression),
            Some(_) => low.add(record.depression),
            None => {}
        }
    }
    ThresholdSplit {
        column,
        cutoff,
        high,
        low,
    }
}
