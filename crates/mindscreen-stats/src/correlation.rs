//! Pearson correlation, outcome ranking and the pairwise matrix.

use std::cmp::Ordering;
use std::fmt;

use mindscreen_prep::OrdinalScale;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::distribution::round_to;
use crate::error::StatsError;
use crate::record::{Column, StudentRecord};

/// A column read as a number for correlation.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    /// A numeric column (including the outcome, read as `0`/`1`).
    Numeric(Column),
    /// An ordered categorical column mapped through a scale.
    Ordinal {
        /// Column holding the labels.
        column: Column,
        /// Label-to-value mapping.
        scale: OrdinalScale,
    },
}

impl Feature {
    /// Build an ordinal feature from a scale, resolving its column.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`StatsError::UnknownColumn`] | `scale.column` is not a known column |
    pub fn ordinal(scale: OrdinalScale) -> Result<Self, StatsError> {
        let column = Column::from_header(&scale.column).ok_or_else(|| StatsError::UnknownColumn {
            column: scale.column.clone(),
        })?;
        Ok(Feature::Ordinal { column, scale })
    }

    /// The underlying column.
    #[must_use]
    pub fn column(&self) -> Column {
        match self {
            Feature::Numeric(column) | Feature::Ordinal { column, .. } => *column,
        }
    }

    /// Read the feature from one row. Labels missing from the scale read as
    /// missing.
    #[must_use]
    pub fn value(&self, record: &StudentRecord) -> Option<f64> {
        match self {
            Feature::Numeric(column) => record.number(*column),
            Feature::Ordinal { column, scale } => {
                record.text(*column).and_then(|label| scale.lookup(label))
            }
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.column(), f)
    }
}

/// Values of two features over rows where both are present.
#[must_use]
pub fn paired_values(
    records: &[StudentRecord],
    x: &Feature,
    y: &Feature,
) -> (Vec<f64>, Vec<f64>) {
    records
        .iter()
        .filter_map(|r| Some((x.value(r)?, y.value(r)?)))
        .unzip()
}

/// Pearson correlation coefficient of two aligned sequences.
///
/// `r = Σ(x−x̄)(y−ȳ) / sqrt(Σ(x−x̄)²·Σ(y−ȳ)²)`, summed over deviations from
/// the means so large offsets do not cancel. Returns `0` for fewer than two
/// pairs, for a constant sequence, and whenever either sum of squares is
/// not positive. The result is clamped to `[-1, 1]`.
///
/// # Panics
///
/// Panics if `x` and `y` differ in length.
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len(), "pearson needs aligned sequences");
    if is_constant(x) || is_constant(y) {
        return 0.0;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return 0.0;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

// Fewer than two values counts as constant.
fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Strength band of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strength {
    /// `|r| > 0.7`.
    Strong,
    /// `0.4 < |r| <= 0.7`.
    Moderate,
    /// `|r| <= 0.4`.
    Weak,
}

impl Strength {
    /// Classify a coefficient by its magnitude.
    #[must_use]
    pub fn from_r(r: f64) -> Self {
        let abs = r.abs();
        if abs > 0.7 {
            Strength::Strong
        } else if abs > 0.4 {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }
}

/// Sign of a correlation coefficient; zero counts as positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// `r >= 0`.
    Positive,
    /// `r < 0`.
    Negative,
}

impl Direction {
    /// Classify a coefficient by its sign.
    #[must_use]
    pub fn from_r(r: f64) -> Self {
        if r >= 0.0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }
}

/// Correlation of one feature with the outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationEntry {
    /// 1-based position by descending `|r|`.
    pub rank: usize,
    /// Correlated column.
    pub feature: Column,
    /// Coefficient, 4 decimals.
    pub r: f64,
    /// Rows where both the feature and the outcome were present.
    pub n_pairs: usize,
    /// Magnitude band.
    pub strength: Strength,
    /// Sign of `r`.
    pub direction: Direction,
}

/// Correlate every feature with the outcome and rank by `|r|`.
///
/// Features are evaluated in parallel. Equal `|r|` keep their input order.
#[must_use]
#[instrument(skip_all, fields(n_records = records.len(), n_features = features.len()))]
pub fn correlation_ranking(records: &[StudentRecord], features: &[Feature]) -> Vec<CorrelationEntry> {
    let outcome = Feature::Numeric(Column::Depression);
    let mut scored: Vec<(Column, f64, usize)> = features
        .par_iter()
        .map(|feature| {
            let (x, y) = paired_values(records, feature, &outcome);
            (feature.column(), pearson(&x, &y), x.len())
        })
        .collect();

    scored.sort_by(|a, b| b.1.abs().partial_cmp(&a.1.abs()).unwrap_or(Ordering::Equal));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (feature, r, n_pairs))| {
            debug!(feature = %feature, r, n_pairs, "correlation");
            CorrelationEntry {
                rank: i + 1,
                feature,
                r: round_to(r, 4),
                n_pairs,
                strength: Strength::from_r(r),
                direction: Direction::from_r(r),
            }
        })
        .collect()
}

/// Symmetric matrix of pairwise correlations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Row and column order.
    pub features: Vec<Column>,
    /// `values[i][j] = pearson(features[i], features[j])`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Look up the coefficient for a pair of columns.
    #[must_use]
    pub fn get(&self, a: Column, b: Column) -> Option<f64> {
        let i = self.features.iter().position(|&c| c == a)?;
        let j = self.features.iter().position(|&c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Correlate every pair of features, each over rows where both are present.
///
/// Only the upper triangle is computed; rows run in parallel.
#[must_use]
#[instrument(skip_all, fields(n_features = features.len()))]
pub fn correlation_matrix(records: &[StudentRecord], features: &[Feature]) -> CorrelationMatrix {
    let k = features.len();
    let upper: Vec<Vec<f64>> = (0..k)
        .into_par_iter()
        .map(|i| {
            (i..k)
                .map(|j| {
                    let (x, y) = paired_values(records, &features[i], &features[j]);
                    pearson(&x, &y)
                })
                .collect()
        })
        .collect();

    let mut values = vec![vec![0.0; k]; k];
    for (i, row) in upper.iter().enumerate() {
        for (offset, &r) in row.iter().enumerate() {
            let j = i + offset;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        features: features.iter().map(Feature::column).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_linear_relationships() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
        let neg: Vec<f64> = y.iter().map(|v| -v).collect();
        assert!((pearson(&x, &neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn large_offset_small_spread_stays_exact() {
        let x: Vec<f64> = (0..50).map(|i| 1e6 + f64::from(i % 5) * 0.01).collect();
        assert!((pearson(&x, &x) - 1.0).abs() < 1e-9);

        let shifted: Vec<f64> = (0..50).map(|i| 1e8 + f64::from(i % 10) * 1e-3).collect();
        let steps: Vec<f64> = (0..50).map(|i| f64::from(i % 10)).collect();
        assert!((pearson(&shifted, &shifted) - 1.0).abs() < 1e-6);
        assert!((pearson(&shifted, &steps) - 1.0).abs() < 1e-6);
        let flipped: Vec<f64> = steps.iter().map(|v| -v).collect();
        assert!((pearson(&shifted, &flipped) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_inputs_are_zero() {
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn strength_bands() {
        assert_eq!(Strength::from_r(0.71), Strength::Strong);
        assert_eq!(Strength::from_r(-0.7), Strength::Moderate);
        assert_eq!(Strength::from_r(0.41), Strength::Moderate);
        assert_eq!(Strength::from_r(0.4), Strength::Weak);
        assert_eq!(Direction::from_r(0.0), Direction::Positive);
        assert_eq!(Direction::from_r(-0.01), Direction::Negative);
    }

    #[test]
    fn ordinal_feature_reads_quoted_labels() {
        let feature = Feature::ordinal(OrdinalScale::sleep_duration()).unwrap();
        let record = StudentRecord {
            sleep_duration: Some("'5-6 hours'".into()),
            ..StudentRecord::default()
        };
        assert_eq!(feature.value(&record), Some(5.5));
        let other = StudentRecord {
            sleep_duration: Some("Others".into()),
            ..StudentRecord::default()
        };
        assert_eq!(feature.value(&other), None);
    }

    #[test]
    fn unknown_scale_column_is_rejected() {
        let mut scale = OrdinalScale::sleep_duration();
        scale.column = "Nap Length".into();
        assert!(matches!(Feature::ordinal(scale), Err(StatsError::UnknownColumn { .. })));
    }

    #[test]
    fn paired_values_drop_incomplete_rows() {
        let records = [
            StudentRecord {
                age: Some(20.0),
                cgpa: Some(7.0),
                ..StudentRecord::default()
            },
            StudentRecord {
                age: Some(21.0),
                ..StudentRecord::default()
            },
        ];
        let (x, y) = paired_values(
            &records,
            &Feature::Numeric(Column::Age),
            &Feature::Numeric(Column::Cgpa),
        );
        assert_eq!(x, [20.0]);
        assert_eq!(y, [7.0]);
    }

    #[test]
    fn ranking_orders_by_magnitude() {
        let records: Vec<StudentRecord> = (0..10)
            .map(|i| {
                let positive = i % 2 == 0;
                StudentRecord {
                    academic_pressure: Some(if positive { 5.0 } else { 1.0 }),
                    cgpa: Some(if positive { 6.0 } else { 9.0 } + f64::from(i % 3) * 0.5),
                    age: Some(20.0),
                    depression: Some(positive),
                    ..StudentRecord::default()
                }
            })
            .collect();
        let ranking = correlation_ranking(
            &records,
            &[
                Feature::Numeric(Column::Age),
                Feature::Numeric(Column::Cgpa),
                Feature::Numeric(Column::AcademicPressure),
            ],
        );
        assert_eq!(ranking[0].feature, Column::AcademicPressure);
        assert_eq!(ranking[0].rank, 1);
        assert_eq!(ranking[0].r, 1.0);
        assert_eq!(ranking[1].feature, Column::Cgpa);
        assert_eq!(ranking[1].direction, Direction::Negative);
        assert_eq!(ranking[2].feature, Column::Age);
        assert_eq!(ranking[2].r, 0.0);
        assert_eq!(ranking[2].strength, Strength::Weak);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let records: Vec<StudentRecord> = (0..8)
            .map(|i| StudentRecord {
                age: Some(18.0 + f64::from(i)),
                cgpa: Some(10.0 - f64::from(i * i) * 0.1),
                work_study_hours: Some(4.0),
                ..StudentRecord::default()
            })
            .collect();
        let features = [
            Feature::Numeric(Column::Age),
            Feature::Numeric(Column::Cgpa),
            Feature::Numeric(Column::WorkStudyHours),
        ];
        let m = correlation_matrix(&records, &features);
        assert_eq!(m.values[0][1], m.values[1][0]);
        assert!((m.values[0][0] - 1.0).abs() < 1e-12);
        assert_eq!(m.values[2][2], 0.0);
        assert_eq!(m.get(Column::Age, Column::WorkStudyHours), Some(0.0));
    }
}
