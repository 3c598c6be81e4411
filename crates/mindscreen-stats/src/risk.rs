//! Composite risk score and per-category outcome profile.
//!
//! The score is a fixed weighted sum of five questionnaire answers:
//!
//! | Term | Contribution |
//! |---|---|
//! | Academic Pressure | `value * 2` |
//! | Financial Stress | `value * 2` |
//! | Work/Study Hours | 3 if > 8, 2 if > 6, 1 if > 4, else 0 |
//! | Family History | 5 if `Yes` |
//! | CGPA | 3 if < 6, 2 if < 7, 1 if < 8, else 0 (missing reads as 7) |

use std::fmt;

use serde::{Serialize, Serializer};

use crate::distribution::{percentage, round_to};
use crate::record::StudentRecord;

/// CGPA assumed when the field is missing.
pub const DEFAULT_CGPA: f64 = 7.0;

/// The five answers the risk score is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskInputs {
    /// Academic pressure, 0 to 5.
    pub academic_pressure: Option<f64>,
    /// Financial stress, 1 to 5.
    pub financial_stress: Option<f64>,
    /// Daily work or study hours.
    pub work_study_hours: Option<f64>,
    /// Raw family-history answer; only `Yes` scores.
    pub family_history: Option<String>,
    /// Missing reads as [`DEFAULT_CGPA`].
    pub cgpa: Option<f64>,
}

impl RiskInputs {
    /// Pick the scored fields out of a row.
    #[must_use]
    pub fn from_record(record: &StudentRecord) -> Self {
        Self {
            academic_pressure: record.academic_pressure,
            financial_stress: record.financial_stress,
            work_study_hours: record.work_study_hours,
            family_history: record.family_history.clone(),
            cgpa: record.cgpa,
        }
    }
}

fn hours_bonus(hours: f64) -> f64 {
    if hours > 8.0 {
        3.0
    } else if hours > 6.0 {
        2.0
    } else if hours > 4.0 {
        1.0
    } else {
        0.0
    }
}

fn cgpa_penalty(cgpa: f64) -> f64 {
    if cgpa < 6.0 {
        3.0
    } else if cgpa < 7.0 {
        2.0
    } else if cgpa < 8.0 {
        1.0
    } else {
        0.0
    }
}

/// Compute the composite score. Missing inputs other than CGPA add nothing.
#[must_use]
pub fn risk_score(inputs: &RiskInputs) -> f64 {
    let family = match inputs.family_history.as_deref().map(str::trim) {
        Some("Yes") => 5.0,
        _ => 0.0,
    };
    inputs.academic_pressure.unwrap_or(0.0) * 2.0
        + inputs.financial_stress.unwrap_or(0.0) * 2.0
        + inputs.work_study_hours.map_or(0.0, hours_bonus)
        + family
        + cgpa_penalty(inputs.cgpa.unwrap_or(DEFAULT_CGPA))
}

/// Ordered risk bands over the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskCategory {
    /// `< 5`.
    VeryLow,
    /// `[5, 10)`.
    Low,
    /// `[10, 15)`.
    Moderate,
    /// `[15, 20)`.
    High,
    /// `>= 20`.
    VeryHigh,
}

impl RiskCategory {
    /// All categories, lowest first.
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::VeryLow,
        RiskCategory::Low,
        RiskCategory::Moderate,
        RiskCategory::High,
        RiskCategory::VeryHigh,
    ];

    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 20.0 {
            RiskCategory::VeryHigh
        } else if score >= 15.0 {
            RiskCategory::High
        } else if score >= 10.0 {
            RiskCategory::Moderate
        } else if score >= 5.0 {
            RiskCategory::Low
        } else {
            RiskCategory::VeryLow
        }
    }

    /// Display label, e.g. `Very High Risk`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::VeryLow => "Very Low Risk",
            RiskCategory::Low => "Low Risk",
            RiskCategory::Moderate => "Moderate Risk",
            RiskCategory::High => "High Risk",
            RiskCategory::VeryHigh => "Very High Risk",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RiskCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Aggregate over the rows falling in one risk category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskBucket {
    /// Category the bucket covers.
    pub category: RiskCategory,
    /// Rows scored into the category.
    pub count: usize,
    /// Rows in the bucket with a positive outcome.
    pub positive: usize,
    /// `positive / count * 100`, 2 decimals.
    pub outcome_rate: f64,
    /// Mean score in the bucket, 2 decimals.
    pub mean_score: f64,
}

/// Score every row and aggregate per category.
///
/// All five categories are returned in ascending order; empty ones report
/// zeros.
#[must_use]
pub fn risk_profile(records: &[StudentRecord]) -> Vec<RiskBucket> {
    let mut count = [0usize; 5];
    let mut positive = [0usize; 5];
    let mut score_sum = [0.0f64; 5];

    for record in records {
        let score = risk_score(&RiskInputs::from_record(record));
        let slot = RiskCategory::from_score(score) as usize;
        count[slot] += 1;
        score_sum[slot] += score;
        if record.depression == Some(true) {
            positive[slot] += 1;
        }
    }

    RiskCategory::ALL
        .into_iter()
        .enumerate()
        .map(|(slot, category)| RiskBucket {
            category,
            count: count[slot],
            positive: positive[slot],
            outcome_rate: percentage(positive[slot], count[slot]),
            mean_score: if count[slot] == 0 {
                0.0
            } else {
                round_to(score_sum[slot] / count[slot] as f64, 2)
            },
        })
        .collect()
}
