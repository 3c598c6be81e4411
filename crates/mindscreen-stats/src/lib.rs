//! Descriptive analytics over the student mental-health dataset.
//!
//! Rows are typed once into [`StudentRecord`]s; every analysis is a pure
//! function over those rows: value distributions, binned cross-tabulation
//! against the outcome, Pearson correlation ranking, and a composite risk
//! score profile. [`analyze`] runs them all from an [`AnalyticsConfig`].

mod config;
mod correlation;
mod crosstab;
mod dataset;
mod distribution;
mod error;
mod record;
mod report;
mod risk;
mod summary;

pub use config::AnalyticsConfig;
pub use correlation::{
    correlation_matrix, correlation_ranking, paired_values, pearson, CorrelationEntry,
    CorrelationMatrix, Direction, Feature, Strength,
};
pub use crosstab::{binned_crosstab, threshold_split, Bin, BinCount, OutcomeCounts, ThresholdSplit};
pub use dataset::Dataset;
pub use distribution::{distribution, outcome_balance, Distribution, DistributionEntry, OutcomeBalance};
pub use error::StatsError;
pub use record::{Cell, Column, ColumnKind, RawRow, StudentRecord, Value};
pub use report::{analyze, AnalyticsReport};
pub use risk::{risk_profile, risk_score, RiskBucket, RiskCategory, RiskInputs, DEFAULT_CGPA};
pub use summary::{summarize, AgeStats, DatasetSummary};
