//! One-call analytics over a dataset.

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::AnalyticsConfig;
use crate::correlation::{
    correlation_matrix, correlation_ranking, CorrelationEntry, CorrelationMatrix,
};
use crate::crosstab::{binned_crosstab, threshold_split, BinCount, ThresholdSplit};
use crate::dataset::Dataset;
use crate::distribution::{distribution, Distribution};
use crate::error::StatsError;
use crate::record::Column;
use crate::risk::{risk_profile, RiskBucket};
use crate::summary::{summarize, DatasetSummary};

/// Every analysis of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    /// Record counts, feature counts and outcome balance.
    pub summary: DatasetSummary,
    /// One per configured distribution column.
    pub distributions: Vec<Distribution>,
    /// Outcome counts per age bin.
    pub age_groups: Vec<BinCount>,
    /// Outcome counts per CGPA bin.
    pub cgpa_groups: Vec<BinCount>,
    /// High/low split on Academic Pressure.
    pub academic_pressure: ThresholdSplit,
    /// Features ranked by `|r|` against the outcome.
    pub correlations: Vec<CorrelationEntry>,
    /// Pairwise correlations of the configured features.
    pub correlation_matrix: CorrelationMatrix,
    /// Five buckets, lowest risk first.
    pub risk_profile: Vec<RiskBucket>,
}

/// Run every analysis in `config` over `dataset`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | Any from [`AnalyticsConfig::validate`] | The configuration is invalid |
#[instrument(skip_all, fields(n_records = dataset.len()))]
pub fn analyze(dataset: &Dataset, config: &AnalyticsConfig) -> Result<AnalyticsReport, StatsError> {
    config.validate()?;
    let records = dataset.records();

    let summary = summarize(dataset);
    let distributions = config
        .distribution_columns()
        .iter()
        .map(|&column| distribution(records, column))
        .collect();
    let age_groups = binned_crosstab(records, Column::Age, config.age_bins());
    let cgpa_groups = binned_crosstab(records, Column::Cgpa, config.cgpa_bins());
    let academic_pressure =
        threshold_split(records, Column::AcademicPressure, config.pressure_cutoff());
    let correlations = correlation_ranking(records, config.correlation_features());
    let correlation_matrix = correlation_matrix(records, config.correlation_features());
    let risk_profile = risk_profile(records);

    info!(
        positive = summary.outcome.positive,
        negative = summary.outcome.negative,
        top_feature = correlations.first().map(|c| c.feature.header()),
        "analytics complete"
    );

    Ok(AnalyticsReport {
        summary,
        distributions,
        age_groups,
        cgpa_groups,
        academic_pressure,
        correlations,
        correlation_matrix,
        risk_profile,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StudentRecord;

    fn dataset() -> Dataset {
        let records = (0..20)
            .map(|i| StudentRecord {
                id: Some(f64::from(i)),
                age: Some(18.0 + f64::from(i)),
                academic_pressure: Some(f64::from(i % 5 + 1)),
                cgpa: Some(5.5 + f64::from(i % 4)),
                sleep_duration: Some("'7-8 hours'".into()),
                depression: Some(i % 5 >= 3),
                ..StudentRecord::default()
            })
            .collect();
        let headers = ["id", "Age", "Academic Pressure", "CGPA", "Sleep Duration", "Depression"]
            .into_iter()
            .map(String::from)
            .collect();
        Dataset::new(headers, records)
    }

    #[test]
    fn report_covers_every_section() {
        let report = analyze(&dataset(), &AnalyticsConfig::new()).unwrap();
        assert_eq!(report.summary.total_records, 20);
        assert_eq!(report.distributions.len(), 4);
        assert_eq!(report.age_groups.len(), 4);
        assert_eq!(report.cgpa_groups.len(), 4);
        assert_eq!(report.correlations.len(), 9);
        assert_eq!(report.correlation_matrix.features.len(), 9);
        assert_eq!(report.risk_profile.len(), 5);
        assert_eq!(report.correlations[0].feature, Column::AcademicPressure);
        assert_eq!(
            report.academic_pressure.high.total + report.academic_pressure.low.total,
            20
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AnalyticsConfig::new().with_pressure_cutoff(f64::INFINITY);
        assert!(analyze(&dataset(), &config).is_err());
    }
}
