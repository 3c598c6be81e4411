//! Configuration for the full analytics run.

use mindscreen_prep::OrdinalScale;

use crate::correlation::Feature;
use crate::crosstab::Bin;
use crate::error::StatsError;
use crate::record::Column;

// Default bounds are literals that always pass `Bin::new`.
fn bins(bounds: &[(&str, f64, f64)]) -> Vec<Bin> {
    bounds
        .iter()
        .filter_map(|&(label, min, max)| Bin::new(label, min, max).ok())
        .collect()
}

/// Bins, cutoffs and features used by [`analyze`](crate::analyze).
///
/// Construct via [`AnalyticsConfig::new`], then chain `with_*` methods to
/// override defaults.
///
/// # Defaults
///
/// | Parameter | Default |
/// |---|---|
/// | `age_bins` | `18-22`, `23-27`, `28-32`, `33+` (33 to 100) |
/// | `cgpa_bins` | `<6` [0,6], `6-7` [6,7], `7-8` [7,8], `8+` [8,10] |
/// | `pressure_cutoff` | 4.0 on Academic Pressure |
/// | `distribution_columns` | Depression, Family History, Gender, Sleep Duration |
/// | `correlation_features` | Age, Academic Pressure, Work Pressure, CGPA, Study Satisfaction, Job Satisfaction, Work/Study Hours, Financial Stress, Sleep Duration (sleep scale v1) |
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub(crate) age_bins: Vec<Bin>,
    pub(crate) cgpa_bins: Vec<Bin>,
    pub(crate) pressure_cutoff: f64,
    pub(crate) distribution_columns: Vec<Column>,
    pub(crate) correlation_features: Vec<Feature>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsConfig {
    /// Create a configuration with the defaults above.
    #[must_use]
    pub fn new() -> Self {
        let sleep = OrdinalScale::sleep_duration();
        let mut correlation_features: Vec<Feature> = [
            Column::Age,
            Column::AcademicPressure,
            Column::WorkPressure,
            Column::Cgpa,
            Column::StudySatisfaction,
            Column::JobSatisfaction,
            Column::WorkStudyHours,
            Column::FinancialStress,
        ]
        .into_iter()
        .map(Feature::Numeric)
        .collect();
        correlation_features.push(Feature::Ordinal {
            column: Column::SleepDuration,
            scale: sleep,
        });

        Self {
            age_bins: bins(&[
                ("18-22", 18.0, 22.0),
                ("23-27", 23.0, 27.0),
                ("28-32", 28.0, 32.0),
                ("33+", 33.0, 100.0),
            ]),
            cgpa_bins: bins(&[
                ("<6", 0.0, 6.0),
                ("6-7", 6.0, 7.0),
                ("7-8", 7.0, 8.0),
                ("8+", 8.0, 10.0),
            ]),
            pressure_cutoff: 4.0,
            distribution_columns: vec![
                Column::Depression,
                Column::FamilyHistory,
                Column::Gender,
                Column::SleepDuration,
            ],
            correlation_features,
        }
    }

    /// Replace the age bins.
    #[must_use]
    pub fn with_age_bins(mut self, age_bins: Vec<Bin>) -> Self {
        self.age_bins = age_bins;
        self
    }

    /// Replace the CGPA bins.
    #[must_use]
    pub fn with_cgpa_bins(mut self, cgpa_bins: Vec<Bin>) -> Self {
        self.cgpa_bins = cgpa_bins;
        self
    }

    /// Set the Academic Pressure cutoff separating high from low.
    #[must_use]
    pub fn with_pressure_cutoff(mut self, pressure_cutoff: f64) -> Self {
        self.pressure_cutoff = pressure_cutoff;
        self
    }

    /// Replace the columns reported as value distributions.
    #[must_use]
    pub fn with_distribution_columns(mut self, columns: Vec<Column>) -> Self {
        self.distribution_columns = columns;
        self
    }

    /// Replace the features correlated with the outcome.
    #[must_use]
    pub fn with_correlation_features(mut self, features: Vec<Feature>) -> Self {
        self.correlation_features = features;
        self
    }

    /// Use `scale` for its column, replacing any feature on that column.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`StatsError::UnknownColumn`] | `scale.column` is not a known column |
    pub fn with_ordinal_scale(mut self, scale: OrdinalScale) -> Result<Self, StatsError> {
        let feature = Feature::ordinal(scale)?;
        let column = feature.column();
        match self
            .correlation_features
            .iter()
            .position(|f| f.column() == column)
        {
            Some(i) => self.correlation_features[i] = feature,
            None => self.correlation_features.push(feature),
        }
        Ok(self)
    }

    /// Return the age bins.
    #[must_use]
    pub fn age_bins(&self) -> &[Bin] {
        &self.age_bins
    }

    /// Return the CGPA bins.
    #[must_use]
    pub fn cgpa_bins(&self) -> &[Bin] {
        &self.cgpa_bins
    }

    /// Return the Academic Pressure cutoff.
    #[must_use]
    pub fn pressure_cutoff(&self) -> f64 {
        self.pressure_cutoff
    }

    /// Return the columns reported as value distributions.
    #[must_use]
    pub fn distribution_columns(&self) -> &[Column] {
        &self.distribution_columns
    }

    /// Return the features correlated with the outcome.
    #[must_use]
    pub fn correlation_features(&self) -> &[Feature] {
        &self.correlation_features
    }

    /// Check the configuration before a run.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`StatsError::NonFiniteCutoff`] | The pressure cutoff is NaN or infinite |
    /// | [`StatsError::NoFeatures`] | No correlation features are configured |
    pub fn validate(&self) -> Result<(), StatsError> {
        if !self.pressure_cutoff.is_finite() {
            return Err(StatsError::NonFiniteCutoff {
                column: Column::AcademicPressure.header().to_string(),
                value: self.pressure_cutoff,
            });
        }
        if self.correlation_features.is_empty() {
            return Err(StatsError::NoFeatures);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AnalyticsConfig::new();
        config.validate().unwrap();
        assert_eq!(config.age_bins().len(), 4);
        assert_eq!(config.age_bins()[3].max(), 100.0);
        assert_eq!(config.cgpa_bins().len(), 4);
        assert_eq!(config.cgpa_bins()[1].label(), "6-7");
        assert_eq!(config.pressure_cutoff(), 4.0);
        assert_eq!(config.correlation_features().len(), 9);
        assert_eq!(
            config.correlation_features()[8].column(),
            Column::SleepDuration
        );
    }

    #[test]
    fn ordinal_scale_replaces_existing_feature() {
        let mut scale = OrdinalScale::sleep_duration();
        scale.version = 2;
        let config = AnalyticsConfig::new().with_ordinal_scale(scale).unwrap();
        assert_eq!(config.correlation_features().len(), 9);
        match &config.correlation_features()[8] {
            Feature::Ordinal { scale, .. } => assert_eq!(scale.version, 2),
            other => panic!("expected ordinal feature, got {other:?}"),
        }
    }

    #[test]
    fn invalid_settings_fail_validation() {
        let bad_cutoff = AnalyticsConfig::new().with_pressure_cutoff(f64::NAN);
        assert!(matches!(
            bad_cutoff.validate(),
            Err(StatsError::NonFiniteCutoff { .. })
        ));

        let no_features = AnalyticsConfig::new().with_correlation_features(Vec::new());
        assert!(matches!(no_features.validate(), Err(StatsError::NoFeatures)));
    }
}
