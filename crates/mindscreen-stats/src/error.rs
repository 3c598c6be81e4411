/// Errors from analytics configuration.
///
/// Statistical degeneracies (empty bins, zero variance, empty datasets) are
/// never errors; they produce defined zero results.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// Returned when a bin has non-finite bounds or `min > max`.
    #[error("bin '{label}' has invalid bounds [{min}, {max}]")]
    InvalidBin {
        /// The bin label.
        label: String,
        /// Lower bound as given.
        min: f64,
        /// Upper bound as given.
        max: f64,
    },

    /// Returned when a threshold cutoff is NaN or infinite.
    #[error("cutoff for '{column}' must be finite, got {value}")]
    NonFiniteCutoff {
        /// The column the cutoff applies to.
        column: String,
        /// The offending value.
        value: f64,
    },

    /// Returned when an ordinal scale names a column outside the known set.
    #[error("ordinal scale targets unknown column '{column}'")]
    UnknownColumn {
        /// The unrecognized column name.
        column: String,
    },

    /// Returned when no correlation features are configured.
    #[error("at least one correlation feature is required")]
    NoFeatures,
}
