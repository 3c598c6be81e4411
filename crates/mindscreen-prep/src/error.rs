//! Configuration errors for preprocessing artifacts.

/// Errors raised when a [`PreprocessingSpec`](crate::PreprocessingSpec) is
/// inconsistent with itself.
///
/// These are configuration errors: the artifact is corrupt or was paired with
/// the wrong model. They are never produced by bad user input, which is
/// reported as [`FieldIssue`](crate::FieldIssue) instead.
#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    /// Returned when a categorical column has no vocabulary entry.
    #[error("categorical column \"{column}\" has no vocabulary")]
    MissingVocabulary {
        /// The categorical column without a vocabulary.
        column: String,
    },

    /// Returned when a numeric column has no imputation value.
    #[error("numeric column \"{column}\" has no imputation value")]
    MissingImputation {
        /// The numeric column without a fallback value.
        column: String,
    },

    /// Returned when an imputation value is NaN or infinite.
    #[error("imputation value for \"{column}\" is not finite: {value}")]
    NonFiniteImputation {
        /// The numeric column.
        column: String,
        /// The offending fallback value.
        value: f64,
    },

    /// Returned when the encoded width disagrees with `final_feature_order`.
    #[error("encoding produces {encoded} features but final_feature_order lists {declared}")]
    FeatureOrderMismatch {
        /// Number of features the numeric + one-hot encoding produces.
        encoded: usize,
        /// Number of labels in `final_feature_order`.
        declared: usize,
    },

    /// Returned when two ordinal scales target the same column.
    #[error("more than one ordinal scale declared for column \"{column}\"")]
    DuplicateScale {
        /// The column with competing scales.
        column: String,
    },
}
