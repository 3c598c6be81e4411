//! Record → feature vector encoding.

use tracing::{debug, instrument};

use crate::error::PrepError;
use crate::record::{NumericInput, Record};
use crate::spec::PreprocessingSpec;

/// The fixed-order numeric encoding of one record.
///
/// Length and slot meaning are defined by the [`PreprocessingSpec`] that
/// produced it; the vector cannot be modified after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Return the encoded values.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Return the number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if the vector holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Encode a raw record according to `spec`.
///
/// Numeric columns come first: a missing, blank or non-numeric value is
/// replaced by the column's imputation value. Each categorical column then
/// contributes one slot per vocabulary entry, `1.0` for the entry the record
/// selects and `0.0` elsewhere; a missing or unknown value yields an all-zero
/// block.
///
/// Callers that must reject non-numeric input should run
/// [`validate_record`](crate::validate_record) first; this function never
/// fails on record content.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`PrepError::MissingImputation`] | A numeric column has no fallback value |
/// | [`PrepError::NonFiniteImputation`] | A fallback value is not finite |
/// | [`PrepError::MissingVocabulary`] | A categorical column has no vocabulary |
/// | [`PrepError::FeatureOrderMismatch`] | Encoded width ≠ `final_feature_order.len()` |
#[instrument(skip_all, fields(n_fields = record.len()))]
pub fn build_feature_vector(
    record: &Record,
    spec: &PreprocessingSpec,
) -> Result<FeatureVector, PrepError> {
    let mut features = Vec::with_capacity(spec.final_feature_order.len());

    for column in &spec.numeric_columns {
        let value = match record.get(column).map(|v| v.numeric()) {
            Some(NumericInput::Value(v)) => v,
            Some(NumericInput::Missing | NumericInput::Invalid(_)) | None => {
                let fallback = spec.imputation(column)?;
                debug!(column = %column, fallback, "imputed numeric value");
                fallback
            }
        };
        features.push(value);
    }

    for column in &spec.categorical_columns {
        let vocabulary = spec.vocabulary(column)?;
        let value = record.get(column);
        for category in vocabulary {
            let hit = match (category, value) {
                (Some(category), Some(value)) => category.matches(value),
                _ => false,
            };
            features.push(if hit { 1.0 } else { 0.0 });
        }
    }

    if features.len() != spec.final_feature_order.len() {
        return Err(PrepError::FeatureOrderMismatch {
            encoded: features.len(),
            declared: spec.final_feature_order.len(),
        });
    }

    Ok(FeatureVector(features))
}
