//! The preprocessing artifact shipped alongside a trained tree.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::PrepError;
use crate::record::{InputValue, NumericInput};
use crate::scale::OrdinalScale;

/// One vocabulary entry of a categorical column.
///
/// Vocabularies exported from a training pipeline mix strings and numbers
/// (rating questions are stored as `1.0 ..= 5.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    /// A numeric category such as a rating.
    Number(f64),
    /// A textual category.
    Text(String),
}

impl Category {
    /// Return `true` if `value` selects this category.
    ///
    /// Text compares trimmed and exact, numbers compare numerically, and a
    /// text/number pair compares after parsing the text.
    #[must_use]
    pub fn matches(&self, value: &InputValue) -> bool {
        match (self, value) {
            (Category::Text(c), InputValue::Text(v)) => c.trim() == v.trim(),
            (Category::Number(c), InputValue::Number(v)) => c == v,
            (Category::Number(c), InputValue::Text(_)) => {
                matches!(value.numeric(), NumericInput::Value(v) if v == *c)
            }
            (Category::Text(c), InputValue::Number(v)) => {
                c.trim().parse::<f64>().is_ok_and(|parsed| parsed == *v)
            }
        }
    }
}

/// Training-set range of a numeric column, used only for advisory checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    /// Smallest value seen in training.
    pub min: f64,
    /// Largest value seen in training.
    pub max: f64,
}

impl NumericRange {
    /// Return `true` if `value` lies inside the permissive band
    /// `[min * 0.5, max * 2]`.
    #[must_use]
    pub fn is_typical(&self, value: f64) -> bool {
        value >= self.min * 0.5 && value <= self.max * 2.0
    }
}

/// Declared imputation and encoding rules for one trained model.
///
/// The feature vector is laid out as every numeric column (in
/// `numeric_columns` order) followed by one one-hot block per categorical
/// column (in `categorical_columns` order, slots in vocabulary order).
/// `final_feature_order` names each slot and must have exactly that length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingSpec {
    /// Numeric columns, in encoding order.
    #[serde(alias = "numeric")]
    pub numeric_columns: Vec<String>,
    /// Categorical columns, in encoding order.
    #[serde(alias = "categorical")]
    pub categorical_columns: Vec<String>,
    /// One-hot vocabulary per categorical column; `null` entries never match.
    pub categorical_vocabulary: BTreeMap<String, Vec<Option<Category>>>,
    /// Fallback value per numeric column.
    pub numeric_imputation: BTreeMap<String, f64>,
    /// Training ranges per numeric column.
    #[serde(default)]
    pub numeric_ranges_train: BTreeMap<String, NumericRange>,
    /// Human-readable feature labels aligned with the tree's feature indices.
    pub final_feature_order: Vec<String>,
    /// Ordinal tables versioned with this artifact.
    #[serde(default)]
    pub ordinal_scales: Vec<OrdinalScale>,
}

impl PreprocessingSpec {
    /// Check the artifact for internal consistency.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`PrepError::MissingImputation`] | A numeric column has no fallback value |
    /// | [`PrepError::NonFiniteImputation`] | A fallback value is NaN or infinite |
    /// | [`PrepError::MissingVocabulary`] | A categorical column has no vocabulary |
    /// | [`PrepError::FeatureOrderMismatch`] | Encoded width ≠ `final_feature_order.len()` |
    /// | [`PrepError::DuplicateScale`] | Two ordinal scales name the same column |
    #[instrument(skip(self), fields(
        n_numeric = self.numeric_columns.len(),
        n_categorical = self.categorical_columns.len()
    ))]
    pub fn validate(&self) -> Result<(), PrepError> {
        for column in &self.numeric_columns {
            self.imputation(column)?;
        }

        let encoded = self.encoded_width()?;
        if encoded != self.final_feature_order.len() {
            return Err(PrepError::FeatureOrderMismatch {
                encoded,
                declared: self.final_feature_order.len(),
            });
        }

        let mut seen = HashSet::new();
        for scale in &self.ordinal_scales {
            if !seen.insert(scale.column.as_str()) {
                return Err(PrepError::DuplicateScale {
                    column: scale.column.clone(),
                });
            }
        }

        debug!(n_features = encoded, "preprocessing spec validated");
        Ok(())
    }

    /// Number of features the encoding produces.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::MissingVocabulary`] if a categorical column has no
    /// vocabulary.
    pub fn encoded_width(&self) -> Result<usize, PrepError> {
        let mut width = self.numeric_columns.len();
        for column in &self.categorical_columns {
            width += self.vocabulary(column)?.len();
        }
        Ok(width)
    }

    /// Return the vocabulary of a categorical column.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::MissingVocabulary`] if none is declared.
    pub fn vocabulary(&self, column: &str) -> Result<&[Option<Category>], PrepError> {
        self.categorical_vocabulary
            .get(column)
            .map(Vec::as_slice)
            .ok_or_else(|| PrepError::MissingVocabulary {
                column: column.to_string(),
            })
    }

    /// Return the fallback value of a numeric column.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::MissingImputation`] if none is declared, or
    /// [`PrepError::NonFiniteImputation`] if it is not finite.
    pub fn imputation(&self, column: &str) -> Result<f64, PrepError> {
        let value = *self
            .numeric_imputation
            .get(column)
            .ok_or_else(|| PrepError::MissingImputation {
                column: column.to_string(),
            })?;
        if !value.is_finite() {
            return Err(PrepError::NonFiniteImputation {
                column: column.to_string(),
                value,
            });
        }
        Ok(value)
    }

    /// Return the ordinal scale declared for `column`, if any.
    #[must_use]
    pub fn ordinal_scale(&self, column: &str) -> Option<&OrdinalScale> {
        self.ordinal_scales.iter().find(|s| s.column == column)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use serde_json::json;

    use super::*;

    /// A small two-numeric, two-categorical spec used across the crate's tests.
    pub(crate) fn sample_spec() -> PreprocessingSpec {
        serde_json::from_value(json!({
            "numeric": ["Age", "CGPA"],
            "categorical": ["Gender", "Financial Stress"],
            "categorical_vocabulary": {
                "Gender": ["Female", "Male"],
                "Financial Stress": [1.0, 2.0, 3.0, 4.0, 5.0, null]
            },
            "numeric_imputation": { "Age": 25.0, "CGPA": 7.5 },
            "numeric_ranges_train": {
                "Age": { "min": 18.0, "max": 59.0 },
                "CGPA": { "min": 5.0, "max": 10.0 }
            },
            "final_feature_order": [
                "Age", "CGPA",
                "Gender_Female", "Gender_Male",
                "Financial Stress_1.0", "Financial Stress_2.0", "Financial Stress_3.0",
                "Financial Stress_4.0", "Financial Stress_5.0", "Financial Stress_nan"
            ]
        }))
        .unwrap()
    }

    #[test]
    fn sample_spec_is_valid() {
        let spec = sample_spec();
        spec.validate().unwrap();
        assert_eq!(spec.encoded_width().unwrap(), 10);
    }

    #[test]
    fn long_field_names_are_accepted() {
        let spec: PreprocessingSpec = serde_json::from_value(json!({
            "numeric_columns": ["Age"],
            "categorical_columns": [],
            "categorical_vocabulary": {},
            "numeric_imputation": { "Age": 20.0 },
            "final_feature_order": ["Age"]
        }))
        .unwrap();
        spec.validate().unwrap();
        assert!(spec.numeric_ranges_train.is_empty());
    }

    #[test]
    fn feature_order_mismatch_is_rejected() {
        let mut spec = sample_spec();
        spec.final_feature_order.pop();
        assert!(matches!(
            spec.validate(),
            Err(PrepError::FeatureOrderMismatch {
                encoded: 10,
                declared: 9
            })
        ));
    }

    #[test]
    fn missing_vocabulary_is_rejected() {
        let mut spec = sample_spec();
        spec.categorical_vocabulary.remove("Gender");
        assert!(matches!(
            spec.validate(),
            Err(PrepError::MissingVocabulary { column }) if column == "Gender"
        ));
    }

    #[test]
    fn missing_imputation_is_rejected() {
        let mut spec = sample_spec();
        spec.numeric_imputation.remove("CGPA");
        assert!(matches!(
            spec.validate(),
            Err(PrepError::MissingImputation { column }) if column == "CGPA"
        ));
    }

    #[test]
    fn duplicate_scales_are_rejected() {
        let mut spec = sample_spec();
        spec.ordinal_scales = vec![OrdinalScale::sleep_duration(), OrdinalScale::sleep_duration()];
        assert!(matches!(spec.validate(), Err(PrepError::DuplicateScale { .. })));
    }

    #[test]
    fn category_matching_across_types() {
        assert!(Category::Number(3.0).matches(&InputValue::from("3")));
        assert!(Category::Text("3".into()).matches(&InputValue::Number(3.0)));
        assert!(Category::Text("Male".into()).matches(&InputValue::from(" Male ")));
        assert!(!Category::Text("Male".into()).matches(&InputValue::from("male")));
        assert!(!Category::Number(3.0).matches(&InputValue::from("three")));
    }

    #[test]
    fn typical_range_band() {
        let range = NumericRange { min: 18.0, max: 59.0 };
        assert!(range.is_typical(9.0));
        assert!(range.is_typical(118.0));
        assert!(!range.is_typical(8.9));
        assert!(!range.is_typical(118.1));
    }
}
