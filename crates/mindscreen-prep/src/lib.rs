//! Feature preprocessing for decision-tree screening.
//!
//! Turns a raw questionnaire record (column name → value) into the fixed-order
//! numeric feature vector a trained tree expects, using the imputation and
//! one-hot rules declared in a [`PreprocessingSpec`]. Also hosts the
//! versioned [`OrdinalScale`] tables used to treat ordered categories as
//! numbers.

mod encode;
mod error;
mod record;
mod scale;
mod spec;
mod validate;

pub use encode::{build_feature_vector, FeatureVector};
pub use error::PrepError;
pub use record::{InputValue, NumericInput, Record};
pub use scale::{OrdinalLevel, OrdinalScale};
pub use spec::{Category, NumericRange, PreprocessingSpec};
pub use validate::{validate_record, FieldIssue, IssueKind};
