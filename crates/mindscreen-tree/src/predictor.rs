//! Record-level prediction entry point.

use mindscreen_prep::{
    build_feature_vector, validate_record, FieldIssue, PreprocessingSpec, Record,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::TreeError;
use crate::model::{DecisionTree, ModelArtifact};
use crate::predict::Prediction;

/// How out-of-typical-range numeric inputs are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// Report them as warnings and predict anyway.
    #[default]
    Advisory,
    /// Withhold the prediction until they are resolved.
    Enforce,
}

/// Outcome of assessing one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Assessment {
    /// The record was encoded and scored.
    Predicted {
        /// The tree's verdict.
        prediction: Prediction,
        /// Advisory issues that did not block the prediction.
        warnings: Vec<FieldIssue>,
    },
    /// The record has issues that must be fixed first.
    Rejected {
        /// Per-field issues, in numeric column order.
        issues: Vec<FieldIssue>,
    },
}

impl Assessment {
    /// Return the prediction, if one was made.
    #[must_use]
    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            Assessment::Predicted { prediction, .. } => Some(prediction),
            Assessment::Rejected { .. } => None,
        }
    }
}

/// A preprocessing spec and a decision tree validated as a pair.
///
/// Construct via [`Predictor::new`], optionally chain
/// [`with_range_policy`](Predictor::with_range_policy) (default
/// [`RangePolicy::Advisory`]), then call [`assess`](Predictor::assess) per
/// record. A `Predictor` is immutable and can be shared across threads.
#[derive(Debug, Clone)]
pub struct Predictor {
    spec: PreprocessingSpec,
    tree: DecisionTree,
    range_policy: RangePolicy,
}

impl Predictor {
    /// Validate both artifacts and bind the tree to the spec's feature order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Preprocessing`] for an inconsistent spec, or any
    /// structural error from [`DecisionTree::from_artifact`].
    #[instrument(skip_all)]
    pub fn new(spec: PreprocessingSpec, model: ModelArtifact) -> Result<Self, TreeError> {
        spec.validate()?;
        let tree = DecisionTree::from_artifact(model, spec.final_feature_order.clone())?;
        info!(
            n_features = spec.final_feature_order.len(),
            n_nodes = tree.n_nodes(),
            threshold = tree.threshold(),
            "predictor ready"
        );
        Ok(Self {
            spec,
            tree,
            range_policy: RangePolicy::default(),
        })
    }

    /// Set how out-of-range inputs are treated.
    #[must_use]
    pub fn with_range_policy(mut self, range_policy: RangePolicy) -> Self {
        self.range_policy = range_policy;
        self
    }

    /// Return the range policy.
    #[must_use]
    pub fn range_policy(&self) -> RangePolicy {
        self.range_policy
    }

    /// Return the validated tree.
    #[must_use]
    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    /// Return the preprocessing spec.
    #[must_use]
    pub fn spec(&self) -> &PreprocessingSpec {
        &self.spec
    }

    /// Validate, encode and score one record.
    ///
    /// Non-numeric values in numeric fields always reject the record.
    /// Out-of-range values reject it only under [`RangePolicy::Enforce`];
    /// otherwise they are returned as warnings next to the prediction.
    ///
    /// # Errors
    ///
    /// Only configuration errors, which [`Predictor::new`] already rules out
    /// for a well-formed pair.
    #[instrument(skip_all, fields(n_fields = record.len()))]
    pub fn assess(&self, record: &Record) -> Result<Assessment, TreeError> {
        let issues = validate_record(record, &self.spec);
        let blocked = match self.range_policy {
            RangePolicy::Advisory => issues.iter().any(FieldIssue::is_blocking),
            RangePolicy::Enforce => !issues.is_empty(),
        };
        if blocked {
            warn!(n_issues = issues.len(), "record rejected");
            return Ok(Assessment::Rejected { issues });
        }

        let features = build_feature_vector(record, &self.spec)?;
        let prediction = self.tree.predict(&features)?;
        info!(
            probability = prediction.probability,
            class = prediction.class,
            depth = prediction.path.len(),
            "record assessed"
        );

        Ok(Assessment::Predicted {
            prediction,
            warnings: issues,
        })
    }
}
