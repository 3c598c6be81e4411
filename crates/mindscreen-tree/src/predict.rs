//! Tree traversal and the prediction result.

use std::fmt;

use mindscreen_prep::FeatureVector;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::Serialize;
use tracing::{instrument, trace};

use crate::error::TreeError;
use crate::model::DecisionTree;
use crate::node::{Node, NodeIndex};

/// Which child a split sent the record to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    /// `value <= threshold`.
    Left,
    /// `value > threshold`.
    Right,
}

/// One decision taken on the way from the root to a leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStep {
    /// Label of the compared feature (from `final_feature_order`).
    pub feature: String,
    /// The record's encoded value for that feature.
    pub value: f64,
    /// The split threshold.
    pub threshold: f64,
    /// The branch taken.
    pub direction: Branch,
}

/// Coarse label derived from the predicted class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Predicted class 1.
    High,
    /// Predicted class 0.
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => f.write_str("HIGH"),
            RiskLevel::Low => f.write_str("LOW"),
        }
    }
}

/// Result of walking the tree for one feature vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Positive-class share of the reached leaf, in `[0, 1]`.
    pub probability: f64,
    /// `1` iff `probability >= threshold`.
    pub class: u8,
    /// `High` for class 1, `Low` for class 0.
    pub risk_level: RiskLevel,
    /// Decisions from root to leaf.
    pub path: Vec<PathStep>,
}

impl DecisionTree {
    /// Walk the tree for one feature vector.
    ///
    /// Starting at the root, each split compares `features[feature_index]`
    /// with its threshold using `<=` (left) and records the step. At the leaf
    /// the probability is `counts[1] / sum(counts)`, or `0` when the counts
    /// sum to zero.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::FeatureCountMismatch`] when the vector length
    /// differs from the feature layout the tree was validated against.
    ///
    /// # Panics
    ///
    /// Never for a tree built by [`DecisionTree::from_artifact`]; traversal
    /// asserts it visits at most `n_nodes` nodes.
    #[instrument(skip_all, fields(n_features = features.len()))]
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, TreeError> {
        if features.len() != self.feature_labels.len() {
            return Err(TreeError::FeatureCountMismatch {
                expected: self.feature_labels.len(),
                got: features.len(),
            });
        }

        let values = features.as_slice();
        let mut path = Vec::new();
        let mut idx = NodeIndex::ROOT;

        let probability = loop {
            assert!(
                path.len() < self.nodes.len(),
                "traversal exceeded {} nodes; tree validation was bypassed",
                self.nodes.len()
            );
            match &self.nodes[idx.index()] {
                leaf @ Node::Leaf { .. } => {
                    break leaf.positive_probability().unwrap_or(0.0);
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = values[feature.index()];
                    let direction = if value <= *threshold {
                        Branch::Left
                    } else {
                        Branch::Right
                    };
                    trace!(node = %idx, feature = %feature, value, threshold, ?direction, "split");
                    path.push(PathStep {
                        feature: self.feature_labels[feature.index()].clone(),
                        value,
                        threshold: *threshold,
                        direction,
                    });
                    idx = match direction {
                        Branch::Left => *left,
                        Branch::Right => *right,
                    };
                }
            }
        };

        let class = u8::from(probability >= self.threshold);
        let risk_level = if class == 1 {
            RiskLevel::High
        } else {
            RiskLevel::Low
        };

        Ok(Prediction {
            probability,
            class,
            risk_level,
            path,
        })
    }

    /// Predict a batch of feature vectors in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::FeatureCountMismatch`] if any vector has the
    /// wrong length.
    pub fn predict_batch(&self, batch: &[FeatureVector]) -> Result<Vec<Prediction>, TreeError> {
        batch
            .into_par_iter()
            .map(|features| self.predict(features))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::{labels, two_level_artifact};
    use crate::model::{ModelArtifact, ModelMetrics, NodeArtifact, TreeArtifact};

    fn tree() -> DecisionTree {
        DecisionTree::from_artifact(two_level_artifact(), labels(2)).unwrap()
    }

    #[test]
    fn left_leaf_low_risk() {
        let p = tree().predict(&FeatureVector::from(vec![2.0, 9.0])).unwrap();
        assert!((p.probability - 0.2).abs() < 1e-12);
        assert_eq!(p.class, 0);
        assert_eq!(p.risk_level, RiskLevel::Low);
        assert_eq!(p.path.len(), 1);
        assert_eq!(p.path[0].feature, "f0");
        assert_eq!(p.path[0].direction, Branch::Left);
    }

    #[test]
    fn threshold_equality_goes_left() {
        let p = tree().predict(&FeatureVector::from(vec![3.0, 0.0])).unwrap();
        assert_eq!(p.path[0].direction, Branch::Left);
    }

    #[test]
    fn right_subtree_high_risk() {
        let p = tree().predict(&FeatureVector::from(vec![4.0, 0.5])).unwrap();
        assert!((p.probability - 0.7).abs() < 1e-12);
        assert_eq!(p.class, 1);
        assert_eq!(p.risk_level, RiskLevel::High);
        let dirs: Vec<Branch> = p.path.iter().map(|s| s.direction).collect();
        assert_eq!(dirs, [Branch::Right, Branch::Left]);
        assert_eq!(p.path[1].threshold, 0.5);
    }

    #[test]
    fn zero_count_leaf_is_zero_probability() {
        let p = tree().predict(&FeatureVector::from(vec![4.0, 1.0])).unwrap();
        assert_eq!(p.probability, 0.0);
        assert_eq!(p.class, 0);
    }

    #[test]
    fn class_boundary_is_inclusive() {
        let artifact = ModelArtifact {
            tree: TreeArtifact {
                nodes: vec![NodeArtifact::leaf(vec![1.0, 1.0])],
            },
            threshold: 0.5,
            metrics: ModelMetrics::default(),
        };
        let tree = DecisionTree::from_artifact(artifact, labels(1)).unwrap();
        let p = tree.predict(&FeatureVector::from(vec![0.0])).unwrap();
        assert_eq!(p.class, 1);
        assert!(p.path.is_empty());
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = tree().predict(&FeatureVector::from(vec![1.0])).unwrap_err();
        assert!(matches!(
            err,
            TreeError::FeatureCountMismatch { expected: 2, got: 1 }
        ));
    }

    #[test]
    fn batch_matches_single() {
        let tree = tree();
        let batch: Vec<FeatureVector> = (0..20)
            .map(|i| FeatureVector::from(vec![f64::from(i) * 0.5, f64::from(i % 2)]))
            .collect();
        let predictions = tree.predict_batch(&batch).unwrap();
        for (fv, p) in batch.iter().zip(&predictions) {
            assert_eq!(&tree.predict(fv).unwrap(), p);
        }
    }

    #[test]
    fn prediction_serializes_with_display_names() {
        let p = tree().predict(&FeatureVector::from(vec![4.0, 0.5])).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["riskLevel"], "HIGH");
        assert_eq!(json["class"], 1);
        assert_eq!(json["path"][0]["direction"], "right");
    }
}
