//! Serialized model artifact and its validated in-memory form.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::TreeError;
use crate::node::{FeatureIndex, Node, NodeIndex};

/// Held-out metrics reported by the training run. Display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Precision of the positive class at the decision cutoff.
    pub precision: f64,
    /// Recall of the positive class at the decision cutoff.
    pub recall: f64,
    /// F1 score of the positive class at the decision cutoff.
    pub f1: f64,
}

/// Leaf counts as exported: either flat or wrapped in one outer array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum LeafValue {
    Flat(Vec<f64>),
    Nested(Vec<Vec<f64>>),
}

impl LeafValue {
    fn into_counts(self) -> Vec<f64> {
        match self {
            LeafValue::Flat(counts) => counts,
            LeafValue::Nested(rows) => rows.into_iter().next().unwrap_or_default(),
        }
    }
}

/// One node as it appears in the model file.
///
/// Exporters disagree on how leaves are marked: some set `is_leaf`, others
/// use negative child indices. Both are accepted; a negative index is the
/// same as an absent one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeArtifact {
    /// Explicit leaf marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_leaf: Option<bool>,
    /// Feature compared at a split.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_index: Option<i64>,
    /// Split threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Left child index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<i64>,
    /// Right child index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<i64>,
    /// Per-class counts of a leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<LeafValue>,
}

impl NodeArtifact {
    /// Build a split node.
    #[must_use]
    pub fn split(feature_index: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self {
            is_leaf: Some(false),
            feature_index: Some(feature_index as i64),
            threshold: Some(threshold),
            left: Some(left as i64),
            right: Some(right as i64),
            value: None,
        }
    }

    /// Build a leaf node from per-class counts.
    #[must_use]
    pub fn leaf(counts: Vec<f64>) -> Self {
        Self {
            is_leaf: Some(true),
            value: Some(LeafValue::Flat(counts)),
            ..Self::default()
        }
    }
}

/// The `tree` object of the model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeArtifact {
    /// Nodes in arena order; node 0 is the root.
    pub nodes: Vec<NodeArtifact>,
}

/// The model file: tree, decision cutoff and reported metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// The serialized tree.
    pub tree: TreeArtifact,
    /// Probability at or above which a record is classified positive.
    pub threshold: f64,
    /// Held-out metrics; absent in some exports.
    #[serde(default)]
    pub metrics: ModelMetrics,
}

/// A decision tree whose structure has been checked against a feature layout.
///
/// Only obtainable through [`DecisionTree::from_artifact`], so traversal can
/// index the arena without re-checking bounds.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) threshold: f64,
    pub(crate) metrics: ModelMetrics,
    pub(crate) feature_labels: Vec<String>,
}

fn non_negative(raw: Option<i64>) -> Option<usize> {
    raw.and_then(|v| usize::try_from(v).ok())
}

impl DecisionTree {
    /// Validate a model artifact against the feature labels of the encoding
    /// it will be fed.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::EmptyTree`] | No nodes |
    /// | [`TreeError::NonFiniteThreshold`] | Cutoff or split threshold is NaN/infinite |
    /// | [`TreeError::MissingField`] | A split lacks feature/threshold/children, or a leaf lacks counts |
    /// | [`TreeError::ChildOutOfBounds`] | A child index is past the end of the arena |
    /// | [`TreeError::FeatureOutOfBounds`] | A split feature is past the end of `feature_labels` |
    /// | [`TreeError::TooFewClasses`] | A leaf has fewer than 2 counts |
    /// | [`TreeError::InvalidCount`] | A leaf count is negative or not finite |
    /// | [`TreeError::NotATree`] | A node is reachable twice (cycle or shared child) |
    #[instrument(skip_all, fields(n_nodes = artifact.tree.nodes.len(), n_features = feature_labels.len()))]
    pub fn from_artifact(
        artifact: ModelArtifact,
        feature_labels: Vec<String>,
    ) -> Result<Self, TreeError> {
        let n_nodes = artifact.tree.nodes.len();
        let n_features = feature_labels.len();

        if n_nodes == 0 {
            return Err(TreeError::EmptyTree);
        }
        if !artifact.threshold.is_finite() {
            return Err(TreeError::NonFiniteThreshold {
                location: "decision cutoff".to_string(),
                value: artifact.threshold,
            });
        }

        let nodes = artifact
            .tree
            .nodes
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| convert_node(idx, raw, n_nodes, n_features))
            .collect::<Result<Vec<Node>, TreeError>>()?;

        let reachable = check_tree_shape(&nodes)?;
        if reachable < n_nodes {
            warn!(
                unreachable = n_nodes - reachable,
                "model contains nodes not reachable from the root"
            );
        }

        let tree = Self {
            nodes,
            threshold: artifact.threshold,
            metrics: artifact.metrics,
            feature_labels,
        };

        debug!(
            n_nodes = tree.n_nodes(),
            n_leaves = tree.n_leaves(),
            depth = tree.depth(),
            threshold = tree.threshold,
            "decision tree validated"
        );

        Ok(tree)
    }

    /// Return the node arena.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the decision cutoff.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Return the reported training metrics.
    #[must_use]
    pub fn metrics(&self) -> ModelMetrics {
        self.metrics
    }

    /// Return the feature labels the tree was validated against.
    #[must_use]
    pub fn feature_labels(&self) -> &[String] {
        &self.feature_labels
    }

    /// Return the total number of nodes (splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum depth reachable from the root.
    ///
    /// A single-leaf tree has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0usize;
        let mut stack = vec![(NodeIndex::ROOT, 0usize)];

        while let Some((idx, d)) = stack.pop() {
            match &self.nodes[idx.index()] {
                Node::Leaf { .. } => max_depth = max_depth.max(d),
                Node::Split { left, right, .. } => {
                    stack.push((*left, d + 1));
                    stack.push((*right, d + 1));
                }
            }
        }

        max_depth
    }
}

fn convert_node(
    idx: usize,
    raw: NodeArtifact,
    n_nodes: usize,
    n_features: usize,
) -> Result<Node, TreeError> {
    let left = non_negative(raw.left);
    let right = non_negative(raw.right);
    let is_leaf = raw
        .is_leaf
        .unwrap_or(left.is_none() && right.is_none());

    if is_leaf {
        let counts = raw
            .value
            .map(LeafValue::into_counts)
            .ok_or(TreeError::MissingField {
                node: idx,
                field: "value",
            })?;
        if counts.len() < 2 {
            return Err(TreeError::TooFewClasses {
                node: idx,
                got: counts.len(),
            });
        }
        if let Some(&bad) = counts.iter().find(|c| !c.is_finite() || **c < 0.0) {
            return Err(TreeError::InvalidCount {
                node: idx,
                value: bad,
            });
        }
        return Ok(Node::Leaf { counts });
    }

    let feature = non_negative(raw.feature_index).ok_or(TreeError::MissingField {
        node: idx,
        field: "feature_index",
    })?;
    if feature >= n_features {
        return Err(TreeError::FeatureOutOfBounds {
            node: idx,
            feature,
            n_features,
        });
    }

    let threshold = raw.threshold.ok_or(TreeError::MissingField {
        node: idx,
        field: "threshold",
    })?;
    if !threshold.is_finite() {
        return Err(TreeError::NonFiniteThreshold {
            location: format!("node {idx}"),
            value: threshold,
        });
    }

    let left = left.ok_or(TreeError::MissingField {
        node: idx,
        field: "left",
    })?;
    let right = right.ok_or(TreeError::MissingField {
        node: idx,
        field: "right",
    })?;
    for child in [left, right] {
        if child >= n_nodes {
            return Err(TreeError::ChildOutOfBounds {
                node: idx,
                child,
                n_nodes,
            });
        }
    }

    Ok(Node::Split {
        feature: FeatureIndex::new(feature),
        threshold,
        left: NodeIndex::new(left),
        right: NodeIndex::new(right),
    })
}

/// Walk the arena from the root and reject any node reached twice.
///
/// Returns the number of reachable nodes.
fn check_tree_shape(nodes: &[Node]) -> Result<usize, TreeError> {
    let mut visited = vec![false; nodes.len()];
    let mut stack = vec![NodeIndex::ROOT];
    let mut reachable = 0usize;

    while let Some(idx) = stack.pop() {
        let i = idx.index();
        if visited[i] {
            return Err(TreeError::NotATree { node: i });
        }
        visited[i] = true;
        reachable += 1;

        if let Node::Split { left, right, .. } = &nodes[i] {
            stack.push(*right);
            stack.push(*left);
        }
    }

    Ok(reachable)
}
