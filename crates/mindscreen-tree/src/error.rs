use mindscreen_prep::PrepError;

/// Errors from tree validation and inference.
///
/// Every variant is a configuration error: the model artifact is malformed or
/// does not match the preprocessing artifact it was paired with. Bad user
/// input never surfaces here; see [`Assessment`](crate::Assessment).
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when the serialized tree has no nodes.
    #[error("tree has no nodes")]
    EmptyTree,

    /// Returned when a node lacks a field its kind requires.
    #[error("node {node} is missing required field \"{field}\"")]
    MissingField {
        /// Arena index of the malformed node.
        node: usize,
        /// Name of the absent field.
        field: &'static str,
    },

    /// Returned when a child index points outside the node array.
    #[error("node {node} references child {child}, but the tree has {n_nodes} nodes")]
    ChildOutOfBounds {
        /// Arena index of the parent.
        node: usize,
        /// The out-of-range child index.
        child: usize,
        /// Number of nodes in the tree.
        n_nodes: usize,
    },

    /// Returned when a split refers to a feature the encoding does not produce.
    #[error("node {node} splits on feature {feature}, but only {n_features} features exist")]
    FeatureOutOfBounds {
        /// Arena index of the split node.
        node: usize,
        /// The out-of-range feature index.
        feature: usize,
        /// Number of features in the layout.
        n_features: usize,
    },

    /// Returned when a node is reachable twice (a cycle or a shared child).
    #[error("node {node} is reachable along more than one path; the node graph is not a tree")]
    NotATree {
        /// Arena index of the node reached twice.
        node: usize,
    },

    /// Returned when a leaf has fewer than two class counts.
    #[error("leaf {node} has {got} class counts, expected at least 2")]
    TooFewClasses {
        /// Arena index of the leaf.
        node: usize,
        /// Number of counts present.
        got: usize,
    },

    /// Returned when a leaf count is negative, NaN or infinite.
    #[error("leaf {node} has an invalid class count {value}")]
    InvalidCount {
        /// Arena index of the leaf.
        node: usize,
        /// The offending count.
        value: f64,
    },

    /// Returned when a split threshold or the decision cutoff is not finite.
    #[error("non-finite threshold {value} at {location}")]
    NonFiniteThreshold {
        /// Where the threshold was found ("decision cutoff" or "node N").
        location: String,
        /// The offending value.
        value: f64,
    },

    /// Returned when a feature vector has the wrong length for this tree.
    #[error("feature vector has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// Number of features the tree was validated against.
        expected: usize,
        /// Length of the supplied vector.
        got: usize,
    },

    /// Wraps an inconsistent preprocessing artifact.
    #[error("invalid preprocessing spec: {0}")]
    Preprocessing(#[from] PrepError),
}
