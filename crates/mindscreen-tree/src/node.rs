use std::fmt;

/// Zero-based position in a [`FeatureVector`](mindscreen_prep::FeatureVector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureIndex(usize);

impl FeatureIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based feature position.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index into the node arena of a [`DecisionTree`](crate::DecisionTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// The root is always the first node of the arena.
    pub const ROOT: NodeIndex = NodeIndex(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node of a validated decision tree.
///
/// Trees are stored as `Vec<Node>` where children are referenced by
/// [`NodeIndex`] rather than pointers, mirroring the serialized layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An interior split node.
    Split {
        /// Feature compared at this node.
        feature: FeatureIndex,
        /// Samples with `feature <= threshold` go left.
        threshold: f64,
        /// Left child.
        left: NodeIndex,
        /// Right child.
        right: NodeIndex,
    },
    /// A terminal node holding per-class training counts.
    Leaf {
        /// Count (or weight) per class; index 1 is the positive class.
        counts: Vec<f64>,
    },
}

impl Node {
    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Positive-class share of a leaf: `counts[1] / sum(counts)`.
    ///
    /// Returns `None` for split nodes and `Some(0.0)` for a leaf whose counts
    /// sum to zero.
    #[must_use]
    pub fn positive_probability(&self) -> Option<f64> {
        match self {
            Node::Split { .. } => None,
            Node::Leaf { counts } => {
                let total: f64 = counts.iter().sum();
                if total > 0.0 {
                    Some(counts.get(1).copied().unwrap_or(0.0) / total)
                } else {
                    Some(0.0)
                }
            }
        }
    }
}
