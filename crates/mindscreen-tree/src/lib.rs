//! Decision-tree inference for questionnaire screening.
//!
//! Loads an already-trained binary tree from its serialized node array,
//! validates it once against the feature layout of a
//! [`PreprocessingSpec`](mindscreen_prep::PreprocessingSpec), and walks it to
//! produce a probability, a class and the decision path taken.

mod error;
mod model;
mod node;
mod predict;
mod predictor;

pub use error::TreeError;
pub use model::{DecisionTree, ModelArtifact, ModelMetrics, NodeArtifact, TreeArtifact};
pub use node::{FeatureIndex, Node, NodeIndex};
pub use predict::{Branch, PathStep, Prediction, RiskLevel};
pub use predictor::{Assessment, Predictor, RangePolicy};
