//! JSON loaders for the model, preprocessing and record inputs.

use std::path::Path;

use mindscreen_prep::{PreprocessingSpec, Record};
use mindscreen_tree::ModelArtifact;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::IoError;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, IoError> {
    let file = std::fs::File::open(path).map_err(|e| IoError::FileNotFound {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| IoError::JsonParse {
        path: path.to_path_buf(),
        line: e.line(),
        column: e.column(),
        source: e,
    })
}

/// Load a serialized decision-tree model.
///
/// Only the JSON shape is checked here; structural validation happens in
/// `DecisionTree::from_artifact`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Content is not a model artifact |
#[instrument(fields(path = %path.display()))]
pub fn load_model(path: &Path) -> Result<ModelArtifact, IoError> {
    let model: ModelArtifact = read_json(path)?;
    debug!(n_nodes = model.tree.nodes.len(), threshold = model.threshold, "model loaded");
    Ok(model)
}

/// Load a preprocessing spec.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Content is not a preprocessing spec |
#[instrument(fields(path = %path.display()))]
pub fn load_preprocessing(path: &Path) -> Result<PreprocessingSpec, IoError> {
    let spec: PreprocessingSpec = read_json(path)?;
    debug!(
        n_numeric = spec.numeric_columns.len(),
        n_categorical = spec.categorical_columns.len(),
        n_features = spec.final_feature_order.len(),
        "preprocessing spec loaded"
    );
    Ok(spec)
}

/// Load one input record: a JSON object of column → number, string or null.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Content is not a flat JSON object |
#[instrument(fields(path = %path.display()))]
pub fn load_record(path: &Path) -> Result<Record, IoError> {
    let record: Record = read_json(path)?;
    debug!(n_fields = record.len(), "record loaded");
    Ok(record)
}
