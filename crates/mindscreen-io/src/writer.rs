//! JSON report writer for prediction and analytics outputs.

use std::fs;
use std::path::{Path, PathBuf};

use mindscreen_stats::AnalyticsReport;
use mindscreen_tree::{Assessment, DecisionTree, ModelMetrics};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{ReportKind, ReportName};
use crate::IoError;

/// Writes prediction and analytics reports to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{report}_prediction.json` and
/// `{report}_analytics.json`.
pub struct ReportWriter {
    output_dir: PathBuf,
    report: ReportName,
}

impl ReportWriter {
    /// Create a new writer targeting the given directory and report name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), report = %report))]
    pub fn new(output_dir: &Path, report: ReportName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            report,
        })
    }

    /// Write a record assessment to `{report}_prediction.json`, alongside
    /// the model's threshold, size and display metrics.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The report cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all)]
    pub fn write_prediction(
        &self,
        tree: &DecisionTree,
        assessment: &Assessment,
    ) -> Result<PathBuf, IoError> {
        let artifact = PredictionArtifact {
            report: self.report.as_str(),
            model: ModelSummary {
                threshold: tree.threshold(),
                n_nodes: tree.n_nodes(),
                n_leaves: tree.n_leaves(),
                depth: tree.depth(),
                metrics: tree.metrics(),
            },
            assessment,
        };
        self.write(ReportKind::Prediction, &artifact)
    }

    /// Write an analytics report to `{report}_analytics.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The report cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all)]
    pub fn write_analytics(&self, source: &Path, analytics: &AnalyticsReport) -> Result<PathBuf, IoError> {
        let artifact = AnalyticsArtifact {
            report: self.report.as_str(),
            source: source.display().to_string(),
            analytics,
        };
        self.write(ReportKind::Analytics, &artifact)
    }

    fn write<T: Serialize>(&self, kind: ReportKind, artifact: &T) -> Result<PathBuf, IoError> {
        let path = self.output_dir.join(self.report.file_name(kind));
        let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        info!(path = %path.display(), kind = kind.suffix(), "report written");
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Serialization shadow structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ModelSummary {
    threshold: f64,
    n_nodes: usize,
    n_leaves: usize,
    depth: usize,
    metrics: ModelMetrics,
}

#[derive(Serialize)]
struct PredictionArtifact<'a> {
    report: &'a str,
    model: ModelSummary,
    #[serde(flatten)]
    assessment: &'a Assessment,
}

#[derive(Serialize)]
struct AnalyticsArtifact<'a> {
    report: &'a str,
    source: String,
    #[serde(flatten)]
    analytics: &'a AnalyticsReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindscreen_stats::{AnalyticsConfig, Dataset, StudentRecord, analyze};
    use tempfile::TempDir;

    #[test]
    fn creates_directory_and_names_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested").join("reports");
        let writer = ReportWriter::new(&out, ReportName::new("wk1".into()).unwrap()).unwrap();

        let records = vec![StudentRecord {
            age: Some(20.0),
            depression: Some(true),
            ..StudentRecord::default()
        }];
        let report = analyze(
            &Dataset::new(vec!["Age".into(), "Depression".into()], records),
            &AnalyticsConfig::new(),
        )
        .unwrap();
        let path = writer.write_analytics(Path::new("students.csv"), &report).unwrap();

        assert_eq!(path, out.join("wk1_analytics.json"));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["report"], "wk1");
        assert_eq!(json["source"], "students.csv");
        assert_eq!(json["summary"]["total_records"], 1);
        assert_eq!(json["risk_profile"].as_array().unwrap().len(), 5);
    }
}
