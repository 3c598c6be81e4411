//! End-to-end integration tests: fixtures -> predict/analyze -> JSON -> deserialize.

use std::fs;
use std::path::{Path, PathBuf};

use mindscreen_io::{
    load_model, load_preprocessing, load_record, DatasetReader, ReportName, ReportWriter,
};
use mindscreen_stats::{analyze, AnalyticsConfig};
use mindscreen_tree::{Assessment, Predictor, RiskLevel};
use tempfile::TempDir;

/// Path to the test fixture directory.
fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn predictor() -> Predictor {
    let spec = load_preprocessing(&fixture_path("preprocessing.json")).unwrap();
    let model = load_model(&fixture_path("dt_model.json")).unwrap();
    Predictor::new(spec, model).expect("fixture pair should validate")
}

#[test]
fn prediction_round_trip() {
    let predictor = predictor();
    let record = load_record(&fixture_path("record_high.json")).unwrap();
    let assessment = predictor.assess(&record).unwrap();

    let prediction = assessment.prediction().expect("record should be scored");
    assert!((prediction.probability - 60.0 / 65.0).abs() < 1e-12);
    assert_eq!(prediction.class, 1);
    assert_eq!(prediction.risk_level, RiskLevel::High);
    let features: Vec<&str> = prediction.path.iter().map(|s| s.feature.as_str()).collect();
    assert_eq!(features, ["Academic Pressure", "Financial Stress"]);

    let dir = TempDir::new().unwrap();
    let writer = ReportWriter::new(dir.path(), ReportName::new("intake".into()).unwrap()).unwrap();
    let path = writer.write_prediction(predictor.tree(), &assessment).unwrap();
    assert_eq!(path, dir.path().join("intake_prediction.json"));

    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(content["report"], "intake");
    assert_eq!(content["status"], "predicted");
    assert_eq!(content["prediction"]["riskLevel"], "HIGH");
    assert_eq!(content["prediction"]["path"].as_array().unwrap().len(), 2);
    assert_eq!(content["model"]["n_nodes"], 7);
    assert_eq!(content["model"]["n_leaves"], 4);
    assert_eq!(content["model"]["metrics"]["f1"], 0.825);
}

#[test]
fn invalid_record_is_rejected_with_field_messages() {
    let predictor = predictor();
    let record = load_record(&fixture_path("record_invalid.json")).unwrap();
    match predictor.assess(&record).unwrap() {
        Assessment::Rejected { issues } => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].column, "Age");
            assert_eq!(issues[0].message, "Must be a number");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn analytics_round_trip() {
    let data = fixture_path("students.csv");
    let dataset = DatasetReader::new(&data).read().unwrap();
    assert_eq!(dataset.len(), 12);

    let spec = load_preprocessing(&fixture_path("preprocessing.json")).unwrap();
    let mut config = AnalyticsConfig::new();
    for scale in spec.ordinal_scales {
        config = config.with_ordinal_scale(scale).unwrap();
    }
    let report = analyze(&dataset, &config).unwrap();

    assert_eq!(report.summary.total_records, 12);
    assert_eq!(report.summary.total_features, 17);
    assert_eq!(report.summary.outcome.positive, 6);
    assert_eq!(report.summary.outcome.positive_percentage, 50.0);
    assert_eq!(report.risk_profile.iter().map(|b| b.count).sum::<usize>(), 12);

    let dir = TempDir::new().unwrap();
    let writer = ReportWriter::new(dir.path(), ReportName::new("cohort".into()).unwrap()).unwrap();
    let path = writer.write_analytics(&data, &report).unwrap();

    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(content["report"], "cohort");
    assert_eq!(content["correlations"].as_array().unwrap().len(), 9);
    assert_eq!(content["correlations"][0]["rank"], 1);
    assert_eq!(content["age_groups"][0]["label"], "18-22");
    let risk_labels: Vec<&str> = content["risk_profile"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["category"].as_str().unwrap())
        .collect();
    assert_eq!(
        risk_labels,
        ["Very Low Risk", "Low Risk", "Moderate Risk", "High Risk", "Very High Risk"]
    );
}

#[test]
fn invalid_report_name_is_rejected() {
    assert!(ReportName::new("../escape".into()).is_err());
    assert!(ReportName::new("-v".into()).is_err());
}
