//! Criterion benchmarks for mindscreen-stats: correlation ranking, matrix, and full analysis.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use mindscreen_stats::{
    AnalyticsConfig, Column, Dataset, StudentRecord, analyze, correlation_matrix,
    correlation_ranking, risk_profile,
};

fn make_records(n: usize) -> Vec<StudentRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    (0..n)
        .map(|i| StudentRecord {
            id: Some(i as f64),
            age: Some(f64::from(rng.gen_range(18..=40u32))),
            academic_pressure: Some(f64::from(rng.gen_range(1..=5u32))),
            work_pressure: Some(0.0),
            cgpa: Some(rng.gen_range(5.0..10.0)),
            study_satisfaction: Some(f64::from(rng.gen_range(1..=5u32))),
            job_satisfaction: Some(0.0),
            work_study_hours: Some(f64::from(rng.gen_range(0..=12u32))),
            financial_stress: Some(f64::from(rng.gen_range(1..=5u32))),
            sleep_duration: Some("'7-8 hours'".to_string()),
            family_history: Some("No".to_string()),
            depression: Some(rng.gen_bool(0.58)),
            ..StudentRecord::default()
        })
        .collect()
}

fn bench_correlation_ranking(c: &mut Criterion) {
    let records = make_records(28_000);
    let config = AnalyticsConfig::new();

    c.bench_function("correlation_ranking_28k_9feat", |b| {
        b.iter(|| correlation_ranking(&records, config.correlation_features()));
    });
}

fn bench_correlation_matrix(c: &mut Criterion) {
    let records = make_records(28_000);
    let config = AnalyticsConfig::new();

    c.bench_function("correlation_matrix_28k_9feat", |b| {
        b.iter(|| correlation_matrix(&records, config.correlation_features()));
    });
}

fn bench_risk_profile(c: &mut Criterion) {
    let records = make_records(28_000);

    c.bench_function("risk_profile_28k", |b| {
        b.iter(|| risk_profile(&records));
    });
}

fn bench_analyze(c: &mut Criterion) {
    let headers = Column::ALL.iter().map(|c| c.header().to_string()).collect();
    let dataset = Dataset::new(headers, make_records(28_000));
    let config = AnalyticsConfig::new();

    c.bench_function("analyze_28k", |b| {
        b.iter(|| analyze(&dataset, &config).unwrap());
    });
}

criterion_group!(
    benches,
    bench_correlation_ranking,
    bench_correlation_matrix,
    bench_risk_profile,
    bench_analyze
);
criterion_main!(benches);
