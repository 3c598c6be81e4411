use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use mindscreen_io::{
    load_model, load_preprocessing, load_record, DatasetReader, ReportName, ReportWriter,
};
use mindscreen_stats::{analyze, AnalyticsConfig, CorrelationEntry, RiskBucket};
use mindscreen_tree::{Assessment, Predictor, RangePolicy};

#[derive(Parser)]
#[command(name = "mindscreen")]
#[command(about = "Decision-tree depression screening and student cohort analytics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Where to write the full JSON report, if anywhere.
#[derive(Args, Debug, Clone)]
struct ReportArgs {
    /// Report name for output files (must match [a-zA-Z0-9_-]+); omit to skip writing
    #[arg(long)]
    report: Option<String>,

    /// Output directory for report files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

impl ReportArgs {
    fn writer(&self) -> Result<Option<ReportWriter>> {
        let Some(name) = &self.report else {
            return Ok(None);
        };
        let name: ReportName = name.parse().context("invalid report name")?;
        let writer = ReportWriter::new(&self.output_dir, name)
            .context("failed to prepare output directory")?;
        Ok(Some(writer))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Score one questionnaire record with a trained decision tree
    Predict {
        /// Path to the model JSON (tree, threshold, metrics)
        #[arg(long)]
        model: PathBuf,

        /// Path to the preprocessing JSON (columns, vocabularies, imputation)
        #[arg(long)]
        preprocessing: PathBuf,

        /// Path to the record JSON (column -> value)
        #[arg(long)]
        record: PathBuf,

        /// Withhold the prediction when any value is outside its typical range
        #[arg(long, default_value_t = false)]
        enforce_ranges: bool,

        #[command(flatten)]
        output: ReportArgs,
    },

    /// Compute distributions, cross-tabulations, correlations and risk profile for a dataset
    Analyze {
        /// Path to the student dataset CSV
        #[arg(long)]
        data: PathBuf,

        /// Preprocessing JSON whose ordinal scales replace the built-in ones
        #[arg(long)]
        preprocessing: Option<PathBuf>,

        /// Academic Pressure value at or above which a student counts as high pressure
        #[arg(long, default_value_t = 4.0)]
        pressure_cutoff: f64,

        #[command(flatten)]
        output: ReportArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct PredictOutput<'a> {
    model_threshold: f64,
    model_n_nodes: usize,
    #[serde(flatten)]
    assessment: &'a Assessment,
    report_path: Option<PathBuf>,
}

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    n_records: usize,
    positive: usize,
    negative: usize,
    positive_rate: f64,
    top_correlations: &'a [CorrelationEntry],
    risk_profile: &'a [RiskBucket],
    report_path: Option<PathBuf>,
}

fn run_predict(
    model: &Path,
    preprocessing: &Path,
    record: &Path,
    enforce_ranges: bool,
    output: &ReportArgs,
) -> Result<()> {
    let spec = load_preprocessing(preprocessing).context("failed to load preprocessing spec")?;
    let artifact = load_model(model).context("failed to load model")?;
    let record = load_record(record).context("failed to load record")?;

    let policy = if enforce_ranges {
        RangePolicy::Enforce
    } else {
        RangePolicy::Advisory
    };
    let predictor = Predictor::new(spec, artifact)
        .context("model and preprocessing spec are incompatible")?
        .with_range_policy(policy);

    let assessment = predictor.assess(&record).context("prediction failed")?;
    match &assessment {
        Assessment::Predicted { prediction, warnings } => {
            for w in warnings {
                warn!(column = %w.column, "{}", w.message);
            }
            info!(
                probability = prediction.probability,
                risk_level = %prediction.risk_level,
                "prediction complete"
            );
        }
        Assessment::Rejected { issues } => {
            for issue in issues {
                warn!(column = %issue.column, "{}", issue.message);
            }
        }
    }

    let report_path = match output.writer()? {
        Some(writer) => Some(
            writer
                .write_prediction(predictor.tree(), &assessment)
                .context("failed to write prediction report")?,
        ),
        None => None,
    };

    let out = PredictOutput {
        model_threshold: predictor.tree().threshold(),
        model_n_nodes: predictor.tree().n_nodes(),
        assessment: &assessment,
        report_path,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn run_analyze(
    data: &Path,
    preprocessing: Option<&Path>,
    pressure_cutoff: f64,
    output: &ReportArgs,
) -> Result<()> {
    let dataset = DatasetReader::new(data)
        .read()
        .context("failed to read dataset")?;

    let mut config = AnalyticsConfig::new().with_pressure_cutoff(pressure_cutoff);
    if let Some(path) = preprocessing {
        let spec = load_preprocessing(path).context("failed to load preprocessing spec")?;
        for scale in spec.ordinal_scales {
            info!(column = %scale.column, version = scale.version, "using ordinal scale");
            config = config
                .with_ordinal_scale(scale)
                .context("invalid ordinal scale")?;
        }
    }

    let report = analyze(&dataset, &config).context("analytics failed")?;

    let report_path = match output.writer()? {
        Some(writer) => Some(
            writer
                .write_analytics(data, &report)
                .context("failed to write analytics report")?,
        ),
        None => None,
    };

    let top = report.correlations.len().min(3);
    let out = AnalyzeOutput {
        n_records: report.summary.total_records,
        positive: report.summary.outcome.positive,
        negative: report.summary.outcome.negative,
        positive_rate: report.summary.outcome.positive_rate,
        top_correlations: &report.correlations[..top],
        risk_profile: &report.risk_profile,
        report_path,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Predict {
            model,
            preprocessing,
            record,
            enforce_ranges,
            output,
        } => run_predict(&model, &preprocessing, &record, enforce_ranges, &output),
        Command::Analyze {
            data,
            preprocessing,
            pressure_cutoff,
            output,
        } => run_analyze(&data, preprocessing.as_deref(), pressure_cutoff, &output),
    }
}
