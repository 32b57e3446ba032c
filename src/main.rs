//! pdm-predictor entrypoint: offline preprocessing and training, held-out evaluation,
//! single-reading prediction and dataset profiling. Results go to stdout as JSON lines.

use clap::{Parser, Subcommand, ValueEnum};
use pdm_predictor::{
    config::PredictorConfig,
    dataset::{Dataset, DatasetFilter, StatusFilter},
    evaluation::{EvaluationOutcome, EvaluationService},
    features::{QualityType, SensorReading},
    logging::StructuredLogger,
    pipeline::{Preprocessor, Trainer},
    scoring::{Diagnostics, ScoreOutcome, ScoringService},
    storage::{ArtifactCache, ArtifactStore},
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "pdm-predictor", version, about = "Machine failure prediction pipeline")]
struct Cli {
    /// JSON config file (default: $PDM_CONFIG_PATH or config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split and standardize the raw dataset, persisting transform and split
    Preprocess {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Fit the random forest on the persisted training split
    Train,
    /// Evaluate the persisted classifier on the held-out split
    Evaluate,
    /// Score a single sensor reading
    Predict {
        #[arg(long)]
        quality: String,
        #[arg(long)]
        air_temp: f64,
        #[arg(long)]
        process_temp: f64,
        #[arg(long)]
        rpm: u32,
        #[arg(long)]
        torque: f64,
        #[arg(long)]
        tool_wear: u32,
    },
    /// Summarize the raw dataset
    Profile {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long = "quality")]
        qualities: Vec<QualityType>,
        #[arg(long, value_enum, default_value_t = Status::All)]
        status: Status,
    },
    /// Preprocess, train and evaluate in one go
    Run {
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Status {
    All,
    Failure,
    Normal,
}

impl From<Status> for StatusFilter {
    fn from(s: Status) -> Self {
        match s {
            Status::All => StatusFilter::All,
            Status::Failure => StatusFilter::FailureOnly,
            Status::Normal => StatusFilter::NormalOnly,
        }
    }
}

#[derive(Serialize)]
struct PredictOutput<'a> {
    reading: &'a SensorReading,
    #[serde(flatten)]
    outcome: ScoreOutcome,
    diagnostics: Diagnostics,
}

fn emit(value: &impl Serialize) -> Result<(), BoxError> {
    StructuredLogger::emit_json(value, &mut std::io::stdout().lock())?;
    Ok(())
}

fn evaluate(store: &ArtifactStore, cache: Arc<ArtifactCache>, config: &PredictorConfig) -> Result<(), BoxError> {
    let outcome = EvaluationService::new(store.clone(), cache, config).evaluate()?;
    if let EvaluationOutcome::Unavailable { reason } = &outcome {
        warn!(%reason, "run `preprocess` and `train` first");
    }
    emit(&outcome)
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| std::env::var("PDM_CONFIG_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.json"));
    let config = match PredictorConfig::try_load(&config_path) {
        Ok(Some(c)) => c,
        Ok(None) => PredictorConfig::default(),
        Err(e) => return Err(format!("invalid config {}: {e}", config_path.display()).into()),
    };

    StructuredLogger::init(config.log.json, &config.log.level);
    info!(config = %config_path.display(), "pdm-predictor starting");

    let store = ArtifactStore::from_config(&config.paths);
    let cache = Arc::new(ArtifactCache::new());
    let raw = |input: Option<PathBuf>| input.unwrap_or_else(|| config.paths.raw_data.clone());

    match cli.command {
        Command::Preprocess { input } => {
            let summary = Preprocessor::new(config.split.clone()).run(&raw(input), &store)?;
            emit(&summary)?;
        }
        Command::Train => {
            let summary = Trainer::new(config.forest.clone())
                .with_risk(config.risk.clone())
                .run(&store)?;
            emit(&summary)?;
        }
        Command::Evaluate => evaluate(&store, cache, &config)?,
        Command::Predict {
            quality,
            air_temp,
            process_temp,
            rpm,
            torque,
            tool_wear,
        } => {
            let reading = SensorReading {
                quality,
                air_temperature: air_temp,
                process_temperature: process_temp,
                rotational_speed: rpm,
                torque,
                tool_wear,
            };
            let outcome = ScoringService::new(store, cache, &config).score(&reading)?;
            emit(&PredictOutput {
                reading: &reading,
                outcome,
                diagnostics: Diagnostics::from_reading(&reading),
            })?;
        }
        Command::Profile {
            input,
            qualities,
            status,
        } => {
            let dataset = Dataset::from_csv_path(&raw(input))?;
            let filter = DatasetFilter {
                qualities,
                status: status.into(),
            };
            emit(&dataset.profile(&filter))?;
        }
        Command::Run { input } => {
            let prep = Preprocessor::new(config.split.clone()).run(&raw(input), &store)?;
            emit(&prep)?;
            let train = Trainer::new(config.forest.clone())
                .with_risk(config.risk.clone())
                .run(&store)?;
            emit(&train)?;
            evaluate(&store, cache, &config)?;
        }
    }

    Ok(())
}
