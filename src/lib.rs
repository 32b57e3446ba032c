//! Predictive-maintenance failure predictor.
//!
//! Modular structure:
//! - [`features`] — Schema, sensor readings, feature vectors, standardization
//! - [`dataset`] — CSV ingestion, stratified split, exploratory profile
//! - [`model`] — Classifier trait, decision tree, random forest
//! - [`storage`] — Checksummed artifact files and the artifact cache
//! - [`pipeline`] — Offline preprocessing and training stages
//! - [`risk`] — Probability → decision and risk band
//! - [`scoring`] — Online scoring of single readings
//! - [`evaluation`] — Held-out metrics, feature ranking, cost simulation
//! - [`logging`] — Structured logging

pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod risk;
pub mod scoring;
pub mod storage;

pub use config::PredictorConfig;
pub use dataset::Dataset;
pub use error::{PipelineError, SchemaError, StorageError, TrainingError};
pub use evaluation::{EvaluationOutcome, EvaluationReport, Evaluator};
pub use features::{FeatureVector, FittedTransform, QualityType, SensorReading};
pub use logging::StructuredLogger;
pub use model::{Classifier, RandomForest};
pub use pipeline::{Preprocessor, SplitArtifact, Trainer};
pub use risk::{Prediction, RiskEngine, RiskLevel};
pub use scoring::{ScoreOutcome, Scorer, ScoringService};
pub use storage::{ArtifactCache, ArtifactStore};
