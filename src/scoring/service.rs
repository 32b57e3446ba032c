use super::Scorer;
use crate::config::{InputConfig, PredictorConfig, RiskConfig};
use crate::error::{SchemaError, StorageError};
use crate::features::{FittedTransform, SensorReading};
use crate::model::RandomForest;
use crate::risk::Prediction;
use crate::storage::{ArtifactCache, ArtifactKind, ArtifactStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of an online scoring request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreOutcome {
    Ready(Prediction),
    /// Artifacts missing or unreadable; not a prediction of any kind
    Unavailable { reason: String },
}

impl ScoreOutcome {
    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            ScoreOutcome::Ready(p) => Some(p),
            ScoreOutcome::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ScoreOutcome::Ready(_))
    }
}

/// Scores readings against the persisted transform and classifier, loading them
/// through a shared [`ArtifactCache`].
pub struct ScoringService {
    store: ArtifactStore,
    cache: Arc<ArtifactCache>,
    risk: RiskConfig,
    input: InputConfig,
}

impl ScoringService {
    pub fn new(store: ArtifactStore, cache: Arc<ArtifactCache>, config: &PredictorConfig) -> Self {
        Self {
            store,
            cache,
            risk: config.risk.clone(),
            input: config.input.clone(),
        }
    }

    pub fn scorer(&self) -> Result<Scorer, StorageError> {
        let transform: Arc<FittedTransform> = self
            .cache
            .get_or_load(&self.store.transform_path(), ArtifactKind::Transform)?;
        let model: Arc<RandomForest> = self
            .cache
            .get_or_load(&self.store.classifier_path(), ArtifactKind::Classifier)?;
        Ok(Scorer::new(transform, model, self.risk.clone()).with_input(self.input.clone()))
    }

    pub fn is_ready(&self) -> bool {
        self.scorer().is_ok()
    }

    /// Only a malformed reading is an error; missing artifacts are an outcome.
    pub fn score(&self, reading: &SensorReading) -> Result<ScoreOutcome, SchemaError> {
        let scorer = match self.scorer() {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "scorer unavailable");
                return Ok(ScoreOutcome::Unavailable { reason: e.to_string() });
            }
        };
        let prediction = scorer.score(reading)?;
        info!(
            quality = %reading.quality,
            probability = prediction.failure_probability,
            decision = prediction.decision,
            level = ?prediction.risk_level,
            "scored reading"
        );
        Ok(ScoreOutcome::Ready(prediction))
    }
}
