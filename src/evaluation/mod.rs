//! Held-out evaluation: confusion matrix, metrics, feature ranking, cost simulation.

mod cost;
mod metrics;

pub use cost::CostImpact;
pub use metrics::{ClassificationMetrics, ConfusionMatrix};

use crate::config::{CostConfig, PredictorConfig, RiskConfig};
use crate::error::{SchemaError, StorageError};
use crate::model::{Classifier, RandomForest};
use crate::pipeline::SplitArtifact;
use crate::risk::RiskEngine;
use crate::storage::{ArtifactCache, ArtifactKind, ArtifactStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub test_rows: usize,
    pub threshold: f64,
    pub confusion: ConfusionMatrix,
    pub metrics: ClassificationMetrics,
    /// Most important first; absent when the classifier has no importances
    pub feature_importance: Option<Vec<FeatureImportance>>,
    pub cost: CostImpact,
}

pub struct Evaluator {
    engine: RiskEngine,
    cost: CostConfig,
}

impl Evaluator {
    pub fn new(risk: RiskConfig, cost: CostConfig) -> Self {
        Self {
            engine: RiskEngine::new(risk),
            cost,
        }
    }

    pub fn evaluate(&self, classifier: &dyn Classifier, split: &SplitArtifact) -> Result<EvaluationReport, SchemaError> {
        let probabilities = classifier.probabilities(split.test_features.view())?;
        let predicted: Vec<u8> = probabilities.iter().map(|&p| self.engine.decision(p)).collect();
        let confusion = ConfusionMatrix::from_labels(&split.test_labels, &predicted);
        let metrics = ClassificationMetrics::from_confusion(&confusion);
        let feature_importance = classifier
            .feature_importance()
            .map(|values| rank_features(&split.feature_names, &values));

        Ok(EvaluationReport {
            test_rows: split.test_labels.len(),
            threshold: self.engine.config().decision_threshold,
            confusion,
            metrics,
            feature_importance,
            cost: CostImpact::simulate(&confusion, &self.cost),
        })
    }
}

/// Pair importances with names and sort descending (stable for ties).
pub fn rank_features(names: &[String], importances: &[f64]) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = names
        .iter()
        .zip(importances)
        .map(|(name, &importance)| FeatureImportance {
            feature: name.clone(),
            importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Ready(Box<EvaluationReport>),
    /// Split or classifier artifact missing; distinct from a report of zeros
    Unavailable { reason: String },
}

impl EvaluationOutcome {
    pub fn report(&self) -> Option<&EvaluationReport> {
        match self {
            EvaluationOutcome::Ready(r) => Some(r),
            EvaluationOutcome::Unavailable { .. } => None,
        }
    }
}

/// Evaluates the persisted classifier on the persisted held-out split.
pub struct EvaluationService {
    store: ArtifactStore,
    cache: Arc<ArtifactCache>,
    evaluator: Evaluator,
}

impl EvaluationService {
    pub fn new(store: ArtifactStore, cache: Arc<ArtifactCache>, config: &PredictorConfig) -> Self {
        Self {
            store,
            cache,
            evaluator: Evaluator::new(config.risk.clone(), config.cost.clone()),
        }
    }

    fn load(&self) -> Result<(Arc<SplitArtifact>, Arc<RandomForest>), StorageError> {
        let split = self.cache.get_or_load(&self.store.split_path(), ArtifactKind::Split)?;
        let model = self
            .cache
            .get_or_load(&self.store.classifier_path(), ArtifactKind::Classifier)?;
        Ok((split, model))
    }

    /// Only a split whose matrix width disagrees with the schema is an error.
    pub fn evaluate(&self) -> Result<EvaluationOutcome, SchemaError> {
        let (split, model) = match self.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, "evaluation unavailable");
                return Ok(EvaluationOutcome::Unavailable { reason: e.to_string() });
            }
        };
        let report = self.evaluator.evaluate(model.as_ref(), &split)?;
        info!(
            test_rows = report.test_rows,
            accuracy = report.metrics.accuracy,
            precision = report.metrics.precision,
            recall = report.metrics.recall,
            f1 = report.metrics.f1,
            "evaluation complete"
        );
        Ok(EvaluationOutcome::Ready(Box::new(report)))
    }
}
