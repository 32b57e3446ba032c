//! Single batch fit of the random forest on the standardized training partition.

use super::SplitArtifact;
use crate::config::{ForestConfig, RiskConfig};
use crate::error::{PipelineError, TrainingError};
use crate::model::{Classifier, RandomForest};
use crate::risk::RiskEngine;
use crate::storage::ArtifactStore;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSummary {
    pub train_rows: usize,
    pub failures: usize,
    pub n_trees: usize,
    /// Accuracy on the rows the forest was fit on, at the configured decision threshold
    pub train_accuracy: f64,
    pub class_weights: [f64; 2],
    pub feature_importance: Vec<(String, f64)>,
}

pub struct Trainer {
    config: ForestConfig,
    engine: RiskEngine,
}

impl Trainer {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            engine: RiskEngine::new(RiskConfig::default()),
        }
    }

    /// Decision threshold used when reporting training accuracy.
    pub fn with_risk(mut self, risk: RiskConfig) -> Self {
        self.engine = RiskEngine::new(risk);
        self
    }

    pub fn fit(&self, split: &SplitArtifact) -> Result<RandomForest, TrainingError> {
        RandomForest::fit(split.train_features.view(), &split.train_labels, &self.config)
    }

    /// Load the persisted split, fit, and persist the classifier.
    pub fn run(&self, store: &ArtifactStore) -> Result<TrainSummary, PipelineError> {
        let split = store.load_split()?;
        info!(
            rows = split.train_labels.len(),
            n_estimators = self.config.n_estimators,
            "training random forest"
        );
        let model = self.fit(&split)?;
        store.save_classifier(&model)?;

        let correct = model
            .probabilities(split.train_features.view())?
            .iter()
            .zip(&split.train_labels)
            .filter(|&(&p, &label)| self.engine.decision(p) == label)
            .count();

        let feature_importance = split
            .feature_names
            .iter()
            .cloned()
            .zip(model.feature_importance().unwrap_or_default())
            .collect();
        let summary = TrainSummary {
            train_rows: split.train_labels.len(),
            failures: split.train_labels.iter().filter(|&&l| l == 1).count(),
            n_trees: model.n_trees(),
            train_accuracy: correct as f64 / split.train_labels.len() as f64,
            class_weights: model.class_weights(),
            feature_importance,
        };
        info!(
            trees = summary.n_trees,
            train_accuracy = summary.train_accuracy,
            weight_normal = summary.class_weights[0],
            weight_failure = summary.class_weights[1],
            "training complete"
        );
        Ok(summary)
    }
}
