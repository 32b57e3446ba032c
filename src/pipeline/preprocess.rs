//! Raw dataset → stratified split → standardization fit on train → persisted artifacts.

use super::SplitArtifact;
use crate::config::SplitConfig;
use crate::dataset::{stratified_split, Dataset};
use crate::error::PipelineError;
use crate::features::{FittedTransform, FEATURE_NAMES};
use crate::storage::ArtifactStore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Fitted transform plus the standardized partitions it was applied to.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    pub transform: FittedTransform,
    pub split: SplitArtifact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessSummary {
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_failures: usize,
    pub test_failures: usize,
    pub transform: FittedTransform,
}

pub struct Preprocessor {
    config: SplitConfig,
}

impl Preprocessor {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    /// Deterministic for a given dataset and seed.
    pub fn fit(&self, dataset: &Dataset) -> Result<PreparedData, PipelineError> {
        let indices = stratified_split(&dataset.labels, self.config.test_size, self.config.seed)?;
        let train = dataset.select(&indices.train);
        let test = dataset.select(&indices.test);

        let transform = FittedTransform::fit(train.features.view())?;
        let train_features = transform.transform(train.features.view())?;
        let test_features = transform.transform(test.features.view())?;

        Ok(PreparedData {
            transform,
            split: SplitArtifact {
                feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                train_features,
                train_labels: train.labels,
                test_features,
                test_labels: test.labels,
                train_rows: indices.train,
                test_rows: indices.test,
                test_size: self.config.test_size,
                seed: self.config.seed,
            },
        })
    }

    /// Load the raw CSV, export the cleaned dataset, fit, and persist transform and split.
    pub fn run(&self, raw_csv: &Path, store: &ArtifactStore) -> Result<PreprocessSummary, PipelineError> {
        let dataset = Dataset::from_csv_path(raw_csv)?;
        dataset.write_cleaned_csv(&store.cleaned_data_path())?;

        let prepared = self.fit(&dataset)?;
        store.save_transform(&prepared.transform)?;
        store.save_split(&prepared.split)?;

        let failures = |labels: &[u8]| labels.iter().filter(|&&l| l == 1).count();
        let summary = PreprocessSummary {
            rows: dataset.len(),
            train_rows: prepared.split.train_labels.len(),
            test_rows: prepared.split.test_labels.len(),
            train_failures: failures(&prepared.split.train_labels),
            test_failures: failures(&prepared.split.test_labels),
            transform: prepared.transform,
        };
        info!(
            rows = summary.rows,
            train = summary.train_rows,
            test = summary.test_rows,
            train_failures = summary.train_failures,
            test_failures = summary.test_failures,
            "preprocessing complete"
        );
        Ok(summary)
    }
}
