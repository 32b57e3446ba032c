//! Offline stages: preprocessing (split + standardization) and classifier training.
//! Every error here is fatal to the run and is meant to be fixed before rerunning.

mod preprocess;
mod train;

pub use preprocess::{PreparedData, PreprocessSummary, Preprocessor};
pub use train::{TrainSummary, Trainer};

use crate::features::{FEATURE_NAMES, NUM_FEATURES};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Standardized train/test partitions as persisted by the preprocessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitArtifact {
    pub feature_names: Vec<String>,
    pub train_features: Array2<f64>,
    pub train_labels: Vec<u8>,
    pub test_features: Array2<f64>,
    pub test_labels: Vec<u8>,
    /// Source row indices of each partition
    pub train_rows: Vec<usize>,
    pub test_rows: Vec<usize>,
    pub test_size: f64,
    pub seed: u64,
}

impl SplitArtifact {
    /// Both partitions must be six columns wide with one 0/1 label and one source
    /// row index per matrix row.
    pub fn validate(&self) -> Result<(), String> {
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(format!("unexpected feature names {:?}", self.feature_names));
        }
        let sides = [
            ("train", &self.train_features, &self.train_labels, &self.train_rows),
            ("test", &self.test_features, &self.test_labels, &self.test_rows),
        ];
        for (side, features, labels, rows) in sides {
            if features.ncols() != NUM_FEATURES {
                return Err(format!("{side} matrix has {} columns", features.ncols()));
            }
            if features.nrows() != labels.len() || labels.len() != rows.len() {
                return Err(format!(
                    "{side}: {} rows, {} labels, {} row indices",
                    features.nrows(),
                    labels.len(),
                    rows.len()
                ));
            }
            if let Some(bad) = labels.iter().find(|&&l| l > 1) {
                return Err(format!("{side}: label {bad} outside {{0, 1}}"));
            }
        }
        Ok(())
    }
}
