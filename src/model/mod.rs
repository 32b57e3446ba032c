//! Failure classifiers over standardized feature vectors.

mod forest;
mod tree;

pub use forest::RandomForest;
pub use tree::{DecisionTree, TreeNode, TreeParams};

use crate::error::SchemaError;
use crate::features::FeatureVector;
use ndarray::{ArrayView2, Axis};

/// A fitted binary classifier. Implementations are immutable after fitting and
/// safe to share across threads.
pub trait Classifier: Send + Sync {
    /// Probability of the failure class for one standardized vector, in [0, 1].
    fn probability(&self, features: &FeatureVector) -> f64;

    /// Per-feature importance in canonical order, summing to ~1, when the model has one.
    fn feature_importance(&self) -> Option<Vec<f64>> {
        None
    }

    fn probabilities(&self, x: ArrayView2<'_, f64>) -> Result<Vec<f64>, SchemaError> {
        x.axis_iter(Axis(0))
            .map(|row| FeatureVector::from_row(row).map(|v| self.probability(&v)))
            .collect()
    }
}
