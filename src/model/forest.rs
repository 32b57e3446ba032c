//! Random forest: bootstrap-sampled decision trees with class-balanced sample weights.

use super::tree::{DecisionTree, TreeParams};
use super::Classifier;
use crate::config::{ClassWeight, ForestConfig, MaxFeatures};
use crate::error::TrainingError;
use crate::features::{FeatureVector, NUM_FEATURES};
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    /// Sample weight applied to class 0 and class 1
    class_weights: [f64; 2],
    importances: Vec<f64>,
    config: ForestConfig,
}

impl RandomForest {
    /// Fit on a standardized training matrix in canonical feature order.
    pub fn fit(x: ArrayView2<'_, f64>, y: &[u8], config: &ForestConfig) -> Result<Self, TrainingError> {
        let n = x.nrows();
        if n == 0 || y.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }
        if n != y.len() {
            return Err(TrainingError::ShapeMismatch { rows: n, labels: y.len() });
        }
        if x.ncols() != NUM_FEATURES {
            return Err(TrainingError::WidthMismatch {
                expected: NUM_FEATURES,
                found: x.ncols(),
            });
        }
        let mut counts = [0usize; 2];
        for &label in y {
            if label > 1 {
                return Err(TrainingError::InvalidLabel(label));
            }
            counts[usize::from(label)] += 1;
        }
        if counts[0] == 0 || counts[1] == 0 {
            let only = if counts[0] == 0 { 1 } else { 0 };
            return Err(TrainingError::SingleClass(only));
        }

        let class_weights = match config.class_weight {
            ClassWeight::Balanced => [
                n as f64 / (2.0 * counts[0] as f64),
                n as f64 / (2.0 * counts[1] as f64),
            ],
            ClassWeight::Uniform => [1.0, 1.0],
        };
        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
            max_features: match config.max_features {
                MaxFeatures::Sqrt => ((NUM_FEATURES as f64).sqrt().floor() as usize).max(1),
                MaxFeatures::All => NUM_FEATURES,
            },
        };

        let n_trees = config.n_estimators.max(1);
        let mut trees = Vec::with_capacity(n_trees);
        for i in 0..n_trees {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(i as u64));
            let mut weights: Vec<f64> = y.iter().map(|&l| class_weights[usize::from(l)]).collect();
            if config.bootstrap {
                let mut drawn = vec![0u32; n];
                for _ in 0..n {
                    drawn[rng.gen_range(0..n)] += 1;
                }
                for (w, &d) in weights.iter_mut().zip(&drawn) {
                    *w *= f64::from(d);
                }
            }
            let tree = match DecisionTree::fit(x, y, &weights, &params, &mut rng) {
                Ok(tree) => tree,
                Err(TrainingError::EmptyTrainingSet) => continue,
                Err(e) => return Err(e),
            };
            debug!(tree = i, nodes = tree.n_nodes(), depth = tree.depth(), "fitted tree");
            trees.push(tree);
        }
        if trees.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }

        let mut importances = vec![0.0; NUM_FEATURES];
        for tree in &trees {
            for (acc, v) in importances.iter_mut().zip(tree.importances()) {
                *acc += v;
            }
        }
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }

        Ok(Self {
            trees,
            class_weights,
            importances,
            config: config.clone(),
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn class_weights(&self) -> [f64; 2] {
        self.class_weights
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Structural check for a decoded forest: at least one tree, every tree valid
    /// over the canonical feature width.
    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        if self.importances.len() != NUM_FEATURES {
            return Err(format!(
                "forest has {} importances, expected {NUM_FEATURES}",
                self.importances.len()
            ));
        }
        if self.class_weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(format!("invalid class weights {:?}", self.class_weights));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.n_features() != NUM_FEATURES {
                return Err(format!(
                    "tree {i} expects {} features, expected {NUM_FEATURES}",
                    tree.n_features()
                ));
            }
            tree.validate().map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn probability(&self, features: &FeatureVector) -> f64 {
        let sum: f64 = self
            .trees
            .iter()
            .map(|t| t.predict_proba(features.as_slice()))
            .sum();
        (sum / self.trees.len() as f64).clamp(0.0, 1.0)
    }

    fn feature_importance(&self) -> Option<Vec<f64>> {
        Some(self.importances.clone())
    }
}
