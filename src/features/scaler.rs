//! Per-feature standardization fit on the training partition only.

use super::schema::{self, NUMERIC_FEATURES, NUM_FEATURES};
use super::FeatureVector;
use crate::error::SchemaError;
use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Learned statistics for one numeric feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub name: String,
    pub mean: f64,
    /// Population standard deviation; 1.0 for constant features
    pub std: f64,
}

/// Immutable standardization transform. The quality code passes through untouched;
/// each numeric feature becomes `(x - mean) / std`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTransform {
    /// Quality symbol → code, as used when the transform was fit
    pub encoding: Vec<(String, u8)>,
    /// One entry per numeric feature, in canonical order
    pub features: Vec<FeatureStats>,
    /// Training rows the statistics were computed from
    pub n_samples: usize,
}

impl FittedTransform {
    /// Fit on a training matrix laid out in canonical feature order.
    pub fn fit(x: ArrayView2<'_, f64>) -> Result<Self, SchemaError> {
        if x.ncols() != NUM_FEATURES {
            return Err(SchemaError::WidthMismatch {
                expected: NUM_FEATURES,
                found: x.ncols(),
            });
        }
        let n = x.nrows();
        let features = NUMERIC_FEATURES
            .iter()
            .map(|&idx| {
                let column = x.index_axis(Axis(1), idx);
                let (mean, std) = if n == 0 {
                    (0.0, 1.0)
                } else {
                    let mean = column.iter().sum::<f64>() / n as f64;
                    let var = column.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
                    let std = var.sqrt();
                    (mean, if std > 0.0 { std } else { 1.0 })
                };
                FeatureStats {
                    name: schema::FEATURE_NAMES[idx].to_string(),
                    mean,
                    std,
                }
            })
            .collect();
        Ok(Self {
            encoding: schema::encoding_table(),
            features,
            n_samples: n,
        })
    }

    /// Build a transform from known statistics, in canonical numeric order.
    pub fn from_parameters(means: [f64; 5], stds: [f64; 5]) -> Self {
        let features = NUMERIC_FEATURES
            .iter()
            .zip(means.iter().zip(stds.iter()))
            .map(|(&idx, (&mean, &std))| FeatureStats {
                name: schema::FEATURE_NAMES[idx].to_string(),
                mean,
                std,
            })
            .collect();
        Self {
            encoding: schema::encoding_table(),
            features,
            n_samples: 0,
        }
    }

    /// A decoded transform must cover the five numeric features in canonical order
    /// with finite means and positive, finite standard deviations.
    pub fn validate(&self) -> Result<(), String> {
        if self.encoding != schema::encoding_table() {
            return Err(format!("unexpected quality encoding {:?}", self.encoding));
        }
        if self.features.len() != NUMERIC_FEATURES.len() {
            return Err(format!(
                "transform has {} features, expected {}",
                self.features.len(),
                NUMERIC_FEATURES.len()
            ));
        }
        for (&idx, stats) in NUMERIC_FEATURES.iter().zip(&self.features) {
            let expected = schema::FEATURE_NAMES[idx];
            if stats.name != expected {
                return Err(format!("feature `{}` where `{expected}` was expected", stats.name));
            }
            if !stats.mean.is_finite() || !stats.std.is_finite() || stats.std <= 0.0 {
                return Err(format!(
                    "{}: mean {} std {} not usable",
                    stats.name, stats.mean, stats.std
                ));
            }
        }
        Ok(())
    }

    pub fn means(&self) -> Vec<f64> {
        self.features.iter().map(|f| f.mean).collect()
    }

    pub fn stds(&self) -> Vec<f64> {
        self.features.iter().map(|f| f.std).collect()
    }

    pub fn transform_vector(&self, v: &FeatureVector) -> FeatureVector {
        let mut out = *v;
        for (&idx, stats) in NUMERIC_FEATURES.iter().zip(&self.features) {
            out.values[idx] = (v.values[idx] - stats.mean) / stats.std;
        }
        out
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, SchemaError> {
        if x.ncols() != NUM_FEATURES {
            return Err(SchemaError::WidthMismatch {
                expected: NUM_FEATURES,
                found: x.ncols(),
            });
        }
        let mut out = x.to_owned();
        for (&idx, stats) in NUMERIC_FEATURES.iter().zip(&self.features) {
            out.column_mut(idx)
                .mapv_inplace(|v| (v - stats.mean) / stats.std);
        }
        Ok(out)
    }
}
