//! Exploratory summary of a dataset, filtered by quality type and machine status.

use super::Dataset;
use crate::features::schema::{QualityType, FEATURE_NAMES, NUMERIC_FEATURES};
use ndarray::Axis;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    FailureOnly,
    NormalOnly,
}

impl StatusFilter {
    fn accepts(self, label: u8) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::FailureOnly => label == 1,
            StatusFilter::NormalOnly => label == 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetFilter {
    /// Empty keeps every quality type
    pub qualities: Vec<QualityType>,
    pub status: StatusFilter,
}

impl DatasetFilter {
    fn accepts(&self, code: f64, label: u8) -> bool {
        let quality_ok = self.qualities.is_empty()
            || self
                .qualities
                .iter()
                .any(|q| f64::from(q.code()) == code);
        quality_ok && self.status.accepts(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub rows: usize,
    pub failures: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub mean_failure: Option<f64>,
    pub mean_normal: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub failures: usize,
    pub failure_rate: f64,
    /// Keyed by quality symbol
    pub per_quality: BTreeMap<String, QualityBreakdown>,
    /// Numeric features only; empty when the filter keeps no rows
    pub features: Vec<FeatureSummary>,
}

#[derive(Default)]
struct Accumulator {
    min: f64,
    max: f64,
    sum: f64,
    sum_failure: f64,
    sum_normal: f64,
}

impl Dataset {
    pub fn profile(&self, filter: &DatasetFilter) -> DatasetProfile {
        let mut per_quality: BTreeMap<String, QualityBreakdown> = BTreeMap::new();
        let mut acc: Vec<Accumulator> = NUMERIC_FEATURES
            .iter()
            .map(|_| Accumulator {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
                ..Accumulator::default()
            })
            .collect();
        let (mut rows, mut failures) = (0usize, 0usize);

        for (row, &label) in self.features.axis_iter(Axis(0)).zip(&self.labels) {
            if !filter.accepts(row[0], label) {
                continue;
            }
            rows += 1;
            failures += usize::from(label);
            if let Some(q) = QualityType::from_code(row[0] as u8) {
                let entry = per_quality.entry(q.symbol().to_string()).or_default();
                entry.rows += 1;
                entry.failures += usize::from(label);
            }
            for (a, &idx) in acc.iter_mut().zip(NUMERIC_FEATURES.iter()) {
                let v = row[idx];
                a.min = a.min.min(v);
                a.max = a.max.max(v);
                a.sum += v;
                if label == 1 {
                    a.sum_failure += v;
                } else {
                    a.sum_normal += v;
                }
            }
        }

        let normals = rows - failures;
        let features = if rows == 0 {
            Vec::new()
        } else {
            acc.iter()
                .zip(NUMERIC_FEATURES.iter())
                .map(|(a, &idx)| FeatureSummary {
                    name: FEATURE_NAMES[idx].to_string(),
                    min: a.min,
                    max: a.max,
                    mean: a.sum / rows as f64,
                    mean_failure: (failures > 0).then(|| a.sum_failure / failures as f64),
                    mean_normal: (normals > 0).then(|| a.sum_normal / normals as f64),
                })
                .collect()
        };

        DatasetProfile {
            total_rows: self.len(),
            filtered_rows: rows,
            failures,
            failure_rate: if rows == 0 { 0.0 } else { failures as f64 / rows as f64 },
            per_quality,
            features,
        }
    }
}
