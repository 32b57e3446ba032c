//! Request-time scoring: one raw reading in, one prediction out.
//!
//! A [`Scorer`] is a pure function of the reading and its two artifacts. The
//! [`ScoringService`] wraps artifact loading and reports missing artifacts as
//! [`ScoreOutcome::Unavailable`] rather than failing the request.

mod diagnostics;
mod service;

pub use diagnostics::{Diagnostics, TOOL_WEAR_LIMIT};
pub use service::{ScoreOutcome, ScoringService};

use crate::config::{InputConfig, InputPolicy, Range, RiskConfig};
use crate::error::SchemaError;
use crate::features::{FeatureVector, FittedTransform, SensorReading, FEATURE_NAMES};
use crate::model::Classifier;
use crate::risk::{Prediction, RiskEngine};
use std::sync::Arc;

pub struct Scorer {
    transform: Arc<FittedTransform>,
    classifier: Arc<dyn Classifier>,
    engine: RiskEngine,
    input: InputConfig,
}

impl Scorer {
    pub fn new(transform: Arc<FittedTransform>, classifier: Arc<dyn Classifier>, risk: RiskConfig) -> Self {
        Self {
            transform,
            classifier,
            engine: RiskEngine::new(risk),
            input: InputConfig::default(),
        }
    }

    pub fn with_input(mut self, input: InputConfig) -> Self {
        self.input = input;
        self
    }

    /// Encode, apply the input policy, and standardize.
    pub fn standardize(&self, reading: &SensorReading) -> Result<FeatureVector, SchemaError> {
        let raw = FeatureVector::from_reading(reading)?;
        let checked = self.apply_policy(raw)?;
        Ok(self.transform.transform_vector(&checked))
    }

    pub fn score(&self, reading: &SensorReading) -> Result<Prediction, SchemaError> {
        let standardized = self.standardize(reading)?;
        let probability = self.classifier.probability(&standardized);
        Ok(self.engine.decide(probability))
    }

    pub fn engine(&self) -> &RiskEngine {
        &self.engine
    }

    fn apply_policy(&self, mut v: FeatureVector) -> Result<FeatureVector, SchemaError> {
        let r = &self.input.ranges;
        let ranges: [(usize, &Range); 5] = [
            (1, &r.air_temperature),
            (2, &r.process_temperature),
            (3, &r.rotational_speed),
            (4, &r.torque),
            (5, &r.tool_wear),
        ];
        match self.input.policy {
            InputPolicy::Accept => {}
            InputPolicy::Clamp => {
                for (idx, range) in ranges {
                    v.values[idx] = range.clamp(v.values[idx]);
                }
            }
            InputPolicy::Reject => {
                for (idx, range) in ranges {
                    let value = v.values[idx];
                    if !range.contains(value) {
                        return Err(SchemaError::OutOfRange {
                            feature: FEATURE_NAMES[idx].to_string(),
                            value,
                            min: range.min,
                            max: range.max,
                        });
                    }
                }
            }
        }
        Ok(v)
    }
}
