//! Turns a failure probability into a binary decision and an operator risk band.

use crate::config::RiskConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64, config: &RiskConfig) -> Self {
        if score >= config.high_threshold {
            RiskLevel::High
        } else if score >= config.medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Outcome of scoring one reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub failure_probability: f64,
    /// 1 when failure is predicted
    pub decision: u8,
    pub risk_level: RiskLevel,
    /// Threshold the decision was taken against
    pub threshold: f64,
}

impl Prediction {
    pub fn is_failure(&self) -> bool {
        self.decision == 1
    }
}

pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// 1 iff `probability` is strictly above the decision threshold.
    pub fn decision(&self, probability: f64) -> u8 {
        u8::from(probability > self.config.decision_threshold)
    }

    pub fn decide(&self, probability: f64) -> Prediction {
        Prediction {
            failure_probability: probability,
            decision: self.decision(probability),
            risk_level: RiskLevel::from_score(probability, &self.config),
            threshold: self.config.decision_threshold,
        }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }
}
