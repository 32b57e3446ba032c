//! What the confusion matrix costs in maintenance money.

use super::metrics::ConfusionMatrix;
use crate::config::CostConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostImpact {
    pub inspection_cost: f64,
    pub failure_cost: f64,
    /// Every real failure goes undetected
    pub cost_without_model: f64,
    /// Inspect every predicted failure, pay for the missed ones
    pub cost_with_model: f64,
    pub savings: f64,
}

impl CostImpact {
    pub fn simulate(cm: &ConfusionMatrix, cost: &CostConfig) -> Self {
        let without = (cm.true_positive + cm.false_negative) as f64 * cost.failure_cost;
        let inspections = (cm.true_positive + cm.false_positive) as f64 * cost.inspection_cost;
        let missed = cm.false_negative as f64 * cost.failure_cost;
        let with = inspections + missed;
        Self {
            inspection_cost: cost.inspection_cost,
            failure_cost: cost.failure_cost,
            cost_without_model: without,
            cost_with_model: with,
            savings: without - with,
        }
    }
}
