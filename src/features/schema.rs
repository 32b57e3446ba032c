//! The one place that fixes column names, the category encoding and feature order.
//! Preprocessing, training, scoring and evaluation all read it from here.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const QUALITY_COLUMN: &str = "Type";
pub const AIR_TEMPERATURE_COLUMN: &str = "Air temperature [K]";
pub const PROCESS_TEMPERATURE_COLUMN: &str = "Process temperature [K]";
pub const ROTATIONAL_SPEED_COLUMN: &str = "Rotational speed [rpm]";
pub const TORQUE_COLUMN: &str = "Torque [Nm]";
pub const TOOL_WEAR_COLUMN: &str = "Tool wear [min]";
pub const LABEL_COLUMN: &str = "Machine failure";

/// Identifier and failure-mode columns of the raw dataset that never reach the model.
pub const DROPPED_COLUMNS: [&str; 7] = ["UDI", "Product ID", "TWF", "HDF", "PWF", "OSF", "RNF"];

/// Number of fields in a feature vector.
pub const NUM_FEATURES: usize = 6;

/// Canonical feature order. Index 0 is the quality code, 1..6 are the numeric sensors.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    QUALITY_COLUMN,
    AIR_TEMPERATURE_COLUMN,
    PROCESS_TEMPERATURE_COLUMN,
    ROTATIONAL_SPEED_COLUMN,
    TORQUE_COLUMN,
    TOOL_WEAR_COLUMN,
];

/// Position of the quality code in the feature vector.
pub const QUALITY_INDEX: usize = 0;

/// Indices of the standardized numeric features.
pub const NUMERIC_FEATURES: [usize; 5] = [1, 2, 3, 4, 5];

/// Columns a raw CSV must carry.
pub const REQUIRED_COLUMNS: [&str; NUM_FEATURES + 1] = [
    QUALITY_COLUMN,
    AIR_TEMPERATURE_COLUMN,
    PROCESS_TEMPERATURE_COLUMN,
    ROTATIONAL_SPEED_COLUMN,
    TORQUE_COLUMN,
    TOOL_WEAR_COLUMN,
    LABEL_COLUMN,
];

/// Product quality variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityType {
    #[serde(rename = "L")]
    Low,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "H")]
    High,
}

impl QualityType {
    pub const ALL: [QualityType; 3] = [QualityType::Low, QualityType::Medium, QualityType::High];

    /// Case-sensitive: only `L`, `M` and `H` are accepted.
    pub fn from_symbol(symbol: &str) -> Result<Self, SchemaError> {
        match symbol {
            "L" => Ok(QualityType::Low),
            "M" => Ok(QualityType::Medium),
            "H" => Ok(QualityType::High),
            other => Err(SchemaError::UnknownCategory {
                symbol: other.to_string(),
            }),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            QualityType::Low => "L",
            QualityType::Medium => "M",
            QualityType::High => "H",
        }
    }

    pub fn code(self) -> u8 {
        match self {
            QualityType::Low => 0,
            QualityType::Medium => 1,
            QualityType::High => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

impl fmt::Display for QualityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for QualityType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s)
    }
}

/// Map a quality symbol to its integer code.
pub fn encode(symbol: &str) -> Result<u8, SchemaError> {
    QualityType::from_symbol(symbol).map(QualityType::code)
}

/// Symbol → code table as persisted alongside the fitted transform.
pub fn encoding_table() -> Vec<(String, u8)> {
    QualityType::ALL
        .iter()
        .map(|q| (q.symbol().to_string(), q.code()))
        .collect()
}
