//! Predictor configuration. Every section has defaults matching the reference dataset run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Raw data, processed data and model locations
    pub paths: PathsConfig,
    /// Train/test split parameters
    pub split: SplitConfig,
    /// Random forest hyperparameters
    pub forest: ForestConfig,
    /// Decision threshold and risk bands
    pub risk: RiskConfig,
    /// Sensor range policy for scoring input
    pub input: InputConfig,
    /// Maintenance cost assumptions for evaluation
    pub cost: CostConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub raw_data: PathBuf,
    pub processed_dir: PathBuf,
    pub models_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of rows held out for evaluation (0.0–1.0, exclusive)
    pub test_size: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// floor(sqrt(n_features)), at least one
    Sqrt,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    /// n_samples / (n_classes * class_count)
    Balanced,
    Uniform,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForestConfig {
    pub n_estimators: usize,
    /// None grows every tree until leaves are pure
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub class_weight: ClassWeight,
    pub bootstrap: bool,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskConfig {
    /// Probability strictly above this is a predicted failure (0.0–1.0)
    pub decision_threshold: f64,
    /// Probability at or above this is medium risk
    pub medium_threshold: f64,
    /// Probability at or above this is high risk
    pub high_threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// Score readings as given, however implausible
    #[default]
    Accept,
    /// Clamp each sensor into its range before scoring
    Clamp,
    /// Refuse readings with any sensor out of range
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SensorRanges {
    pub air_temperature: Range,
    pub process_temperature: Range,
    pub rotational_speed: Range,
    pub torque: Range,
    pub tool_wear: Range,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub policy: InputPolicy,
    pub ranges: SensorRanges,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CostConfig {
    /// Cost of dispatching a technician for an inspection
    pub inspection_cost: f64,
    /// Loss from an undetected machine failure
    pub failure_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_data: PathBuf::from("data/raw/ai4i2020.csv"),
            processed_dir: PathBuf::from("data/processed"),
            models_dir: PathBuf::from("models"),
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
        }
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            class_weight: ClassWeight::Balanced,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            decision_threshold: 0.5,
            medium_threshold: 0.4,
            high_threshold: 0.75,
        }
    }
}

impl Default for SensorRanges {
    fn default() -> Self {
        Self {
            air_temperature: Range::new(250.0, 350.0),
            process_temperature: Range::new(250.0, 400.0),
            rotational_speed: Range::new(1000.0, 3000.0),
            torque: Range::new(10.0, 100.0),
            tool_wear: Range::new(0.0, 300.0),
        }
    }
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            inspection_cost: 50.0,
            failure_cost: 5000.0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl PredictorConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(c)) => c,
            _ => Self::default(),
        }
    }

    /// Like [`load`](Self::load) but surfaces unreadable or malformed files.
    /// A missing file is `Ok(None)`.
    pub fn try_load(path: &Path) -> std::io::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
