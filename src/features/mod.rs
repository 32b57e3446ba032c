//! Sensor readings, the canonical feature vector and the fitted standardization transform.

pub mod schema;
mod scaler;

pub use scaler::{FeatureStats, FittedTransform};
pub use schema::{QualityType, FEATURE_NAMES, NUM_FEATURES};

use crate::error::SchemaError;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// One raw machine reading as an operator or upstream system submits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Product quality symbol: `L`, `M` or `H`
    pub quality: String,
    /// Kelvin
    pub air_temperature: f64,
    /// Kelvin
    pub process_temperature: f64,
    /// rpm
    pub rotational_speed: u32,
    /// Nm
    pub torque: f64,
    /// minutes
    pub tool_wear: u32,
}

impl SensorReading {
    pub fn new(
        quality: QualityType,
        air_temperature: f64,
        process_temperature: f64,
        rotational_speed: u32,
        torque: f64,
        tool_wear: u32,
    ) -> Self {
        Self {
            quality: quality.symbol().to_string(),
            air_temperature,
            process_temperature,
            rotational_speed,
            torque,
            tool_wear,
        }
    }
}

/// Fixed-order numeric encoding of one record:
/// `[quality_code, air_temp, process_temp, rpm, torque, tool_wear]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: [f64; NUM_FEATURES],
}

impl FeatureVector {
    pub fn new(values: [f64; NUM_FEATURES]) -> Self {
        Self { values }
    }

    /// Encode the quality symbol and lay the sensors out in canonical order.
    pub fn from_reading(reading: &SensorReading) -> Result<Self, SchemaError> {
        let quality = QualityType::from_symbol(&reading.quality)?;
        Ok(Self::new([
            f64::from(quality.code()),
            reading.air_temperature,
            reading.process_temperature,
            f64::from(reading.rotational_speed),
            reading.torque,
            f64::from(reading.tool_wear),
        ]))
    }

    pub fn from_slice(values: &[f64]) -> Result<Self, SchemaError> {
        let values: [f64; NUM_FEATURES] =
            values.try_into().map_err(|_| SchemaError::WidthMismatch {
                expected: NUM_FEATURES,
                found: values.len(),
            })?;
        Ok(Self::new(values))
    }

    pub fn from_row(row: ArrayView1<'_, f64>) -> Result<Self, SchemaError> {
        if row.len() != NUM_FEATURES {
            return Err(SchemaError::WidthMismatch {
                expected: NUM_FEATURES,
                found: row.len(),
            });
        }
        let mut values = [0.0; NUM_FEATURES];
        for (slot, v) in values.iter_mut().zip(row.iter()) {
            *slot = *v;
        }
        Ok(Self::new(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> f64 {
        self.values[index]
    }
}
