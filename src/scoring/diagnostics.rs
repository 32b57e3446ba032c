//! Operator-facing figures derived directly from a reading, independent of the model.

use crate::features::SensorReading;
use serde::{Deserialize, Serialize};

/// Tool wear (minutes) treated as end of tool life.
pub const TOOL_WEAR_LIMIT: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// torque × rpm / 1000
    pub power_strain_kw: f64,
    /// Process minus air temperature, K
    pub temperature_delta: f64,
    /// Minutes left before the wear limit; negative once past it
    pub tool_life_remaining: i64,
}

impl Diagnostics {
    pub fn from_reading(reading: &SensorReading) -> Self {
        Self {
            power_strain_kw: reading.torque * f64::from(reading.rotational_speed) / 1000.0,
            temperature_delta: reading.process_temperature - reading.air_temperature,
            tool_life_remaining: TOOL_WEAR_LIMIT - i64::from(reading.tool_wear),
        }
    }
}
