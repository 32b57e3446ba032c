//! Seeded generator of AI4I-shaped machine readings for demos, tests and benches.
//!
//! Failures follow the dataset's documented mechanisms: tool wear together with
//! high torque, power outside the 3.5–9 kW window, and poor heat dissipation at
//! low speed.

use super::Dataset;
use crate::error::PipelineError;
use crate::features::schema::{QualityType, DROPPED_COLUMNS, FEATURE_NAMES, LABEL_COLUMN};
use crate::features::SensorReading;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;

/// One generated row: the reading, its failure label and which mechanism fired.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRow {
    pub reading: SensorReading,
    pub label: u8,
    pub wear_failure: bool,
    pub heat_failure: bool,
    pub power_failure: bool,
}

pub fn synthetic_rows(n: usize, seed: u64) -> Vec<SyntheticRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let quality = match rng.gen_range(0..10) {
                0..=5 => QualityType::Low,
                6..=8 => QualityType::Medium,
                _ => QualityType::High,
            };
            let air: f64 = round1(rng.gen_range(295.0..305.0));
            let process = round1(air + 10.0 + rng.gen_range(-1.5..1.5));
            let rpm: u32 = rng.gen_range(1200..2800);
            let torque = round1(
                (40.0 - (f64::from(rpm) - 1500.0) / 40.0 + rng.gen_range(-10.0..10.0)).max(3.0),
            );
            let wear: u32 = rng.gen_range(0..250);

            let power_watts = torque * f64::from(rpm) * std::f64::consts::TAU / 60.0;
            let wear_failure = wear > 200 && torque > 45.0;
            let heat_failure = process - air < 8.6 && rpm < 1380;
            let power_failure = !(3500.0..=9000.0).contains(&power_watts);
            let label = u8::from(wear_failure || heat_failure || power_failure);

            SyntheticRow {
                reading: SensorReading::new(quality, air, process, rpm, torque, wear),
                label,
                wear_failure,
                heat_failure,
                power_failure,
            }
        })
        .collect()
}

pub fn synthetic_dataset(n: usize, seed: u64) -> Result<Dataset, PipelineError> {
    let records: Vec<(SensorReading, u8)> = synthetic_rows(n, seed)
        .into_iter()
        .map(|r| (r.reading, r.label))
        .collect();
    Dataset::from_records(&records)
}

/// Render rows as a raw CSV in the source dataset's column layout, identifier
/// and failure-mode columns included.
pub fn raw_csv(rows: &[SyntheticRow]) -> String {
    let mut out = String::new();
    let header = [
        DROPPED_COLUMNS[0],
        DROPPED_COLUMNS[1],
        FEATURE_NAMES[0],
        FEATURE_NAMES[1],
        FEATURE_NAMES[2],
        FEATURE_NAMES[3],
        FEATURE_NAMES[4],
        FEATURE_NAMES[5],
        LABEL_COLUMN,
        DROPPED_COLUMNS[2],
        DROPPED_COLUMNS[3],
        DROPPED_COLUMNS[4],
        DROPPED_COLUMNS[5],
        DROPPED_COLUMNS[6],
    ];
    out.push_str(&header.join(","));
    out.push('\n');
    for (i, row) in rows.iter().enumerate() {
        let r = &row.reading;
        let _ = writeln!(
            out,
            "{},{}{},{},{},{},{},{},{},{},{},{},{},0,0",
            i + 1,
            r.quality,
            10000 + i,
            r.quality,
            r.air_temperature,
            r.process_temperature,
            r.rotational_speed,
            r.torque,
            r.tool_wear,
            row.label,
            u8::from(row.wear_failure),
            u8::from(row.heat_failure),
            u8::from(row.power_failure),
        );
    }
    out
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
