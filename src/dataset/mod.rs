//! Labeled dataset ingestion: raw CSV → canonical feature matrix + failure labels.

mod profile;
mod split;
pub mod synthetic;

pub use profile::{DatasetFilter, DatasetProfile, FeatureSummary, QualityBreakdown, StatusFilter};
pub use split::{stratified_split, SplitIndices};

use crate::error::{PipelineError, SchemaError, StorageError, TrainingError};
use crate::features::schema::{self, QualityType, FEATURE_NAMES, LABEL_COLUMN, NUM_FEATURES};
use crate::features::{FeatureVector, SensorReading};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use ndarray::{Array2, Axis};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Feature matrix in canonical column order plus one 0/1 label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: Array2<f64>,
    pub labels: Vec<u8>,
}

impl Dataset {
    pub fn from_parts(features: Array2<f64>, labels: Vec<u8>) -> Result<Self, PipelineError> {
        if features.ncols() != NUM_FEATURES {
            return Err(SchemaError::WidthMismatch {
                expected: NUM_FEATURES,
                found: features.ncols(),
            }
            .into());
        }
        if features.nrows() != labels.len() {
            return Err(TrainingError::ShapeMismatch {
                rows: features.nrows(),
                labels: labels.len(),
            }
            .into());
        }
        if let Some(&bad) = labels.iter().find(|&&l| l > 1) {
            return Err(TrainingError::InvalidLabel(bad).into());
        }
        Ok(Self { features, labels })
    }

    pub fn from_records(records: &[(SensorReading, u8)]) -> Result<Self, PipelineError> {
        let mut data = Vec::with_capacity(records.len() * NUM_FEATURES);
        let mut labels = Vec::with_capacity(records.len());
        for (reading, label) in records {
            data.extend_from_slice(FeatureVector::from_reading(reading)?.as_slice());
            labels.push(*label);
        }
        let features = Array2::from_shape_vec((records.len(), NUM_FEATURES), data)?;
        Self::from_parts(features, labels)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, PipelineError> {
        let file = std::fs::File::open(path).map_err(|e| StorageError::io(path, e))?;
        let dataset = Self::from_reader(std::io::BufReader::new(file))?;
        info!(path = %path.display(), rows = dataset.len(), "loaded raw dataset");
        Ok(dataset)
    }

    /// Parse a raw CSV. Identifier and failure-mode columns are dropped; any
    /// other unknown column is ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PipelineError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();
        let positions = schema::REQUIRED_COLUMNS
            .iter()
            .map(|name| {
                headers
                    .iter()
                    .position(|h| h == *name)
                    .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let dropped: Vec<&str> = headers
            .iter()
            .filter(|h| schema::DROPPED_COLUMNS.contains(h))
            .collect();
        debug!(?dropped, "dropping identifier and failure-mode columns");

        let mut data = Vec::new();
        let mut labels = Vec::new();
        let mut record = StringRecord::new();
        let mut row = 0usize;
        while rdr.read_record(&mut record)? {
            row += 1;
            let field = |col: usize| record.get(positions[col]).unwrap_or("");

            let quality = QualityType::from_symbol(field(0))?;
            data.push(f64::from(quality.code()));
            for col in 1..NUM_FEATURES {
                data.push(parse_number(row, col, field(col))?);
            }
            labels.push(parse_label(row, field(NUM_FEATURES))?);
        }

        let features = Array2::from_shape_vec((labels.len(), NUM_FEATURES), data)?;
        Ok(Self { features, labels })
    }

    /// Write the cleaned dataset (quality kept as its symbol) for exploration tools.
    pub fn write_cleaned_csv(&self, path: &Path) -> Result<(), PipelineError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        let mut wtr = WriterBuilder::new().from_path(path)?;
        let mut header: Vec<&str> = FEATURE_NAMES.to_vec();
        header.push(LABEL_COLUMN);
        wtr.write_record(&header)?;
        for (row, label) in self.features.axis_iter(Axis(0)).zip(&self.labels) {
            let symbol = QualityType::from_code(row[0] as u8)
                .map(QualityType::symbol)
                .unwrap_or("?");
            let mut fields = Vec::with_capacity(NUM_FEATURES + 1);
            fields.push(symbol.to_string());
            fields.extend(row.iter().skip(1).map(|v| v.to_string()));
            fields.push(label.to_string());
            wtr.write_record(&fields)?;
        }
        wtr.flush().map_err(|e| StorageError::io(path, e))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Row counts for class 0 and class 1.
    pub fn class_counts(&self) -> [usize; 2] {
        let mut counts = [0usize; 2];
        for &l in &self.labels {
            counts[usize::from(l.min(1))] += 1;
        }
        counts
    }

    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

fn parse_number(row: usize, col: usize, raw: &str) -> Result<f64, SchemaError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SchemaError::InvalidValue {
            row,
            column: FEATURE_NAMES[col].to_string(),
            value: raw.to_string(),
        })
}

fn parse_label(row: usize, raw: &str) -> Result<u8, SchemaError> {
    match raw {
        "0" => Ok(0),
        "1" => Ok(1),
        _ => Err(SchemaError::InvalidValue {
            row,
            column: LABEL_COLUMN.to_string(),
            value: raw.to_string(),
        }),
    }
}
