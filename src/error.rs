//! Error taxonomy for the offline pipeline and the online scoring path.
//!
//! Offline stages (preprocess, train) propagate [`PipelineError`] and abort.
//! Online callers turn [`StorageError`] into an "unavailable" outcome instead.

use std::path::PathBuf;
use thiserror::Error;

/// Raw data or input record does not match the feature schema.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("unrecognized quality category `{symbol}` (expected L, M or H)")]
    UnknownCategory { symbol: String },

    #[error("row {row}: invalid value `{value}` in column `{column}`")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("feature vector has {found} fields, expected {expected}")]
    WidthMismatch { expected: usize, found: usize },

    #[error("{feature} = {value} outside accepted range [{min}, {max}]")]
    OutOfRange {
        feature: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Artifact could not be written or read back.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error on {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupt artifact {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("artifact {} holds `{found}`, expected `{expected}`", path.display())]
    KindMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(path)
        } else {
            StorageError::Io { path, source }
        }
    }
}

/// Training data cannot produce a binary classifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrainingError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("training labels contain only class {0}")]
    SingleClass(u8),

    #[error("label {0} is not a binary class")]
    InvalidLabel(u8),

    #[error("{rows} feature rows but {labels} labels")]
    ShapeMismatch { rows: usize, labels: usize },

    #[error("training matrix has {found} columns, expected {expected}")]
    WidthMismatch { expected: usize, found: usize },
}

/// Any failure of an offline pipeline stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Training(#[from] TrainingError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("matrix shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("invalid split: {0}")]
    InvalidSplit(String),
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
