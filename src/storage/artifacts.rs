//! JSON artifact envelopes with a SHA-256 payload checksum, written atomically.

use crate::config::PathsConfig;
use crate::error::StorageError;
use crate::features::FittedTransform;
use crate::model::RandomForest;
use crate::pipeline::SplitArtifact;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Transform,
    Classifier,
    Split,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Transform => "transform",
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::Split => "split",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    kind: String,
    format_version: u32,
    created_at: DateTime<Utc>,
    sha256: String,
    payload: serde_json::Value,
}

/// Structural check run on every decoded payload; a checksum only proves the
/// bytes are the ones that were written.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for FittedTransform {
    fn validate(&self) -> Result<(), String> {
        FittedTransform::validate(self)
    }
}

impl Validate for RandomForest {
    fn validate(&self) -> Result<(), String> {
        RandomForest::validate(self)
    }
}

impl Validate for SplitArtifact {
    fn validate(&self) -> Result<(), String> {
        SplitArtifact::validate(self)
    }
}

fn digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Serialize `payload` into an envelope at `path`. Each write goes to its own
/// uniquely named sibling temp file that is renamed into place, so readers never
/// see a partial artifact and concurrent writers never share a temp file.
pub fn write_artifact<T: Serialize>(path: &Path, kind: ArtifactKind, payload: &T) -> Result<(), StorageError> {
    let json_err = |source| StorageError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let payload = serde_json::to_value(payload).map_err(json_err)?;
    let canonical = serde_json::to_vec(&payload).map_err(json_err)?;
    let envelope = Envelope {
        kind: kind.as_str().to_string(),
        format_version: FORMAT_VERSION,
        created_at: Utc::now(),
        sha256: digest(&canonical),
        payload,
    };
    let bytes = serde_json::to_vec(&envelope).map_err(json_err)?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StorageError::io(dir, e))?;
    let tmp_path = tmp.path().to_path_buf();
    tmp.write_all(&bytes).map_err(|e| StorageError::io(&tmp_path, e))?;
    tmp.as_file().sync_all().map_err(|e| StorageError::io(&tmp_path, e))?;
    tmp.persist(path).map_err(|e| StorageError::io(path, e.error))?;
    info!(path = %path.display(), kind = %kind, bytes = bytes.len(), "artifact written");
    Ok(())
}

/// Read and verify an envelope written by [`write_artifact`]: kind, version,
/// checksum, then the payload's own [`Validate`] check.
pub fn read_artifact<T: DeserializeOwned + Validate>(path: &Path, kind: ArtifactKind) -> Result<T, StorageError> {
    let bytes = std::fs::read(path).map_err(|e| StorageError::io(path, e))?;
    let json_err = |source| StorageError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let envelope: Envelope = serde_json::from_slice(&bytes).map_err(json_err)?;
    if envelope.kind != kind.as_str() {
        return Err(StorageError::KindMismatch {
            path: path.to_path_buf(),
            expected: kind.as_str().to_string(),
            found: envelope.kind,
        });
    }
    if envelope.format_version > FORMAT_VERSION {
        return Err(StorageError::Corrupt {
            path: path.to_path_buf(),
            reason: format!("unsupported format version {}", envelope.format_version),
        });
    }
    let canonical = serde_json::to_vec(&envelope.payload).map_err(json_err)?;
    if digest(&canonical) != envelope.sha256 {
        return Err(StorageError::Corrupt {
            path: path.to_path_buf(),
            reason: "payload checksum mismatch".to_string(),
        });
    }
    let payload: T = serde_json::from_value(envelope.payload).map_err(json_err)?;
    payload.validate().map_err(|reason| StorageError::Corrupt {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(payload)
}

/// Where the offline pipeline puts its artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    models_dir: PathBuf,
    processed_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(models_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            processed_dir: processed_dir.into(),
        }
    }

    pub fn from_config(paths: &PathsConfig) -> Self {
        Self::new(&paths.models_dir, &paths.processed_dir)
    }

    pub fn transform_path(&self) -> PathBuf {
        self.models_dir.join("preprocessing.json")
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.models_dir.join("best_model.json")
    }

    pub fn split_path(&self) -> PathBuf {
        self.processed_dir.join("split_data.json")
    }

    pub fn cleaned_data_path(&self) -> PathBuf {
        self.processed_dir.join("data_cleaned.csv")
    }

    pub fn save_transform(&self, transform: &FittedTransform) -> Result<(), StorageError> {
        write_artifact(&self.transform_path(), ArtifactKind::Transform, transform)
    }

    pub fn load_transform(&self) -> Result<FittedTransform, StorageError> {
        read_artifact(&self.transform_path(), ArtifactKind::Transform)
    }

    pub fn save_classifier(&self, model: &RandomForest) -> Result<(), StorageError> {
        write_artifact(&self.classifier_path(), ArtifactKind::Classifier, model)
    }

    pub fn load_classifier(&self) -> Result<RandomForest, StorageError> {
        read_artifact(&self.classifier_path(), ArtifactKind::Classifier)
    }

    pub fn save_split(&self, split: &SplitArtifact) -> Result<(), StorageError> {
        write_artifact(&self.split_path(), ArtifactKind::Split, split)
    }

    pub fn load_split(&self) -> Result<SplitArtifact, StorageError> {
        read_artifact(&self.split_path(), ArtifactKind::Split)
    }
}
