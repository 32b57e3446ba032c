//! Explicit cache of loaded artifacts, keyed by path and validated against the
//! file's modification time and length on every lookup.

use super::artifacts::{read_artifact, ArtifactKind, Validate};
use crate::error::StorageError;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn of(path: &Path) -> Result<Self, StorageError> {
        let meta = std::fs::metadata(path).map_err(|e| StorageError::io(path, e))?;
        Ok(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

struct CacheEntry {
    stamp: FileStamp,
    value: Arc<dyn Any + Send + Sync>,
}

#[derive(Default)]
pub struct ArtifactCache {
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached artifact if the file is unchanged, otherwise load, validate
    /// and cache it.
    pub fn get_or_load<T>(&self, path: &Path, kind: ArtifactKind) -> Result<Arc<T>, StorageError>
    where
        T: DeserializeOwned + Validate + Send + Sync + 'static,
    {
        let stamp = FileStamp::of(path)?;
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(path).filter(|e| e.stamp == stamp) {
                if let Ok(value) = Arc::clone(&entry.value).downcast::<T>() {
                    debug!(path = %path.display(), %kind, "artifact cache hit");
                    return Ok(value);
                }
            }
        }

        debug!(path = %path.display(), %kind, "artifact cache miss");
        let value: Arc<T> = Arc::new(read_artifact(path, kind)?);
        let erased: Arc<dyn Any + Send + Sync> = value.clone();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), CacheEntry { stamp, value: erased });
        Ok(value)
    }

    /// Drop one path; returns whether it was cached.
    pub fn invalidate(&self, path: &Path) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .is_some()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
