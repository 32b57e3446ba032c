//! Persisted pipeline artifacts and the in-process artifact cache.

mod artifacts;
mod cache;

pub use artifacts::{read_artifact, write_artifact, ArtifactKind, ArtifactStore, Validate, FORMAT_VERSION};
pub use cache::ArtifactCache;
