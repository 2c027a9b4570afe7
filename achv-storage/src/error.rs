//! Error types for cache backends.

use std::path::PathBuf;
use thiserror::Error;

/// Backend-level failures. The [`crate::CacheStore`] never surfaces these;
/// they are logged and the operation degrades to a miss or a no-op.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;
