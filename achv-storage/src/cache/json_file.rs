//! Single-file JSON cache backend.
//!
//! All entries live in one JSON object keyed by cache key. Every read goes
//! back to disk so that entries written by another process are visible.
//! Writes go through a sibling temp file and a rename; concurrent writers
//! race and the last rename wins.

use achv_core::CacheKey;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::entry::CacheEntry;
use super::traits::CacheBackend;
use crate::error::{StorageError, StorageResult};

type EntryMap = BTreeMap<CacheKey, CacheEntry>;

#[derive(Debug)]
pub struct JsonFileCacheBackend {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileCacheBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> StorageResult<EntryMap> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(EntryMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(EntryMap::new()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn store(&self, entries: &EntryMap) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let body = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl CacheBackend for JsonFileCacheBackend {
    fn read(&self, key: &CacheKey) -> StorageResult<Option<CacheEntry>> {
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &CacheKey, entry: CacheEntry) -> StorageResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::LockPoisoned)?;
        // A corrupt file is replaced rather than blocking every future write.
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(StorageError::Serde(err)) => {
                tracing::warn!(path = %self.path.display(), error = %err, "Discarding unreadable cache file");
                EntryMap::new()
            }
            Err(err) => return Err(err),
        };
        entries.insert(key.clone(), entry);
        self.store(&entries)
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.load()?.len())
    }
}
