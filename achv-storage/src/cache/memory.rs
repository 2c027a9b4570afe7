//! In-memory cache backend.

use achv_core::CacheKey;
use std::collections::HashMap;
use std::sync::RwLock;

use super::entry::CacheEntry;
use super::traits::CacheBackend;
use crate::error::{StorageError, StorageResult};

/// Process-local backend, used in tests and when no cache path is set.
#[derive(Debug, Default)]
pub struct InMemoryCacheBackend {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl InMemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheBackend for InMemoryCacheBackend {
    fn read(&self, key: &CacheKey) -> StorageResult<Option<CacheEntry>> {
        let entries = self.entries.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &CacheKey, entry: CacheEntry) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key.clone(), entry);
        Ok(())
    }

    fn len(&self) -> StorageResult<usize> {
        let entries = self.entries.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.len())
    }
}
