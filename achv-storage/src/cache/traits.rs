//! Cache backend trait.

use achv_core::CacheKey;

use super::entry::CacheEntry;
use crate::error::StorageResult;

/// Raw entry storage behind a [`super::CacheStore`].
///
/// Backends do not interpret timestamps; freshness is decided by the store.
/// Implementations must be thread-safe.
pub trait CacheBackend: Send + Sync {
    /// Read the entry stored under `key`, if any.
    fn read(&self, key: &CacheKey) -> StorageResult<Option<CacheEntry>>;

    /// Store `entry` under `key`, replacing whatever was there.
    fn write(&self, key: &CacheKey, entry: CacheEntry) -> StorageResult<()>;

    /// Number of stored entries, fresh or not.
    fn len(&self) -> StorageResult<usize>;

    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}
