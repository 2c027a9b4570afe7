//! achv Storage - Progress Cache
//!
//! A TTL-bounded key-value cache for fetched progress trees. Backends only
//! move entries in and out; the [`CacheStore`] decides freshness against an
//! injectable [`Clock`] at read time.

pub mod cache;
pub mod error;

pub use cache::{
    CacheBackend, CacheEntry, CacheStats, CacheStore, Clock, InMemoryCacheBackend,
    JsonFileCacheBackend, ManualClock, SystemClock, PROGRESS_TTL,
};
pub use error::{StorageError, StorageResult};
