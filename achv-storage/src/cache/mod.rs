//! Progress cache with explicit time-to-live.
//!
//! # Contract
//!
//! - `get` returns `None` when no entry exists or when
//!   `now - entry.timestamp >= ttl`. Stale entries are ignored, not evicted.
//! - `put` overwrites any prior entry for the key with a fresh timestamp.
//! - Entries are never mutated after being written.
//! - Backends do not lock across processes; concurrent writers race and the
//!   last write wins.

pub mod clock;
pub mod entry;
pub mod json_file;
pub mod memory;
pub mod store;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use json_file::JsonFileCacheBackend;
pub use memory::InMemoryCacheBackend;
pub use store::{CacheStats, CacheStore, PROGRESS_TTL};
pub use traits::CacheBackend;
