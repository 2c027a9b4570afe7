//! TTL-enforcing cache front.

use achv_core::{CacheKey, LookupPayload};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::clock::{Clock, SystemClock};
use super::entry::CacheEntry;
use super::traits::CacheBackend;

/// Freshness window for cached progress trees.
pub const PROGRESS_TTL: Duration = Duration::from_secs(15 * 60);

/// Counters for cache traffic since the store was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Reads that found an entry past its TTL. Also counted in `misses`.
    pub stale: u64,
    /// Backend failures swallowed by the store.
    pub errors: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    stale: AtomicU64,
    errors: AtomicU64,
}

/// Key-value cache with a fixed time-to-live.
///
/// Neither `get` nor `put` fails: backend errors are logged and treated as a
/// miss or a dropped write.
pub struct CacheStore<B: CacheBackend> {
    backend: Arc<B>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    counters: Arc<Counters>,
}

impl<B: CacheBackend> Clone for CacheStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            clock: Arc::clone(&self.clock),
            ttl: self.ttl,
            counters: Arc::clone(&self.counters),
        }
    }
}

impl<B: CacheBackend> CacheStore<B> {
    /// A store over `backend` using the wall clock and [`PROGRESS_TTL`].
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock))
    }

    pub fn with_clock(backend: B, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend: Arc::new(backend),
            clock,
            ttl: PROGRESS_TTL,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Return the cached payload for `key` if it is younger than the TTL.
    pub fn get(&self, key: &CacheKey) -> Option<LookupPayload> {
        let entry = match self.backend.read(key) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "Cache miss");
                return None;
            }
            Err(err) => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key = %key, error = %err, "Cache read failed; treating as miss");
                return None;
            }
        };

        let now = self.clock.now();
        if !entry.is_fresh(now, self.ttl) {
            self.counters.stale.fetch_add(1, Ordering::Relaxed);
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                key = %key,
                age_secs = entry.age(now).as_secs(),
                "Cache entry stale"
            );
            return None;
        }

        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key = %key, "Cache hit");
        Some(entry.data)
    }

    /// Store `data` under `key` stamped with the current time.
    pub fn put(&self, key: &CacheKey, data: LookupPayload) {
        let entry = CacheEntry::new(self.clock.now(), data);
        if let Err(err) = self.backend.write(key, entry) {
            self.counters.errors.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(key = %key, error = %err, "Cache write failed; entry dropped");
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            stale: self.counters.stale.load(Ordering::Relaxed),
            errors: self.counters.errors.load(Ordering::Relaxed),
        }
    }
}
