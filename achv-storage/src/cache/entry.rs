//! Cached entry envelope.

use achv_core::LookupPayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One cached lookup result with its write time.
///
/// Serialized as `{ "timestamp": <epoch-ms>, "data": <payload> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub data: LookupPayload,
}

impl CacheEntry {
    pub fn new(timestamp: DateTime<Utc>, data: LookupPayload) -> Self {
        Self { timestamp, data }
    }

    /// Age of the entry as of `now`. Entries from the future have age zero.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.timestamp).to_std().unwrap_or(Duration::ZERO)
    }

    /// Whether the entry is still usable under `ttl` as of `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}
