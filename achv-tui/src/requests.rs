//! Generation tokens and in-flight guards for background requests.
//!
//! Each request kind owns a [`RequestTracker`]. Starting a request bumps the
//! generation and hands out an [`InFlight`] guard; the request counts as
//! outstanding until the guard is dropped, wherever that happens.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: Arc<AtomicU64>,
    outstanding: Arc<AtomicUsize>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier one.
    pub fn begin(&self) -> InFlight {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        InFlight {
            generation,
            outstanding: Arc::clone(&self.outstanding),
        }
    }

    /// Whether `guard` belongs to the most recently started request.
    pub fn is_current(&self, guard: &InFlight) -> bool {
        guard.generation == self.latest.load(Ordering::SeqCst)
            && Arc::ptr_eq(&guard.outstanding, &self.outstanding)
    }

    pub fn in_flight(&self) -> bool {
        self.outstanding.load(Ordering::SeqCst) > 0
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Marks one request as outstanding for as long as it lives.
#[derive(Debug)]
pub struct InFlight {
    generation: u64,
    outstanding: Arc<AtomicUsize>,
}

impl InFlight {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_release_clears_in_flight() {
        let tracker = RequestTracker::new();
        assert!(!tracker.in_flight());
        let guard = tracker.begin();
        assert!(tracker.in_flight());
        drop(guard);
        assert!(!tracker.in_flight());
    }

    #[test]
    fn test_newer_request_supersedes_older() {
        let tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
        assert_eq!(second.generation(), first.generation() + 1);
        drop(second);
        assert!(tracker.in_flight());
        drop(first);
        assert!(!tracker.in_flight());
    }

    #[test]
    fn test_guard_from_another_tracker_is_never_current() {
        let lookups = RequestTracker::new();
        let realms = RequestTracker::new();
        let guard = realms.begin();
        lookups.begin();
        assert!(!lookups.is_current(&guard));
    }

    #[tokio::test]
    async fn test_panicking_task_releases_guard() {
        let tracker = RequestTracker::new();
        let guard = tracker.begin();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            panic!("request task failed");
        });
        assert!(handle.await.is_err());
        assert!(!tracker.in_flight());
    }
}
