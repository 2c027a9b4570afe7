//! In-memory realm directory, one list per region.

use achv_core::{Realm, Region};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

/// How long a fetched realm list is reused before asking the backend again.
pub const REALM_TTL: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Debug, Clone)]
struct RealmList {
    fetched_at: DateTime<Utc>,
    realms: Vec<Realm>,
}

#[derive(Debug, Clone)]
pub struct RealmDirectory {
    lists: HashMap<Region, RealmList>,
    ttl: Duration,
}

impl Default for RealmDirectory {
    fn default() -> Self {
        Self {
            lists: HashMap::new(),
            ttl: REALM_TTL,
        }
    }
}

impl RealmDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh realms for `region`, if any were loaded within the TTL.
    pub fn get(&self, region: Region, now: DateTime<Utc>) -> Option<&[Realm]> {
        let list = self.lists.get(&region)?;
        let age = (now - list.fetched_at).to_std().unwrap_or(Duration::ZERO);
        (age < self.ttl).then_some(list.realms.as_slice())
    }

    pub fn insert(&mut self, region: Region, realms: Vec<Realm>, now: DateTime<Utc>) {
        self.lists.insert(
            region,
            RealmList {
                fetched_at: now,
                realms,
            },
        );
    }

    /// Position of `slug` in the region's list, ignoring freshness.
    pub fn position(&self, region: Region, slug: &str) -> Option<usize> {
        self.lists
            .get(&region)?
            .realms
            .iter()
            .position(|realm| realm.slug.eq_ignore_ascii_case(slug.trim()))
    }

    /// Realm after (or before) `current` in the region's list, wrapping.
    /// Starts from the first (or last) realm when `current` is not listed.
    pub fn cycle(&self, region: Region, current: &str, forward: bool) -> Option<&Realm> {
        let realms = &self.lists.get(&region)?.realms;
        if realms.is_empty() {
            return None;
        }
        let len = realms.len();
        let next = match (self.position(region, current), forward) {
            (Some(idx), true) => (idx + 1) % len,
            (Some(idx), false) => (idx + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        realms.get(next)
    }
}
