//! Eviction Policy Module
//!
//! Per-store expiry and size settings layered under the cache contract.
//! The baseline never expires or evicts; TTL and size-bound variants can be
//! swapped in without changing how callers get, set or invalidate entries.

use std::time::Duration;

// == Store Policy ==
/// Expiry and capacity settings for one [`crate::cache::MetadataStore`].
///
/// A bounded store evicts its least recently used entry once it holds more
/// than `max_entries`. [`crate::CacheConfig::validate`] rejects a bound of 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorePolicy {
    ttl: Option<Duration>,
    max_entries: Option<u64>,
}

impl StorePolicy {
    /// Baseline policy: entries live until explicitly invalidated.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Entries expire `ttl` after they were stored.
    pub fn expire_after(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            max_entries: None,
        }
    }

    /// Keeps at most `max_entries`, evicting the least recently used.
    pub fn bounded(max_entries: u64) -> Self {
        Self {
            ttl: None,
            max_entries: Some(max_entries),
        }
    }

    /// Adds or clears an expiry on top of the current settings.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn max_entries(&self) -> Option<u64> {
        self.max_entries
    }

    /// True when neither expiry nor a size bound applies.
    pub fn is_baseline(&self) -> bool {
        self.ttl.is_none() && self.max_entries.is_none()
    }
}
