//! Metadata Store Module
//!
//! Concurrent key-value store backing each half of the metadata cache.
//! The baseline policy keeps entries in a `DashMap`; TTL or size-bounded
//! policies hand expiry and LRU bookkeeping to a `moka` cache.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use moka::notification::RemovalCause;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;

use crate::cache::{CacheStats, StoreCounters, StorePolicy};

enum Backend<V> {
    /// No expiry, no bound
    Unbounded(DashMap<String, Arc<V>>),
    /// Expiry and/or LRU bound maintained by moka
    Bounded(Cache<String, Arc<V>>),
}

// == Metadata Store ==
/// Thread-safe store of immutable values keyed by canonical name.
///
/// Values are held as `Arc<V>` and replaced wholesale on insert. Single-key
/// operations are atomic with respect to each other.
pub struct MetadataStore<V> {
    backend: Backend<V>,
    policy: StorePolicy,
    /// Shared with the moka eviction listener
    counters: Arc<StoreCounters>,
}

impl<V> MetadataStore<V>
where
    V: Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a store with the baseline policy (no expiry, unbounded).
    pub fn new() -> Self {
        Self::with_policy(StorePolicy::unbounded())
    }

    /// Creates a store governed by the given policy.
    pub fn with_policy(policy: StorePolicy) -> Self {
        let counters = Arc::new(StoreCounters::new());
        let backend = if policy.is_baseline() {
            Backend::Unbounded(DashMap::new())
        } else {
            Backend::Bounded(build_bounded(&policy, Arc::clone(&counters)))
        };

        Self {
            backend,
            policy,
            counters,
        }
    }

    // == Get ==
    /// Returns the value stored under `key`, or None on a miss.
    ///
    /// An expired entry counts as a miss.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let found = match &self.backend {
            Backend::Unbounded(map) => map.get(key).map(|entry| Arc::clone(entry.value())),
            Backend::Bounded(cache) => cache.get(key),
        };

        if found.is_some() {
            self.counters.record_hit();
        } else {
            self.counters.record_miss();
        }
        found
    }

    // == Insert ==
    /// Stores or replaces the entry under `key`.
    pub fn insert(&self, key: String, value: Arc<V>) {
        match &self.backend {
            Backend::Unbounded(map) => {
                map.insert(key, value);
            }
            Backend::Bounded(cache) => cache.insert(key, value),
        }
    }

    // == Remove ==
    /// Removes the entry under `key`. Returns whether one was present.
    pub fn remove(&self, key: &str) -> bool {
        let removed = match &self.backend {
            Backend::Unbounded(map) => map.remove(key).is_some(),
            Backend::Bounded(cache) => cache.remove(key).is_some(),
        };
        if removed {
            self.counters.record_invalidations(1);
        }
        removed
    }

    // == Remove Matching ==
    /// Removes every key for which `matches` returns true.
    ///
    /// Works on a snapshot of the keys taken before any removal, so
    /// concurrent inserts and removals never disturb the scan. A key inserted
    /// after the snapshot is not considered.
    pub fn remove_matching<F>(&self, matches: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let removed = self
            .keys()
            .into_iter()
            .filter(|key| matches(key.as_str()))
            .filter(|key| match &self.backend {
                Backend::Unbounded(map) => map.remove(key.as_str()).is_some(),
                Backend::Bounded(cache) => cache.remove(key.as_str()).is_some(),
            })
            .count();

        self.counters.record_invalidations(removed as u64);
        removed
    }

    // == Cleanup Expired ==
    /// Runs pending maintenance, dropping expired and over-capacity entries.
    /// Returns the number removed by this call.
    pub fn cleanup_expired(&self) -> usize {
        match &self.backend {
            Backend::Unbounded(_) => 0,
            Backend::Bounded(cache) => {
                let before = self.counters.evictions();
                cache.run_pending_tasks();
                self.counters.evictions().saturating_sub(before) as usize
            }
        }
    }

    // == Clear ==
    /// Removes every entry. Returns the number removed.
    pub fn clear(&self) -> usize {
        self.remove_matching(|_| true)
    }

    // == Keys ==
    /// Returns a snapshot of the live keys.
    pub fn keys(&self) -> Vec<String> {
        match &self.backend {
            Backend::Unbounded(map) => map.iter().map(|entry| entry.key().clone()).collect(),
            Backend::Bounded(cache) => cache.iter().map(|(key, _)| (*key).clone()).collect(),
        }
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> CacheStats {
        let total_entries = self.len();
        self.counters.snapshot(total_entries)
    }

    pub fn policy(&self) -> StorePolicy {
        self.policy
    }

    /// Returns the current number of entries.
    ///
    /// A bounded store applies its pending evictions first, so the count
    /// never exceeds the bound once writers are quiet.
    pub fn len(&self) -> usize {
        match &self.backend {
            Backend::Unbounded(map) => map.len(),
            Backend::Bounded(cache) => {
                cache.run_pending_tasks();
                cache.entry_count() as usize
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build_bounded<V>(policy: &StorePolicy, counters: Arc<StoreCounters>) -> Cache<String, Arc<V>>
where
    V: Send + Sync + 'static,
{
    let mut builder = Cache::builder()
        .eviction_policy(EvictionPolicy::lru())
        .eviction_listener(move |_key, _value, cause: RemovalCause| {
            // Explicit removals are counted as invalidations by the store.
            if cause.was_evicted() {
                counters.record_eviction();
            }
        });
    if let Some(max_entries) = policy.max_entries() {
        builder = builder.max_capacity(max_entries);
    }
    if let Some(ttl) = policy.ttl() {
        builder = builder.time_to_live(ttl);
    }
    builder.build()
}

impl<V> Default for MetadataStore<V>
where
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for MetadataStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataStore")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
