//! Metadata Cache Module
//!
//! The database and table descriptor cache. Callers pass raw names; every
//! operation canonicalizes them, and writes are gated on the namespace
//! admission policy.
//!
//! # Consistency
//! Each store is safe for concurrent use on its own, and single-key
//! operations are atomic. Nothing is atomic across the two stores: a
//! `set_tbl` racing an `invalidate_db` on the same database may survive the
//! cascade, and callers needing strict consistency must serialize those
//! calls themselves.

use std::sync::{Arc, OnceLock};

use tracing::{debug, info, trace, warn};

use crate::cache::{MetadataCacheStats, MetadataStore, NamespacePolicy, StorePolicy};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::models::{Database, Table};

static GLOBAL: OnceLock<MetadataCache> = OnceLock::new();

// == Metadata Cache ==
/// In-memory cache of database and table descriptors.
///
/// Holds two independent stores: databases keyed by canonical name and
/// tables keyed by fully-qualified key (canonical database name followed by
/// canonical table name, no separator).
#[derive(Debug)]
pub struct MetadataCache<D = Database, T = Table> {
    policy: NamespacePolicy,
    databases: MetadataStore<D>,
    tables: MetadataStore<T>,
}

impl MetadataCache {
    // == Global Instance ==
    /// Returns the process-wide cache, creating it on first access from
    /// [`CacheConfig::from_env`]. It lives until the process exits.
    ///
    /// An invalid environment configuration falls back to the baseline.
    pub fn global() -> &'static MetadataCache {
        GLOBAL.get_or_init(|| {
            let config = CacheConfig::from_env();
            info!(
                "Creating global metadata cache: db_ttl={:?}, tbl_ttl={:?}, db_max_entries={:?}, tbl_max_entries={:?}",
                config.db_ttl, config.tbl_ttl, config.db_max_entries, config.tbl_max_entries
            );
            MetadataCache::from_config(&config).unwrap_or_else(|e| {
                warn!("{}, using baseline metadata cache", e);
                MetadataCache::new()
            })
        })
    }
}

impl<D, T> MetadataCache<D, T>
where
    D: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a cache with the production naming policy and no eviction.
    pub fn new() -> Self {
        Self::with_policy(NamespacePolicy::default())
    }

    /// Creates a cache with a custom naming policy and no eviction.
    pub fn with_policy(policy: NamespacePolicy) -> Self {
        Self {
            policy,
            databases: MetadataStore::new(),
            tables: MetadataStore::new(),
        }
    }

    /// Creates a cache whose stores follow the configured eviction settings.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(
            NamespacePolicy::default(),
            config.db_store_policy(),
            config.tbl_store_policy(),
        ))
    }

    /// Creates a cache from a naming policy and one store policy per store.
    pub fn from_parts(policy: NamespacePolicy, db_store: StorePolicy, tbl_store: StorePolicy) -> Self {
        Self {
            policy,
            databases: MetadataStore::with_policy(db_store),
            tables: MetadataStore::with_policy(tbl_store),
        }
    }

    // == Naming ==
    pub fn policy(&self) -> &NamespacePolicy {
        &self.policy
    }

    /// Canonical form of a database or table name.
    pub fn canonicalize(&self, name: &str) -> String {
        self.policy.canonicalize(name)
    }

    /// Whether a canonical database name is admitted into the cache.
    pub fn is_cacheable(&self, canonical_db_name: &str) -> bool {
        self.policy.is_cacheable(canonical_db_name)
    }

    /// Key under which a table is stored.
    pub fn fully_qualified_key(&self, db_name: &str, tbl_name: &str) -> String {
        self.policy.fully_qualified_key(db_name, tbl_name)
    }

    // == Databases ==
    /// Looks up a database descriptor. Any name is a valid key, including
    /// one that canonicalizes to the empty string.
    pub fn get_db(&self, db_name: &str) -> Option<Arc<D>> {
        let db_name = self.canonicalize(db_name);
        let found = self.databases.get(&db_name);
        trace!("get_db {}: {}", db_name, if found.is_some() { "hit" } else { "miss" });
        found
    }

    /// Stores or replaces a database descriptor if its namespace is
    /// cacheable. Returns whether the descriptor was stored.
    pub fn set_db(&self, db_name: &str, db: impl Into<Arc<D>>) -> bool {
        let db_name = self.canonicalize(db_name);
        if !self.is_cacheable(&db_name) {
            debug!("set_db {}: namespace not cacheable, skipping", db_name);
            return false;
        }
        self.databases.insert(db_name.clone(), db.into());
        debug!("set_db {}: stored", db_name);
        true
    }

    /// Removes a database descriptor and, for a cacheable namespace, every
    /// cached table whose key contains the canonical database name.
    ///
    /// The cascade is a substring match over a snapshot of the table keys.
    /// It over-evicts whenever the database name appears inside another key:
    /// invalidating `_okera_a` drops tables of `_okera_ab`, and invalidating
    /// `default` drops `_okera_x`.`default_copy`.
    pub fn invalidate_db(&self, db_name: &str) {
        let db_name = self.canonicalize(db_name);
        let removed = self.databases.remove(&db_name);

        if self.is_cacheable(&db_name) {
            let evicted = self.tables.remove_matching(|key| key.contains(db_name.as_str()));
            debug!(
                "invalidate_db {}: database removed={}, tables evicted={}",
                db_name, removed, evicted
            );
        } else {
            debug!("invalidate_db {}: database removed={}", db_name, removed);
        }
    }

    // == Tables ==
    /// Looks up a table descriptor.
    pub fn get_tbl(&self, db_name: &str, tbl_name: &str) -> Option<Arc<T>> {
        let key = self.fully_qualified_key(db_name, tbl_name);
        let found = self.tables.get(&key);
        trace!("get_tbl {}: {}", key, if found.is_some() { "hit" } else { "miss" });
        found
    }

    /// Stores or replaces a table descriptor if its database namespace is
    /// cacheable. Returns whether the descriptor was stored.
    pub fn set_tbl(&self, db_name: &str, tbl_name: &str, table: impl Into<Arc<T>>) -> bool {
        let canonical_db = self.canonicalize(db_name);
        if !self.is_cacheable(&canonical_db) {
            debug!("set_tbl {}.{}: namespace not cacheable, skipping", canonical_db, tbl_name);
            return false;
        }
        let key = canonical_db + &self.canonicalize(tbl_name);
        self.tables.insert(key.clone(), table.into());
        debug!("set_tbl {}: stored", key);
        true
    }

    /// Removes exactly one table descriptor, whatever its namespace.
    pub fn invalidate_table(&self, db_name: &str, tbl_name: &str) {
        let key = self.fully_qualified_key(db_name, tbl_name);
        let removed = self.tables.remove(&key);
        debug!("invalidate_table {}: removed={}", key, removed);
    }

    // == Maintenance ==
    /// Drops expired entries from both stores. Returns the number removed.
    pub fn cleanup_expired(&self) -> usize {
        self.databases.cleanup_expired() + self.tables.cleanup_expired()
    }

    /// Returns statistics for both stores.
    pub fn stats(&self) -> MetadataCacheStats {
        MetadataCacheStats {
            databases: self.databases.stats(),
            tables: self.tables.stats(),
        }
    }

    pub fn database_count(&self) -> usize {
        self.databases.len()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

impl<D, T> Default for MetadataCache<D, T>
where
    D: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn cache() -> MetadataCache {
        MetadataCache::new()
    }

    #[test]
    fn test_db_roundtrip_canonicalizes() {
        let cache = cache();
        let db = Database::new("default");

        assert!(cache.set_db("Default", db.clone()));

        assert_eq!(cache.get_db(" DEFAULT ").as_deref(), Some(&db));
        assert_eq!(cache.get_db("`default`").as_deref(), Some(&db));
    }

    #[test]
    fn test_set_db_not_cacheable_is_noop() {
        let cache = cache();

        assert!(!cache.set_db("random_db", Database::new("random_db")));

        assert!(cache.get_db("random_db").is_none());
        assert_eq!(cache.database_count(), 0);
    }

    #[test]
    fn test_set_db_crawler_namespace_is_noop() {
        let cache = cache();
        assert!(!cache.set_db("_OKERA_CRAWLER_x", Database::new("c")));
        assert!(cache.get_db("_okera_crawler_x").is_none());
    }

    #[test]
    fn test_set_db_replaces_entry() {
        let cache = cache();
        cache.set_db("okera_system", Database::new("v1"));
        cache.set_db("OKERA_SYSTEM", Database::new("v2"));

        assert_eq!(cache.get_db("okera_system").unwrap().name, "v2");
        assert_eq!(cache.database_count(), 1);
    }

    #[test]
    fn test_set_db_accepts_shared_value() {
        let cache = cache();
        let db = Arc::new(Database::new("_okera_shared"));

        cache.set_db("_okera_shared", Arc::clone(&db));

        let cached = cache.get_db("_okera_shared").unwrap();
        assert!(Arc::ptr_eq(&db, &cached));
    }

    #[test]
    fn test_tbl_roundtrip_canonicalizes() {
        let cache = cache();
        let tbl = Table::new("okera_system", "audit_logs");

        assert!(cache.set_tbl("okera_system", "Audit_Logs", tbl.clone()));

        assert_eq!(
            cache.get_tbl("`OKERA_SYSTEM`", " audit_logs").as_deref(),
            Some(&tbl)
        );
    }

    #[test]
    fn test_set_tbl_not_cacheable_is_noop() {
        let cache = cache();

        assert!(!cache.set_tbl("sales", "orders", Table::new("sales", "orders")));

        assert!(cache.get_tbl("sales", "orders").is_none());
        assert_eq!(cache.table_count(), 0);
    }

    #[test]
    fn test_invalidate_db_cascades_to_tables() {
        let cache = cache();
        cache.set_db("_okera_x", Database::new("_okera_x"));
        cache.set_tbl("_okera_x", "t1", Table::new("_okera_x", "t1"));
        cache.set_tbl("_okera_x", "t2", Table::new("_okera_x", "t2"));
        cache.set_tbl("default", "t1", Table::new("default", "t1"));

        cache.invalidate_db("_OKERA_X");

        assert!(cache.get_db("_okera_x").is_none());
        assert!(cache.get_tbl("_okera_x", "t1").is_none());
        assert!(cache.get_tbl("_okera_x", "t2").is_none());
        assert!(cache.get_tbl("default", "t1").is_some());
    }

    #[test]
    fn test_invalidate_db_substring_over_evicts() {
        // Documented limitation: the cascade matches by substring, so a
        // database whose name contains another one loses its tables too.
        let cache = cache();
        cache.set_tbl("_okera_a", "t", Table::new("_okera_a", "t"));
        cache.set_tbl("_okera_ab", "t", Table::new("_okera_ab", "t"));

        cache.invalidate_db("_okera_a");

        assert!(cache.get_tbl("_okera_a", "t").is_none());
        assert!(cache.get_tbl("_okera_ab", "t").is_none());
    }

    #[test]
    fn test_invalidate_db_not_cacheable_is_noop() {
        let cache = cache();
        cache.set_db("default", Database::new("default"));
        cache.set_tbl("default", "random_db_t", Table::new("default", "random_db_t"));

        // Not cacheable, so no cascade even though "random_db" occurs in a key.
        cache.invalidate_db("random_db");

        assert_eq!(cache.database_count(), 1);
        assert_eq!(cache.table_count(), 1);
    }

    #[test]
    fn test_invalidate_never_populated_is_noop() {
        let cache = cache();
        cache.set_db("default", Database::new("default"));

        cache.invalidate_db("_okera_missing");
        cache.invalidate_table("_okera_missing", "t");

        assert_eq!(cache.database_count(), 1);
    }

    #[test]
    fn test_invalidate_table_removes_one_entry() {
        let cache = cache();
        cache.set_db("default", Database::new("default"));
        cache.set_tbl("default", "t1", Table::new("default", "t1"));
        cache.set_tbl("default", "t2", Table::new("default", "t2"));

        cache.invalidate_table("DEFAULT", "`T1`");

        assert!(cache.get_tbl("default", "t1").is_none());
        assert!(cache.get_tbl("default", "t2").is_some());
        assert!(cache.get_db("default").is_some());
    }

    #[test]
    fn test_invalidate_db_default_over_evicts_other_namespace() {
        // "default" occurs inside the key "_okera_xdefault_copy".
        let cache = cache();
        cache.set_tbl("_okera_x", "default_copy", Table::new("_okera_x", "default_copy"));
        cache.set_tbl("_okera_x", "orders", Table::new("_okera_x", "orders"));
        assert_eq!(cache.fully_qualified_key("_okera_x", "default_copy"), "_okera_xdefault_copy");

        cache.invalidate_db("default");

        assert!(cache.get_tbl("_okera_x", "default_copy").is_none());
        assert!(cache.get_tbl("_okera_x", "orders").is_some());
    }

    #[test]
    fn test_empty_names_are_ordinary_keys() {
        let cache = cache();

        assert!(cache.get_db("").is_none());
        // "" is not an admitted namespace
        assert!(!cache.set_db("  ", Database::new("x")));
        cache.invalidate_db("``");
        assert!(!cache.set_tbl("", "t", Table::new("", "t")));

        let tbl = Table::new("default", "");
        assert!(cache.set_tbl("default", "", tbl.clone()));
        assert_eq!(cache.get_tbl("default", " ").as_deref(), Some(&tbl));
        assert_eq!(cache.tables.keys(), vec!["default".to_string()]);

        cache.invalidate_table("default", "``");
        assert!(cache.get_tbl("default", "").is_none());
        assert_eq!(cache.table_count(), 0);
    }

    #[test]
    fn test_custom_policy() {
        let cache: MetadataCache = MetadataCache::with_policy(NamespacePolicy {
            system_db_name: "catalog_system".to_string(),
            ..NamespacePolicy::default()
        });

        assert!(cache.set_db("catalog_system", Database::new("s")));
        assert!(!cache.set_db("okera_system", Database::new("s")));
    }

    #[test]
    fn test_generic_descriptors() {
        let cache: MetadataCache<u32, &'static str> = MetadataCache::new();
        cache.set_db("default", 7u32);
        cache.set_tbl("default", "t", "schema");

        assert_eq!(cache.get_db("default").as_deref(), Some(&7));
        assert_eq!(cache.get_tbl("default", "t").as_deref(), Some(&"schema"));
    }

    #[test]
    fn test_ttl_layered_per_store() {
        let cache: MetadataCache = MetadataCache::from_parts(
            NamespacePolicy::default(),
            StorePolicy::expire_after(Duration::from_millis(50)),
            StorePolicy::unbounded(),
        );
        cache.set_db("default", Database::new("default"));
        cache.set_tbl("default", "t1", Table::new("default", "t1"));

        sleep(Duration::from_millis(80));

        assert!(cache.get_db("default").is_none());
        assert!(cache.get_tbl("default", "t1").is_some());
    }

    #[test]
    fn test_cleanup_expired_both_stores() {
        let cache: MetadataCache = MetadataCache::from_parts(
            NamespacePolicy::default(),
            StorePolicy::expire_after(Duration::from_millis(50)),
            StorePolicy::expire_after(Duration::from_millis(50)),
        );
        cache.set_db("default", Database::new("default"));
        cache.set_tbl("default", "t1", Table::new("default", "t1"));

        sleep(Duration::from_millis(80));

        cache.cleanup_expired();
        assert_eq!(cache.database_count() + cache.table_count(), 0);
        let stats = cache.stats();
        assert_eq!(stats.databases.evictions, 1);
        assert_eq!(stats.tables.evictions, 1);
    }

    #[test]
    fn test_stats_track_both_stores() {
        let cache = cache();
        cache.set_db("default", Database::new("default"));
        cache.get_db("default");
        cache.get_db("_okera_nope");
        cache.get_tbl("default", "t");

        let stats = cache.stats();
        assert_eq!(stats.databases.hits, 1);
        assert_eq!(stats.databases.misses, 1);
        assert_eq!(stats.databases.total_entries, 1);
        assert_eq!(stats.tables.misses, 1);
    }

    #[test]
    fn test_global_is_shared() {
        let first = MetadataCache::global();
        let second = MetadataCache::global();
        assert!(std::ptr::eq(first, second));
    }
}
