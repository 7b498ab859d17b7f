//! Configuration Module
//!
//! Loads the per-store eviction settings from environment variables.
//! The naming policy is not configurable here, see [`crate::cache::NamespacePolicy`].

use std::env;
use std::time::Duration;

use crate::cache::StorePolicy;
use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// The default is the baseline policy: no expiry and no size bound for
/// either store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL in seconds for database entries, None = never expire
    pub db_ttl: Option<u64>,
    /// TTL in seconds for table entries, None = never expire
    pub tbl_ttl: Option<u64>,
    /// Maximum number of database entries, None = unbounded
    pub db_max_entries: Option<u64>,
    /// Maximum number of table entries, None = unbounded
    pub tbl_max_entries: Option<u64>,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `METADATA_CACHE_DB_TTL_SECS` - Database entry TTL (default: none)
    /// - `METADATA_CACHE_TBL_TTL_SECS` - Table entry TTL (default: none)
    /// - `METADATA_CACHE_DB_MAX_ENTRIES` - Database store bound (default: none)
    /// - `METADATA_CACHE_TBL_MAX_ENTRIES` - Table store bound (default: none)
    /// - `METADATA_CACHE_SWEEP_INTERVAL_SECS` - Sweep frequency (default: 60)
    ///
    /// Unparsable values fall back to the default. Out-of-range values are
    /// kept and reported by [`CacheConfig::validate`].
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_ttl: parse_var("METADATA_CACHE_DB_TTL_SECS"),
            tbl_ttl: parse_var("METADATA_CACHE_TBL_TTL_SECS"),
            db_max_entries: parse_var("METADATA_CACHE_DB_MAX_ENTRIES"),
            tbl_max_entries: parse_var("METADATA_CACHE_TBL_MAX_ENTRIES"),
            sweep_interval: parse_var("METADATA_CACHE_SWEEP_INTERVAL_SECS")
                .unwrap_or(defaults.sweep_interval),
        }
    }

    // == Validate ==
    /// Rejects settings no store can honor.
    ///
    /// A size bound of 0 would admit nothing, and a sweep interval of 0
    /// would spin. Leave a bound unset for an unbounded store.
    pub fn validate(&self) -> Result<()> {
        if self.db_max_entries == Some(0) {
            return Err(CacheError::InvalidConfig(
                "db_max_entries must be at least 1".to_string(),
            ));
        }
        if self.tbl_max_entries == Some(0) {
            return Err(CacheError::InvalidConfig(
                "tbl_max_entries must be at least 1".to_string(),
            ));
        }
        if self.sweep_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "sweep_interval must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the store policy for the database store.
    pub fn db_store_policy(&self) -> StorePolicy {
        build_store_policy(self.db_ttl, self.db_max_entries)
    }

    /// Builds the store policy for the table store.
    pub fn tbl_store_policy(&self) -> StorePolicy {
        build_store_policy(self.tbl_ttl, self.tbl_max_entries)
    }

    /// Returns the sweep interval as a Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            db_ttl: None,
            tbl_ttl: None,
            db_max_entries: None,
            tbl_max_entries: None,
            sweep_interval: 60,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn build_store_policy(ttl_secs: Option<u64>, max_entries: Option<u64>) -> StorePolicy {
    let ttl = ttl_secs.map(Duration::from_secs);
    match max_entries {
        Some(max) => StorePolicy::bounded(max).with_ttl(ttl),
        None => StorePolicy::unbounded().with_ttl(ttl),
    }
}
