//! Catalog Cache - process-wide metadata cache for a catalog service
//!
//! Caches database and table descriptors for a fixed set of namespaces,
//! keyed by canonicalized names, with cascade invalidation of a database's
//! tables.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use cache::{MetadataCache, NamespacePolicy, StorePolicy};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use models::{Database, Table};
pub use tasks::spawn_sweep_task;
