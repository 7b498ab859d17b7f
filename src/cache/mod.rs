//! Cache Module
//!
//! Database and table descriptor caching with name canonicalization,
//! namespace admission and cascade invalidation.

mod eviction;
mod metadata;
mod policy;
mod stats;
mod store;


// Re-export public types
pub use eviction::StorePolicy;
pub use metadata::MetadataCache;
pub use policy::{
    canonicalize, NamespacePolicy, CRAWLER_DB_PREFIX, DEFAULT_DATABASE_NAME, ESCAPE_CHAR,
    INTERNAL_DB_PREFIX, SYSTEM_DATABASE_NAME,
};
pub use stats::{CacheStats, MetadataCacheStats, StoreCounters};
pub use store::MetadataStore;
