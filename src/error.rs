//! Error types for the metadata cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the metadata cache.
///
/// Cache operations themselves never fail: misses and no-op writes or
/// invalidations are normal outcomes. Errors only come from building a
/// cache out of an unusable configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A configuration value is out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the metadata cache.
pub type Result<T> = std::result::Result<T, CacheError>;
