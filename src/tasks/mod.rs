//! Background Tasks Module
//!
//! Optional tasks an embedding service may start next to the cache. The
//! cache itself never spawns anything.
//!
//! # Tasks
//! - Expiry sweep: removes expired entries when a TTL policy is configured

mod sweep;

pub use sweep::spawn_sweep_task;
