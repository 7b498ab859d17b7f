//! Descriptor models
//!
//! Database and table descriptors as supplied by the upstream catalog
//! client. The cache treats both as opaque values.

pub mod database;
pub mod table;

pub use database::Database;
pub use table::{Column, Table};
