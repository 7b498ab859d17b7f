//! Table descriptor
//!
//! Metadata for one table as returned by the upstream catalog client.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single column of a table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Catalog type string, e.g. `bigint` or `array<string>`
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            comment: None,
        }
    }
}

/// Table descriptor stored in the metadata cache.
///
/// Opaque to the cache, like [`crate::models::Database`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Owning database name as reported by the catalog
    pub db_name: String,
    /// Table name as reported by the catalog
    pub table_name: String,
    #[serde(default)]
    pub owner: Option<String>,
    /// e.g. `EXTERNAL_TABLE`, `VIRTUAL_VIEW`
    #[serde(default)]
    pub table_type: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub partition_keys: Vec<Column>,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

impl Table {
    /// Creates a descriptor with only the names set.
    pub fn new(db_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            db_name: db_name.into(),
            table_name: table_name.into(),
            ..Self::default()
        }
    }

    /// Appends a column to the schema.
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }
}
