//! Database descriptor
//!
//! Metadata for one database as returned by the upstream catalog client.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Database descriptor stored in the metadata cache.
///
/// The cache never inspects these fields; it only stores and returns the value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Database {
    /// Database name as reported by the catalog
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Storage location of the database
    #[serde(default)]
    pub location_uri: Option<String>,
    /// Owner principal
    #[serde(default)]
    pub owner_name: Option<String>,
    /// Catalog parameters
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

impl Database {
    /// Creates a descriptor with only a name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the storage location.
    pub fn with_location(mut self, location_uri: impl Into<String>) -> Self {
        self.location_uri = Some(location_uri.into());
        self
    }

    /// Adds a catalog parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}
