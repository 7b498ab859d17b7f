//! Namespace Policy Module
//!
//! Name canonicalization and the admission rules deciding which database
//! namespaces are cached at all.

// == Policy Constants ==
/// Name of the catalog's default database
pub const DEFAULT_DATABASE_NAME: &str = "default";

/// Name of the fixed system database
pub const SYSTEM_DATABASE_NAME: &str = "okera_system";

/// Prefix of internal databases, which are cached
pub const INTERNAL_DB_PREFIX: &str = "_okera";

/// Prefix of crawler databases, which are never cached
pub const CRAWLER_DB_PREFIX: &str = "_okera_crawler";

/// Escape character stripped from names
pub const ESCAPE_CHAR: char = '`';

// == Namespace Policy ==
/// Naming constants driving canonicalization and admission.
///
/// `Default` carries the production constants. Fields are public so tests
/// can build a cache with a different policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePolicy {
    pub default_db_name: String,
    pub system_db_name: String,
    pub internal_prefix: String,
    /// Must be checked before `internal_prefix`, of which it is a longer variant
    pub crawler_prefix: String,
    pub escape_char: char,
}

impl Default for NamespacePolicy {
    fn default() -> Self {
        Self {
            default_db_name: DEFAULT_DATABASE_NAME.to_string(),
            system_db_name: SYSTEM_DATABASE_NAME.to_string(),
            internal_prefix: INTERNAL_DB_PREFIX.to_string(),
            crawler_prefix: CRAWLER_DB_PREFIX.to_string(),
            escape_char: ESCAPE_CHAR,
        }
    }
}

impl NamespacePolicy {
    // == Canonicalize ==
    /// Lower-cases the name, strips every escape character and trims
    /// surrounding spaces and ASCII control characters (every char up to
    /// `' '`). Unicode whitespace such as U+00A0 is kept.
    ///
    /// Stripping happens before trimming so whitespace inside escapes
    /// (`` "` a`" ``) is trimmed as well, which keeps the function idempotent.
    pub fn canonicalize(&self, name: &str) -> String {
        let stripped: String = name
            .to_lowercase()
            .chars()
            .filter(|c| *c != self.escape_char)
            .collect();
        stripped.trim_matches(|c: char| c <= ' ').to_string()
    }

    // == Is Cacheable ==
    /// Admission predicate over a canonical database name. First match wins:
    ///
    /// 1. default or system database: cacheable
    /// 2. crawler prefix: not cacheable
    /// 3. internal prefix: cacheable
    /// 4. anything else: not cacheable
    pub fn is_cacheable(&self, canonical_db_name: &str) -> bool {
        if canonical_db_name.eq_ignore_ascii_case(&self.default_db_name)
            || canonical_db_name.eq_ignore_ascii_case(&self.system_db_name)
        {
            return true;
        }
        if canonical_db_name.starts_with(&self.crawler_prefix) {
            return false;
        }
        canonical_db_name.starts_with(&self.internal_prefix)
    }

    // == Fully Qualified Key ==
    /// Concatenates canonical database and table names with no separator.
    ///
    /// Not collision-free: `("a", "bc")` and `("ab", "c")` share a key.
    pub fn fully_qualified_key(&self, db_name: &str, tbl_name: &str) -> String {
        let mut key = self.canonicalize(db_name);
        key.push_str(&self.canonicalize(tbl_name));
        key
    }
}

/// Canonicalizes a name with the default escape character.
pub fn canonicalize(name: &str) -> String {
    NamespacePolicy::default().canonicalize(name)
}
