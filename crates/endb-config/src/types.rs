//! Option types.
//!
//! Every field has a default so that an empty TOML document produces a
//! working in-memory configuration.

use serde::{Deserialize, Serialize};

/// Default namespace.
pub const DEFAULT_NAMESPACE: &str = "endb";
/// Default relational table name.
pub const DEFAULT_TABLE: &str = "endb";
/// Default document collection name.
pub const DEFAULT_COLLECTION: &str = "endb";
/// Default relational key-size bound, in characters.
pub const DEFAULT_KEY_SIZE: usize = 255;

/// Connection descriptor.
///
/// `adapter` takes precedence over the scheme of `uri`. With neither set the
/// facade falls back to an in-memory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndbOptions {
    /// Connection URI for the backend driver (e.g. `postgres://db/app`).
    pub uri: Option<String>,
    /// Explicit adapter name (e.g. `"sqlite"`), overriding the URI scheme.
    pub adapter: Option<String>,
    /// Namespace scoping every key written through this descriptor.
    pub namespace: String,
    /// Collection name (document stores only).
    pub collection: String,
    /// Table name (relational backends only).
    pub table: String,
    /// Maximum physical key length (relational backends only).
    pub key_size: usize,
    /// `SQLite` busy timeout in milliseconds.
    pub busy_timeout_ms: Option<u64>,
}

impl Default for EndbOptions {
    fn default() -> Self {
        Self {
            uri: None,
            adapter: None,
            namespace: DEFAULT_NAMESPACE.to_owned(),
            collection: DEFAULT_COLLECTION.to_owned(),
            table: DEFAULT_TABLE.to_owned(),
            key_size: DEFAULT_KEY_SIZE,
            busy_timeout_ms: None,
        }
    }
}

impl EndbOptions {
    /// Options for a connection URI, everything else defaulted.
    #[must_use]
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Self::default()
        }
    }

    /// Set the connection URI.
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Select an adapter explicitly.
    #[must_use]
    pub fn with_adapter(mut self, adapter: impl Into<String>) -> Self {
        self.adapter = Some(adapter.into());
        self
    }

    /// Set the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the relational table name.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the document collection name.
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Set the relational key-size bound.
    #[must_use]
    pub fn with_key_size(mut self, key_size: usize) -> Self {
        self.key_size = key_size;
        self
    }

    /// Set the `SQLite` busy timeout.
    #[must_use]
    pub fn with_busy_timeout_ms(mut self, millis: u64) -> Self {
        self.busy_timeout_ms = Some(millis);
        self
    }
}

impl From<&str> for EndbOptions {
    fn from(uri: &str) -> Self {
        Self::from_uri(uri)
    }
}

impl From<String> for EndbOptions {
    fn from(uri: String) -> Self {
        Self::from_uri(uri)
    }
}
