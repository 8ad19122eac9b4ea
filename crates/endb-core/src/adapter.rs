//! The adapter contract every backend implements.
//!
//! Adapters are addressed by physical key and store opaque serialized
//! strings. Each adapter is constructed already bound to its [`Namespace`],
//! which scopes `clear` and `all`. A successful return is a durability
//! acknowledgment in the backend's own consistency model.

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::events::FaultBus;
use crate::key::Namespace;

/// A key paired with its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Element<V> {
    /// The key (physical inside adapters, logical at the facade).
    pub key: String,
    /// The value.
    pub value: V,
}

impl<V> Element<V> {
    /// Create an element.
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Storage backend contract.
#[async_trait]
pub trait Adapter: Send + Sync + std::fmt::Debug {
    /// Short adapter name used in logs and faults (e.g. `"sqlite"`).
    fn name(&self) -> &'static str;

    /// The namespace this adapter is bound to.
    fn namespace(&self) -> &Namespace;

    /// Get the serialized value stored under a physical key.
    ///
    /// Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store a serialized value, overwriting any existing one.
    async fn set(&self, key: &str, value: String) -> StoreResult<()>;

    /// Check whether a physical key exists.
    async fn has(&self, key: &str) -> StoreResult<bool>;

    /// Delete a physical key.
    ///
    /// Returns `true` if the key existed and was removed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Delete every key in this adapter's namespace.
    async fn clear(&self) -> StoreResult<()>;

    /// Every element in this adapter's namespace, in no particular order.
    ///
    /// Optional; the default reports [`StoreError::Unsupported`].
    async fn all(&self) -> StoreResult<Vec<Element<String>>> {
        Err(StoreError::Unsupported("all"))
    }

    /// The channel this adapter reports asynchronous faults on, if any.
    fn faults(&self) -> Option<&FaultBus> {
        None
    }
}
