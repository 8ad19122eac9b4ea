//! In-memory adapter.
//!
//! [`MemoryAdapter`] is the fallback when no backend is configured. Data
//! lives in a [`MemoryBackend`], a shared map keyed by physical key, so
//! several adapters with different namespaces can share one backend the way
//! they would share a database.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::adapter::{Adapter, Element};
use crate::error::{StoreError, StoreResult};
use crate::key::Namespace;

/// Shared physical storage for memory adapters.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of physical keys across all namespaces.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the lock is poisoned.
    pub fn len(&self) -> StoreResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(data.len())
    }

    /// Whether the backend holds no keys at all.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the lock is poisoned.
    pub fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|n| n == 0)
    }
}

/// Namespaced view of a [`MemoryBackend`]. No persistence.
#[derive(Debug, Clone)]
pub struct MemoryAdapter {
    backend: MemoryBackend,
    namespace: Namespace,
}

impl MemoryAdapter {
    /// Create an adapter over a fresh backend.
    #[must_use]
    pub fn new(namespace: Namespace) -> Self {
        Self::with_backend(MemoryBackend::new(), namespace)
    }

    /// Create an adapter over an existing, possibly shared, backend.
    #[must_use]
    pub fn with_backend(backend: MemoryBackend, namespace: Namespace) -> Self {
        Self { backend, namespace }
    }

    /// The backing storage.
    #[must_use]
    pub fn backend(&self) -> &MemoryBackend {
        &self.backend
    }
}

#[async_trait]
impl Adapter for MemoryAdapter {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let data = self
            .backend
            .data
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let mut data = self
            .backend
            .data
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        data.insert(key.to_owned(), value);
        Ok(())
    }

    async fn has(&self, key: &str) -> StoreResult<bool> {
        let data = self
            .backend
            .data
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(data.contains_key(key))
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut data = self
            .backend
            .data
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(data.remove(key).is_some())
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut data = self
            .backend
            .data
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        data.retain(|k, _| !self.namespace.owns(k));
        Ok(())
    }

    async fn all(&self) -> StoreResult<Vec<Element<String>>> {
        let data = self
            .backend
            .data
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(data
            .iter()
            .filter(|(k, _)| self.namespace.owns(k))
            .map(|(k, v)| Element::new(k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(ns: &str, backend: &MemoryBackend) -> MemoryAdapter {
        MemoryAdapter::with_backend(backend.clone(), Namespace::new(ns).unwrap())
    }

    #[tokio::test]
    async fn test_get_set_overwrite() {
        let store = MemoryAdapter::new(Namespace::new("ns").unwrap());
        assert!(store.get("ns:k").await.unwrap().is_none());
        store.set("ns:k", "v1".into()).await.unwrap();
        store.set("ns:k", "v2".into()).await.unwrap();
        assert_eq!(store.get("ns:k").await.unwrap().as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryAdapter::new(Namespace::new("ns").unwrap());
        store.set("ns:k", "v".into()).await.unwrap();
        assert!(store.has("ns:k").await.unwrap());
        assert!(store.delete("ns:k").await.unwrap());
        assert!(!store.delete("ns:k").await.unwrap());
        assert!(!store.has("ns:k").await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_and_all_are_namespace_scoped() {
        let backend = MemoryBackend::new();
        let a = adapter("a", &backend);
        let b = adapter("b", &backend);

        a.set("a:one", "1".into()).await.unwrap();
        b.set("b:two", "2".into()).await.unwrap();
        assert_eq!(a.all().await.unwrap(), vec![Element::new("a:one", "1".to_owned())]);

        a.clear().await.unwrap();
        assert!(a.all().await.unwrap().is_empty());
        assert_eq!(b.get("b:two").await.unwrap().as_deref(), Some("2"));
        assert_eq!(backend.len().unwrap(), 1);
    }
}
