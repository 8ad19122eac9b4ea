use std::sync::Arc;

use endb_config::EndbOptions;
use endb_core::{
    Adapter, Codec, Element, FaultBus, FaultReceiver, JsonCodec, MemoryAdapter, Namespace, Path,
    StoreResult, Value, validate_key,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::builder::EndbBuilder;

/// A namespaced key-value store over any [`Adapter`].
///
/// Cloning is cheap and clones share the adapter and its connection.
///
/// # Path operations
///
/// `*_path` methods address a property inside a stored value with a dotted
/// or bracketed path such as `profile.tags[0]`. Writes read the whole value,
/// modify it and write it back. Two concurrent path writes to the same key
/// can therefore lose one of the updates.
#[derive(Debug, Clone)]
pub struct Endb {
    store: Arc<dyn Adapter>,
    codec: Arc<dyn Codec>,
    faults: FaultBus,
}

impl Endb {
    /// Create a store from options.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`](endb_core::StoreError::Config) if the
    /// options are invalid or name an unknown adapter.
    pub fn new(options: EndbOptions) -> StoreResult<Self> {
        EndbBuilder::new().options(options).build()
    }

    /// Create a store for a connection URI with default options.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`](endb_core::StoreError::Config) if the
    /// adapter cannot be inferred from `uri`.
    pub fn from_uri(uri: &str) -> StoreResult<Self> {
        Self::new(EndbOptions::from_uri(uri))
    }

    /// Create an in-memory store in the default namespace.
    #[must_use]
    pub fn memory() -> Self {
        Self::from_parts(
            Arc::new(MemoryAdapter::new(Namespace::default())),
            Arc::new(JsonCodec::new()),
            FaultBus::new(),
        )
    }

    /// Start building a store.
    #[must_use]
    pub fn builder() -> EndbBuilder {
        EndbBuilder::new()
    }

    pub(crate) fn from_parts(
        store: Arc<dyn Adapter>,
        codec: Arc<dyn Codec>,
        faults: FaultBus,
    ) -> Self {
        Self {
            store,
            codec,
            faults,
        }
    }

    /// The namespace every key is scoped to.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        self.store.namespace()
    }

    /// Name of the underlying adapter.
    #[must_use]
    pub fn adapter_name(&self) -> &'static str {
        self.store.name()
    }

    /// The underlying adapter.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn Adapter> {
        &self.store
    }

    /// Subscribe to backend faults published after this call.
    #[must_use]
    pub fn subscribe_errors(&self) -> FaultReceiver {
        self.faults.subscribe()
    }

    fn physical(&self, key: &str) -> StoreResult<String> {
        validate_key(key)?;
        Ok(self.namespace().encode(key))
    }

    /// Get the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty key, a backend failure, or a stored
    /// value the codec cannot decode.
    pub async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let physical = self.physical(key)?;
        trace!(namespace = %self.namespace(), key, "get");
        match self.store.get(&physical).await? {
            Some(raw) => self.codec.decode(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Get the property at `path` inside the value stored under `key`.
    ///
    /// # Errors
    ///
    /// As [`Endb::get`], plus
    /// [`StoreError::InvalidPath`](endb_core::StoreError::InvalidPath) for a
    /// malformed path.
    pub async fn get_path(&self, key: &str, path: &str) -> StoreResult<Option<Value>> {
        let path = Path::parse(path)?;
        Ok(self
            .get(key)
            .await?
            .and_then(|root| path.get(&root).cloned()))
    }

    /// Deserialize the value stored under `key` into `T`.
    ///
    /// # Errors
    ///
    /// As [`Endb::get`], plus a serialization error if the value does not
    /// fit `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        self.get(key)
            .await?
            .map(Value::deserialize_into::<T>)
            .transpose()
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty or oversized key, or a backend failure.
    pub async fn set(&self, key: &str, value: impl Into<Value>) -> StoreResult<bool> {
        let physical = self.physical(key)?;
        let encoded = self.codec.encode(&value.into())?;
        trace!(namespace = %self.namespace(), key, "set");
        self.store.set(&physical, encoded).await?;
        Ok(true)
    }

    /// Write `value` at `path` inside the value stored under `key`.
    ///
    /// A missing or scalar value is replaced by a map first.
    ///
    /// # Errors
    ///
    /// As [`Endb::set`], plus
    /// [`StoreError::InvalidPath`](endb_core::StoreError::InvalidPath) for a
    /// malformed path or an unusable array index.
    pub async fn set_path(
        &self,
        key: &str,
        path: &str,
        value: impl Into<Value>,
    ) -> StoreResult<bool> {
        let path = Path::parse(path)?;
        let mut root = self.get(key).await?.unwrap_or_default();
        path.set(&mut root, value.into())?;
        self.set(key, root).await
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// As [`Endb::set`], plus a serialization error.
    pub async fn set_as<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<bool> {
        self.set(key, Value::from_serialize(value)?).await
    }

    /// Whether a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty key or a backend failure.
    pub async fn has(&self, key: &str) -> StoreResult<bool> {
        let physical = self.physical(key)?;
        self.store.has(&physical).await
    }

    /// Whether the value under `key` has a property at `path`.
    ///
    /// # Errors
    ///
    /// As [`Endb::get_path`].
    pub async fn has_path(&self, key: &str, path: &str) -> StoreResult<bool> {
        let path = Path::parse(path)?;
        Ok(self
            .get(key)
            .await?
            .is_some_and(|root| path.contains(&root)))
    }

    /// Delete the value under `key`. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty key or a backend failure.
    pub async fn delete(&self, key: &str) -> StoreResult<bool> {
        let physical = self.physical(key)?;
        trace!(namespace = %self.namespace(), key, "delete");
        self.store.delete(&physical).await
    }

    /// Remove the property at `path` inside the value under `key`.
    ///
    /// The value is written back only if the property existed. Returns
    /// whether it did. Removing an array element stores `Null` in its slot,
    /// so later elements keep their indices.
    ///
    /// # Errors
    ///
    /// As [`Endb::get_path`] and [`Endb::set`].
    pub async fn delete_path(&self, key: &str, path: &str) -> StoreResult<bool> {
        let path = Path::parse(path)?;
        let Some(mut root) = self.get(key).await? else {
            return Ok(false);
        };
        if !path.remove(&mut root) {
            return Ok(false);
        }
        self.set(key, root).await
    }

    /// Delete every value in this namespace.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    pub async fn clear(&self) -> StoreResult<()> {
        trace!(namespace = %self.namespace(), "clear");
        self.store.clear().await
    }

    /// Every element in this namespace, with logical keys.
    ///
    /// Order is whatever the backend returns.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure, if the adapter cannot enumerate,
    /// or if a stored value cannot be decoded.
    pub async fn all(&self) -> StoreResult<Vec<Element<Value>>> {
        let namespace = self.namespace();
        let mut elements = Vec::new();
        for element in self.store.all().await? {
            let Some(key) = namespace.decode(&element.key) else {
                continue;
            };
            let value = self.codec.decode(&element.value)?;
            elements.push(Element::new(key, value));
        }
        Ok(elements)
    }

    /// Every logical key in this namespace.
    ///
    /// # Errors
    ///
    /// As [`Endb::all`].
    pub async fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.all().await?.into_iter().map(|e| e.key).collect())
    }

    /// Every value in this namespace.
    ///
    /// # Errors
    ///
    /// As [`Endb::all`].
    pub async fn values(&self) -> StoreResult<Vec<Value>> {
        Ok(self.all().await?.into_iter().map(|e| e.value).collect())
    }

    /// Every `(key, value)` pair in this namespace.
    ///
    /// # Errors
    ///
    /// As [`Endb::all`].
    pub async fn entries(&self) -> StoreResult<Vec<(String, Value)>> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .map(|e| (e.key, e.value))
            .collect())
    }

    /// The first value for which `predicate(value, key)` holds.
    ///
    /// # Errors
    ///
    /// As [`Endb::all`].
    pub async fn find<F>(&self, predicate: F) -> StoreResult<Option<Value>>
    where
        F: Fn(&Value, &str) -> bool,
    {
        Ok(self
            .all()
            .await?
            .into_iter()
            .find(|e| predicate(&e.value, &e.key))
            .map(|e| e.value))
    }
}
