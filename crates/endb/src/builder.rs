use std::sync::Arc;

use endb_config::EndbOptions;
use endb_core::{Adapter, Codec, FaultBus, JsonCodec, MemoryAdapter, Namespace, StoreError, StoreResult};
use tracing::debug;

use crate::db::Endb;
use crate::resolver;

/// Builder for [`Endb`].
///
/// Everything that is not plain data lives here: a custom codec and a
/// pre-built store.
#[derive(Debug, Default)]
pub struct EndbBuilder {
    options: EndbOptions,
    codec: Option<Arc<dyn Codec>>,
    store: Option<Arc<dyn Adapter>>,
}

impl EndbBuilder {
    /// Create a builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the options.
    #[must_use]
    pub fn options(mut self, options: EndbOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the connection URI.
    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.options.uri = Some(uri.into());
        self
    }

    /// Set the namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.options.namespace = namespace.into();
        self
    }

    /// Encode values with `codec` instead of [`JsonCodec`].
    #[must_use]
    pub fn codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    /// Use `store` instead of resolving one from the options.
    ///
    /// The store must have been created for the configured namespace.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn Adapter>) -> Self {
        self.store = Some(store);
        self
    }

    /// Validate the options and construct the handle.
    ///
    /// No connection is opened here.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for invalid options, an unknown or
    /// uncompiled adapter, or a store bound to another namespace.
    pub fn build(self) -> StoreResult<Endb> {
        let Self {
            options,
            codec,
            store,
        } = self;

        options
            .validate()
            .map_err(|e| StoreError::Config(e.to_string()))?;
        let namespace = Namespace::new(options.namespace.as_str())?;

        let (store, faults) = match store {
            Some(store) => {
                if store.namespace() != &namespace {
                    return Err(StoreError::Config(format!(
                        "store is bound to namespace \"{}\" but \"{namespace}\" was configured",
                        store.namespace()
                    )));
                }
                let faults = store.faults().cloned().unwrap_or_default();
                (store, faults)
            },
            None => {
                let faults = FaultBus::new();
                let store: Arc<dyn Adapter> = match resolver::resolve(&options)? {
                    Some(kind) => resolver::build(kind, &options, namespace, &faults)?,
                    None => Arc::new(MemoryAdapter::new(namespace)),
                };
                (store, faults)
            },
        };

        debug!(
            adapter = store.name(),
            namespace = %store.namespace(),
            "Endb ready"
        );
        let codec = codec.unwrap_or_else(|| Arc::new(JsonCodec::new()));
        Ok(Endb::from_parts(store, codec, faults))
    }
}
