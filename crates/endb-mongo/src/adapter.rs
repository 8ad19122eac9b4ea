use std::fmt;

use async_trait::async_trait;
use endb_core::{Adapter, Element, FaultBus, Namespace, StoreError, StoreFault, StoreResult};
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::error::ErrorKind;
use mongodb::options::{ConnectionString, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, trace};

/// URI used when none is configured.
pub const DEFAULT_URI: &str = "mongodb://127.0.0.1:27017";

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "endb";

/// Database used when the URI names none.
const DEFAULT_DATABASE: &str = "endb";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Record {
    key: String,
    value: String,
}

/// [`Adapter`] over a `MongoDB` collection.
///
/// The client, collection and unique key index are set up on first use.
pub struct MongoAdapter {
    uri: String,
    collection_name: String,
    namespace: Namespace,
    prefix_filter: Document,
    collection: OnceCell<Collection<Record>>,
    faults: FaultBus,
}

impl MongoAdapter {
    /// Create an adapter. The URI is parsed here; no I/O happens until the
    /// first operation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if `uri` is not a `MongoDB` connection
    /// string.
    pub fn new(
        namespace: Namespace,
        uri: impl Into<String>,
        collection: impl Into<String>,
    ) -> StoreResult<Self> {
        let uri = uri.into();
        ConnectionString::parse(&uri)
            .map_err(|e| StoreError::Config(format!("invalid MongoDB URI \"{uri}\": {e}")))?;
        let pattern = format!("^{}", regex::escape(namespace.prefix()));
        Ok(Self {
            uri,
            collection_name: collection.into(),
            prefix_filter: doc! { "key": { "$regex": pattern } },
            namespace,
            collection: OnceCell::new(),
            faults: FaultBus::new(),
        })
    }

    /// Publish faults on `faults` instead of a private bus.
    #[must_use]
    pub fn with_faults(mut self, faults: FaultBus) -> Self {
        self.faults = faults;
        self
    }

    async fn collection(
        &self,
        operation: &'static str,
        key: Option<&str>,
    ) -> StoreResult<&Collection<Record>> {
        self.collection
            .get_or_try_init(|| self.establish())
            .await
            .map_err(|e| self.report(operation, key, e))
    }

    async fn establish(&self) -> StoreResult<Collection<Record>> {
        debug!(
            namespace = %self.namespace,
            collection = %self.collection_name,
            "Connecting to MongoDB"
        );
        let client = Client::with_uri_str(&self.uri)
            .await
            .map_err(|e| store_error(&e))?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        let collection = database.collection::<Record>(&self.collection_name);

        let index = IndexModel::builder()
            .keys(doc! { "key": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection
            .create_index(index)
            .await
            .map_err(|e| store_error(&e))?;

        debug!(collection = %self.collection_name, "Connected");
        Ok(collection)
    }

    fn fail(&self, operation: &'static str, key: Option<&str>, err: &mongodb::error::Error) -> StoreError {
        self.report(operation, key, store_error(err))
    }

    fn report(&self, operation: &'static str, key: Option<&str>, err: StoreError) -> StoreError {
        if err.is_connectivity() {
            self.faults.publish(StoreFault {
                adapter: "mongo",
                namespace: self.namespace.as_str().to_owned(),
                operation,
                key: key.map(str::to_owned),
                error: err.clone(),
            });
        }
        err
    }
}

fn store_error(err: &mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => StoreError::Connection(err.to_string()),
        _ => StoreError::Backend(err.to_string()),
    }
}

impl fmt::Debug for MongoAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoAdapter")
            .field("namespace", &self.namespace)
            .field("collection", &self.collection_name)
            .field("connected", &self.collection.initialized())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Adapter for MongoAdapter {
    fn name(&self) -> &'static str {
        "mongo"
    }

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        trace!(key, "get");
        let collection = self.collection("get", Some(key)).await?;
        let record = collection
            .find_one(doc! { "key": key })
            .await
            .map_err(|e| self.fail("get", Some(key), &e))?;
        Ok(record.map(|r| r.value))
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        trace!(key, "set");
        let collection = self.collection("set", Some(key)).await?;
        let record = Record {
            key: key.to_owned(),
            value,
        };
        collection
            .replace_one(doc! { "key": key }, record)
            .upsert(true)
            .await
            .map_err(|e| self.fail("set", Some(key), &e))?;
        Ok(())
    }

    async fn has(&self, key: &str) -> StoreResult<bool> {
        trace!(key, "has");
        let collection = self.collection("has", Some(key)).await?;
        let count = collection
            .count_documents(doc! { "key": key })
            .await
            .map_err(|e| self.fail("has", Some(key), &e))?;
        Ok(count > 0)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        trace!(key, "delete");
        let collection = self.collection("delete", Some(key)).await?;
        let result = collection
            .delete_one(doc! { "key": key })
            .await
            .map_err(|e| self.fail("delete", Some(key), &e))?;
        Ok(result.deleted_count > 0)
    }

    async fn clear(&self) -> StoreResult<()> {
        trace!(namespace = %self.namespace, "clear");
        let collection = self.collection("clear", None).await?;
        collection
            .delete_many(self.prefix_filter.clone())
            .await
            .map_err(|e| self.fail("clear", None, &e))?;
        Ok(())
    }

    async fn all(&self) -> StoreResult<Vec<Element<String>>> {
        trace!(namespace = %self.namespace, "all");
        let collection = self.collection("all", None).await?;
        let records: Vec<Record> = collection
            .find(self.prefix_filter.clone())
            .await
            .map_err(|e| self.fail("all", None, &e))?
            .try_collect()
            .await
            .map_err(|e| self.fail("all", None, &e))?;
        Ok(records
            .into_iter()
            .map(|r| Element::new(r.key, r.value))
            .collect())
    }

    fn faults(&self) -> Option<&FaultBus> {
        Some(&self.faults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNREACHABLE_URI: &str =
        "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200";

    fn adapter(namespace: &str, uri: &str) -> MongoAdapter {
        MongoAdapter::new(Namespace::new(namespace).unwrap(), uri, "endb").unwrap()
    }

    #[test]
    fn test_prefix_filter_is_anchored_and_escaped() {
        let adapter = adapter("a.b", DEFAULT_URI);
        let pattern = adapter
            .prefix_filter
            .get_document("key")
            .unwrap()
            .get_str("$regex")
            .unwrap();
        assert_eq!(pattern, "^a\\.b:");
    }

    #[test]
    fn test_construction_does_no_io() {
        let adapter = adapter("endb", DEFAULT_URI);
        assert_eq!(adapter.name(), "mongo");
        assert!(!adapter.collection.initialized());
    }

    #[test]
    fn test_malformed_uri_is_config_error() {
        let err = MongoAdapter::new(Namespace::default(), "not-a-mongo-uri", "endb").unwrap_err();
        assert!(matches!(err, StoreError::Config(ref msg) if msg.contains("not-a-mongo-uri")));
        assert!(!err.is_connectivity());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connectivity_fault() {
        let adapter = adapter("endb", UNREACHABLE_URI);
        let mut faults = adapter.faults().unwrap().subscribe();

        let err = adapter.get("endb:foo").await.unwrap_err();
        assert!(err.is_connectivity());
        let fault = faults.recv().await.unwrap();
        assert_eq!(fault.operation, "get");
        assert_eq!(fault.key.as_deref(), Some("endb:foo"));
    }
}
