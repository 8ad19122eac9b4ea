use std::fmt;

use async_trait::async_trait;
use endb_core::{Adapter, Element, FaultBus, Namespace, StoreError, StoreFault, StoreResult};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use crate::error::store_error;

/// URI used when none is configured.
pub const DEFAULT_URI: &str = "redis://localhost:6379";

/// [`Adapter`] over a Redis server.
///
/// The connection manager is created on first use and shared by every
/// later call; it reconnects on its own after a dropped connection.
pub struct RedisAdapter {
    client: redis::Client,
    namespace: Namespace,
    connection: OnceCell<ConnectionManager>,
    faults: FaultBus,
}

impl RedisAdapter {
    /// Create an adapter for `uri`. No I/O happens until the first operation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if `uri` is not a valid Redis URI.
    pub fn new(namespace: Namespace, uri: &str) -> StoreResult<Self> {
        let client = redis::Client::open(uri)
            .map_err(|e| StoreError::Config(format!("invalid redis URI '{uri}': {e}")))?;
        Ok(Self {
            client,
            namespace,
            connection: OnceCell::new(),
            faults: FaultBus::new(),
        })
    }

    /// Publish faults on `faults` instead of a private bus.
    #[must_use]
    pub fn with_faults(mut self, faults: FaultBus) -> Self {
        self.faults = faults;
        self
    }

    /// Name of the set indexing this namespace's keys.
    fn index(&self) -> &str {
        self.namespace.as_str()
    }

    async fn connection(
        &self,
        operation: &'static str,
        key: Option<&str>,
    ) -> StoreResult<ConnectionManager> {
        let conn = self
            .connection
            .get_or_try_init(|| async {
                debug!(namespace = %self.namespace, "Connecting to Redis");
                self.client.get_connection_manager().await
            })
            .await
            .map_err(|e| self.fail(operation, key, &e))?;
        Ok(conn.clone())
    }

    fn fail(&self, operation: &'static str, key: Option<&str>, err: &redis::RedisError) -> StoreError {
        let err = store_error(err);
        if err.is_connectivity() {
            self.faults.publish(StoreFault {
                adapter: "redis",
                namespace: self.namespace.as_str().to_owned(),
                operation,
                key: key.map(str::to_owned),
                error: err.clone(),
            });
        }
        err
    }
}

impl fmt::Debug for RedisAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisAdapter")
            .field("namespace", &self.namespace)
            .field("connected", &self.connection.initialized())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Adapter for RedisAdapter {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        trace!(key, "get");
        let mut conn = self.connection("get", Some(key)).await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| self.fail("get", Some(key), &e))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        trace!(key, "set");
        let mut conn = self.connection("set", Some(key)).await?;
        let (): () = redis::pipe()
            .atomic()
            .set(key, value)
            .ignore()
            .sadd(self.index(), key)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| self.fail("set", Some(key), &e))?;
        Ok(())
    }

    async fn has(&self, key: &str) -> StoreResult<bool> {
        trace!(key, "has");
        let mut conn = self.connection("has", Some(key)).await?;
        let exists: bool = conn
            .exists(key)
            .await
            .map_err(|e| self.fail("has", Some(key), &e))?;
        Ok(exists)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        trace!(key, "delete");
        let mut conn = self.connection("delete", Some(key)).await?;
        let (removed,): (u64,) = redis::pipe()
            .atomic()
            .del(key)
            .srem(self.index(), key)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| self.fail("delete", Some(key), &e))?;
        Ok(removed > 0)
    }

    async fn clear(&self) -> StoreResult<()> {
        trace!(namespace = %self.namespace, "clear");
        let mut conn = self.connection("clear", None).await?;
        let keys: Vec<String> = conn
            .smembers(self.index())
            .await
            .map_err(|e| self.fail("clear", None, &e))?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        if !keys.is_empty() {
            pipe.del(&keys).ignore();
        }
        pipe.del(self.index()).ignore();
        let (): () = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| self.fail("clear", None, &e))?;
        Ok(())
    }

    async fn all(&self) -> StoreResult<Vec<Element<String>>> {
        trace!(namespace = %self.namespace, "all");
        let mut conn = self.connection("all", None).await?;
        let keys: Vec<String> = conn
            .smembers(self.index())
            .await
            .map_err(|e| self.fail("all", None, &e))?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| self.fail("all", None, &e))?;

        // A key may vanish between SMEMBERS and MGET.
        Ok(keys
            .into_iter()
            .zip(values)
            .filter_map(|(key, value)| value.map(|v| Element::new(key, v)))
            .collect())
    }

    fn faults(&self) -> Option<&FaultBus> {
        Some(&self.faults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_does_no_io() {
        let adapter =
            RedisAdapter::new(Namespace::new("endb").unwrap(), "redis://127.0.0.1:1").unwrap();
        assert_eq!(adapter.name(), "redis");
        assert_eq!(adapter.index(), "endb");
    }

    #[test]
    fn test_invalid_uri_is_config_error() {
        let err = RedisAdapter::new(Namespace::new("endb").unwrap(), "http://example.com")
            .err()
            .unwrap();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_and_publishes_fault() {
        let adapter =
            RedisAdapter::new(Namespace::new("endb").unwrap(), "redis://127.0.0.1:1").unwrap();
        let mut faults = adapter.faults().unwrap().subscribe();

        let err = adapter.get("endb:foo").await.unwrap_err();
        assert!(err.is_connectivity());

        let fault = faults.recv().await.unwrap();
        assert_eq!(fault.adapter, "redis");
        assert_eq!(fault.operation, "get");
    }
}
