//! The relational adapter.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use endb_core::{Adapter, Element, FaultBus, Namespace, StoreError, StoreFault, StoreResult};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, error, trace};

use crate::connection::{SqlConnection, SqlConnector};
use crate::dialect::Dialect;
use crate::error::SqlError;
use crate::statements::{Statements, like_prefix};

/// Default table name.
pub const DEFAULT_TABLE: &str = "endb";

/// Default maximum physical key length, in characters.
pub const DEFAULT_KEY_SIZE: usize = 255;

/// Table layout options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlOptions {
    /// Table holding all rows.
    pub table: String,
    /// Width of the key column; longer keys are rejected before any I/O.
    pub key_size: usize,
}

impl Default for SqlOptions {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_owned(),
            key_size: DEFAULT_KEY_SIZE,
        }
    }
}

impl SqlOptions {
    /// Set the table name.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the key column width.
    #[must_use]
    pub fn with_key_size(mut self, key_size: usize) -> Self {
        self.key_size = key_size;
        self
    }
}

/// [`Adapter`] over any SQL engine with a [`SqlConnector`].
///
/// The connection is opened on first use, exactly once even when many calls
/// race for it, and the table is created right after. Calls queued behind a
/// failed connection attempt share its error; the next call after that
/// retries. A failed table creation poisons the adapter: every later call
/// returns the same error.
pub struct SqlAdapter {
    connector: Arc<dyn SqlConnector>,
    dialect: &'static Dialect,
    namespace: Namespace,
    options: SqlOptions,
    statements: Statements,
    like_pattern: String,
    connection: OnceCell<Arc<dyn SqlConnection>>,
    attempts: AtomicU64,
    setup: Mutex<Setup>,
    faults: FaultBus,
}

/// Outcome of the last connection attempt, guarded by the setup lock.
#[derive(Debug, Default)]
struct Setup {
    last_error: Option<StoreError>,
    poisoned: bool,
}

impl SqlAdapter {
    /// Create an adapter. No I/O happens until the first operation.
    #[must_use]
    pub fn new(connector: Arc<dyn SqlConnector>, namespace: Namespace, options: SqlOptions) -> Self {
        let dialect = connector.dialect();
        let statements = Statements::render(dialect, &options.table, options.key_size);
        let like_pattern = like_prefix(namespace.prefix());
        Self {
            connector,
            dialect,
            namespace,
            options,
            statements,
            like_pattern,
            connection: OnceCell::new(),
            attempts: AtomicU64::new(0),
            setup: Mutex::new(Setup::default()),
            faults: FaultBus::new(),
        }
    }

    /// Publish faults on `faults` instead of a private bus.
    #[must_use]
    pub fn with_faults(mut self, faults: FaultBus) -> Self {
        self.faults = faults;
        self
    }

    /// The dialect in use.
    #[must_use]
    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    /// The rendered statements.
    #[must_use]
    pub fn statements(&self) -> &Statements {
        &self.statements
    }

    /// Table layout options.
    #[must_use]
    pub fn options(&self) -> &SqlOptions {
        &self.options
    }

    async fn connection(
        &self,
        operation: &'static str,
        key: Option<&str>,
    ) -> StoreResult<&Arc<dyn SqlConnection>> {
        if let Some(conn) = self.connection.get() {
            return Ok(conn);
        }
        let seen = self.attempts.load(Ordering::Acquire);
        let mut setup = self.setup.lock().await;
        if let Some(conn) = self.connection.get() {
            return Ok(conn);
        }
        if setup.poisoned || self.attempts.load(Ordering::Acquire) != seen {
            let err = setup.last_error.clone().unwrap_or_else(|| {
                StoreError::Internal("connection attempt left no outcome".to_owned())
            });
            return Err(self.fail(operation, key, err));
        }

        let outcome = self.establish().await;
        self.attempts.fetch_add(1, Ordering::Release);
        match outcome {
            Ok(conn) => {
                setup.last_error = None;
                Ok(self.connection.get_or_init(|| async move { conn }).await)
            },
            Err(Failure::Retry(err)) => {
                setup.last_error = Some(err.clone());
                Err(self.fail(operation, key, err))
            },
            Err(Failure::Fatal(err)) => {
                setup.poisoned = true;
                setup.last_error = Some(err.clone());
                Err(self.fail(operation, key, err))
            },
        }
    }

    async fn establish(&self) -> Result<Arc<dyn SqlConnection>, Failure> {
        debug!(
            adapter = self.dialect.name,
            namespace = %self.namespace,
            table = %self.options.table,
            "Connecting"
        );
        let conn = self
            .connector
            .connect()
            .await
            .map_err(|e| Failure::Retry(e.into()))?;

        match conn.execute(&self.statements.create_table, &[]).await {
            Ok(_) | Err(SqlError::AlreadyExists(_)) => {},
            Err(SqlError::Connect(msg)) => return Err(Failure::Retry(StoreError::Connection(msg))),
            Err(SqlError::Statement(msg) | SqlError::InvalidUri(msg)) => {
                let err = StoreError::Backend(format!(
                    "failed to create table '{}': {msg}",
                    self.options.table
                ));
                error!(
                    adapter = self.dialect.name,
                    table = %self.options.table,
                    error = %err,
                    "Table creation failed, adapter unusable"
                );
                return Err(Failure::Fatal(err));
            },
        }

        debug!(adapter = self.dialect.name, "Connected");
        Ok(conn)
    }

    /// Report `err` on the fault bus when it is a connectivity failure, and
    /// hand it back for the caller to return.
    fn fail(&self, operation: &'static str, key: Option<&str>, err: StoreError) -> StoreError {
        if err.is_connectivity() {
            self.faults.publish(StoreFault {
                adapter: self.dialect.name,
                namespace: self.namespace.as_str().to_owned(),
                operation,
                key: key.map(str::to_owned),
                error: err.clone(),
            });
        }
        err
    }

    fn check_key_size(&self, key: &str) -> StoreResult<()> {
        let len = key.chars().count();
        if len > self.options.key_size {
            return Err(StoreError::KeyTooLong {
                key: key.to_owned(),
                len,
                limit: self.options.key_size,
            });
        }
        Ok(())
    }
}

/// Why [`SqlAdapter::establish`] gave up.
enum Failure {
    /// The next call may try again.
    Retry(StoreError),
    /// The adapter is unusable.
    Fatal(StoreError),
}

impl fmt::Debug for SqlAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlAdapter")
            .field("dialect", &self.dialect.name)
            .field("namespace", &self.namespace)
            .field("options", &self.options)
            .field("connected", &self.connection.initialized())
            .field("attempts", &self.attempts.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Adapter for SqlAdapter {
    fn name(&self) -> &'static str {
        self.dialect.name
    }

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        trace!(adapter = self.dialect.name, key, "get");
        let conn = self.connection("get", Some(key)).await?;
        let rows = conn
            .query(&self.statements.select, &[key])
            .await
            .map_err(|e| self.fail("get", Some(key), e.into()))?;
        Ok(rows.into_iter().next().and_then(|row| row.into_iter().next()))
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        trace!(adapter = self.dialect.name, key, "set");
        self.check_key_size(key)?;
        let conn = self.connection("set", Some(key)).await?;
        conn.execute(&self.statements.upsert, &[key, &value])
            .await
            .map_err(|e| self.fail("set", Some(key), e.into()))?;
        Ok(())
    }

    async fn has(&self, key: &str) -> StoreResult<bool> {
        trace!(adapter = self.dialect.name, key, "has");
        let conn = self.connection("has", Some(key)).await?;
        let rows = conn
            .query(&self.statements.select, &[key])
            .await
            .map_err(|e| self.fail("has", Some(key), e.into()))?;
        Ok(!rows.is_empty())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        trace!(adapter = self.dialect.name, key, "delete");
        let conn = self.connection("delete", Some(key)).await?;
        let affected = conn
            .execute(&self.statements.delete, &[key])
            .await
            .map_err(|e| self.fail("delete", Some(key), e.into()))?;
        Ok(affected > 0)
    }

    async fn clear(&self) -> StoreResult<()> {
        trace!(adapter = self.dialect.name, namespace = %self.namespace, "clear");
        let conn = self.connection("clear", None).await?;
        conn.execute(&self.statements.clear, &[&self.like_pattern])
            .await
            .map_err(|e| self.fail("clear", None, e.into()))?;
        Ok(())
    }

    async fn all(&self) -> StoreResult<Vec<Element<String>>> {
        trace!(adapter = self.dialect.name, namespace = %self.namespace, "all");
        let conn = self.connection("all", None).await?;
        let rows = conn
            .query(&self.statements.select_all, &[&self.like_pattern])
            .await
            .map_err(|e| self.fail("all", None, e.into()))?;

        rows.into_iter()
            .map(|row| {
                let mut columns = row.into_iter();
                match (columns.next(), columns.next()) {
                    (Some(key), Some(value)) => Ok(Element::new(key, value)),
                    _ => Err(StoreError::Backend(
                        "select_all returned a row without key and value columns".to_owned(),
                    )),
                }
            })
            .collect()
    }

    fn faults(&self) -> Option<&FaultBus> {
        Some(&self.faults)
    }
}
