//! The seam between [`SqlAdapter`](crate::SqlAdapter) and an engine driver.

use std::sync::Arc;

use async_trait::async_trait;

use crate::dialect::Dialect;
use crate::error::SqlResult;

/// One result row, every column decoded as text.
pub type SqlRow = Vec<String>;

/// An established connection (or pool) to one engine.
///
/// Parameters are bound by the driver, never spliced into the SQL text.
#[async_trait]
pub trait SqlConnection: Send + Sync {
    /// Run a statement and return the number of affected rows.
    async fn execute(&self, sql: &str, params: &[&str]) -> SqlResult<u64>;

    /// Run a query and return its rows.
    async fn query(&self, sql: &str, params: &[&str]) -> SqlResult<Vec<SqlRow>>;
}

/// Opens connections for one engine.
#[async_trait]
pub trait SqlConnector: Send + Sync {
    /// The dialect statements for this engine must use.
    fn dialect(&self) -> &'static Dialect;

    /// Establish a connection.
    async fn connect(&self) -> SqlResult<Arc<dyn SqlConnection>>;
}
