//! `PostgreSQL` connector.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::debug;

use crate::connection::{SqlConnection, SqlConnector};
use crate::dialect::{Dialect, POSTGRES};
use crate::driver::{connect_error, invalid_uri};
use crate::error::SqlResult;

pool_connection!(PgPoolConnection, PgPool);

/// Opens `PostgreSQL` pools from `postgres://` or `postgresql://` URIs.
#[derive(Debug, Clone)]
pub struct PostgresConnector {
    options: PgConnectOptions,
}

impl PostgresConnector {
    /// Create a connector for `uri`. The URI is parsed here.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::InvalidUri`](crate::SqlError::InvalidUri) if `uri`
    /// is not a `PostgreSQL` connection URI.
    pub fn new(uri: &str) -> SqlResult<Self> {
        let options = PgConnectOptions::from_str(uri).map_err(|e| invalid_uri(uri, &e))?;
        Ok(Self { options })
    }
}

#[async_trait]
impl SqlConnector for PostgresConnector {
    fn dialect(&self) -> &'static Dialect {
        &POSTGRES
    }

    async fn connect(&self) -> SqlResult<Arc<dyn SqlConnection>> {
        debug!("Opening PostgreSQL pool");
        let pool = PgPoolOptions::new()
            .connect_with(self.options.clone())
            .await
            .map_err(connect_error)?;
        Ok(Arc::new(PgPoolConnection::new(pool)))
    }
}
