//! `MySQL` connector.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::debug;

use crate::connection::{SqlConnection, SqlConnector};
use crate::dialect::{Dialect, MYSQL};
use crate::driver::{connect_error, invalid_uri};
use crate::error::SqlResult;

pool_connection!(MySqlPoolConnection, MySqlPool);

/// Opens `MySQL` pools from `mysql://` URIs.
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    options: MySqlConnectOptions,
}

impl MySqlConnector {
    /// Create a connector for `uri`. The URI is parsed here.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::InvalidUri`](crate::SqlError::InvalidUri) if `uri`
    /// is not a `MySQL` connection URI.
    pub fn new(uri: &str) -> SqlResult<Self> {
        let options = MySqlConnectOptions::from_str(uri).map_err(|e| invalid_uri(uri, &e))?;
        Ok(Self { options })
    }
}

#[async_trait]
impl SqlConnector for MySqlConnector {
    fn dialect(&self) -> &'static Dialect {
        &MYSQL
    }

    async fn connect(&self) -> SqlResult<Arc<dyn SqlConnection>> {
        debug!("Opening MySQL pool");
        let pool = MySqlPoolOptions::new()
            .connect_with(self.options.clone())
            .await
            .map_err(connect_error)?;
        Ok(Arc::new(MySqlPoolConnection::new(pool)))
    }
}
