//! `SQLite` connector.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::connection::{SqlConnection, SqlConnector};
use crate::dialect::{Dialect, SQLITE};
use crate::driver::{connect_error, invalid_uri};
use crate::error::{SqlError, SqlResult};

pool_connection!(SqlitePoolConnection, SqlitePool);

/// Opens `SQLite` databases from `sqlite://<path>` URIs.
///
/// `sqlite://:memory:` (or an empty path) opens a private in-memory
/// database held by a single pooled connection that is never recycled.
/// File databases are created when missing; their parent directory must
/// exist. Query parameters understood by `sqlx` (`mode`, `cache`, ...) are
/// honoured. `LIKE` is made case-sensitive so that namespaces differing only
/// in case stay apart.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    uri: String,
    options: SqliteConnectOptions,
}

impl SqliteConnector {
    /// Create a connector for `uri`. The URI is parsed here.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::InvalidUri`] if `uri` does not use the `sqlite:`
    /// scheme or carries parameters `sqlx` rejects.
    pub fn new(uri: &str) -> SqlResult<Self> {
        if !uri.starts_with("sqlite:") {
            return Err(SqlError::InvalidUri(format!(
                "\"{uri}\": expected a sqlite: URI"
            )));
        }
        let mut connector = Self {
            uri: uri.to_owned(),
            options: SqliteConnectOptions::new(),
        };
        let options = match connector.database_path() {
            None => SqliteConnectOptions::from_str("sqlite::memory:"),
            Some(_) => SqliteConnectOptions::from_str(uri).map(|o| o.create_if_missing(true)),
        };
        connector.options = options
            .map_err(|e| invalid_uri(uri, &e))?
            .pragma("case_sensitive_like", "ON");
        Ok(connector)
    }

    /// How long to wait on a locked database file.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.busy_timeout(timeout);
        self
    }

    /// The database path, or `None` for an in-memory database.
    #[must_use]
    pub fn database_path(&self) -> Option<&str> {
        let path = self
            .uri
            .strip_prefix("sqlite://")
            .or_else(|| self.uri.strip_prefix("sqlite:"))
            .unwrap_or(&self.uri);
        let path = path.split_once('?').map_or(path, |(path, _)| path);
        if path.is_empty() || path == ":memory:" {
            None
        } else {
            Some(path)
        }
    }
}

#[async_trait]
impl SqlConnector for SqliteConnector {
    fn dialect(&self) -> &'static Dialect {
        &SQLITE
    }

    async fn connect(&self) -> SqlResult<Arc<dyn SqlConnection>> {
        let pool = match self.database_path() {
            None => {
                debug!("Opening in-memory SQLite database");
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None::<Duration>)
                    .max_lifetime(None::<Duration>)
                    .connect_with(self.options.clone())
                    .await
                    .map_err(connect_error)?
            },
            Some(path) => {
                debug!(path, "Opening SQLite database");
                SqlitePoolOptions::new()
                    .connect_with(self.options.clone())
                    .await
                    .map_err(connect_error)?
            },
        };
        Ok(Arc::new(SqlitePoolConnection::new(pool)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector(uri: &str) -> SqliteConnector {
        SqliteConnector::new(uri).unwrap()
    }

    #[test]
    fn test_memory_uris() {
        assert!(connector("sqlite://:memory:").database_path().is_none());
        assert!(connector("sqlite://").database_path().is_none());
        assert!(connector("sqlite::memory:").database_path().is_none());
    }

    #[test]
    fn test_file_uris() {
        assert_eq!(
            connector("sqlite:///tmp/endb.sqlite").database_path(),
            Some("/tmp/endb.sqlite")
        );
        assert_eq!(
            connector("sqlite://data/endb.sqlite").database_path(),
            Some("data/endb.sqlite")
        );
    }

    #[tokio::test]
    async fn test_memory_database_survives_between_statements() {
        let conn = connector("sqlite://:memory:").connect().await.unwrap();
        conn.execute("CREATE TABLE t (k TEXT PRIMARY KEY, v TEXT)", &[])
            .await
            .unwrap();
        let affected = conn
            .execute("INSERT INTO t (k, v) VALUES (?, ?)", &["a", "1"])
            .await
            .unwrap();
        assert_eq!(affected, 1);
        let rows = conn.query("SELECT k, v FROM t", &[]).await.unwrap();
        assert_eq!(rows, vec![vec!["a".to_owned(), "1".to_owned()]]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_a_connect_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("db.sqlite");
        let connector = connector(&format!("sqlite://{}", path.display()));
        let err = connector.connect().await.err().unwrap();
        assert!(matches!(err, crate::SqlError::Connect(_)));
    }

    #[test]
    fn test_query_parameters_are_not_part_of_the_path() {
        assert_eq!(
            connector("sqlite://data/endb.sqlite?mode=rwc").database_path(),
            Some("data/endb.sqlite")
        );
    }

    #[test]
    fn test_malformed_uris_are_rejected() {
        assert!(matches!(
            SqliteConnector::new("redis://localhost"),
            Err(SqlError::InvalidUri(_))
        ));
        assert!(matches!(
            SqliteConnector::new("sqlite://data/endb.sqlite?bogus=1"),
            Err(SqlError::InvalidUri(ref msg)) if msg.contains("bogus")
        ));
    }
}
