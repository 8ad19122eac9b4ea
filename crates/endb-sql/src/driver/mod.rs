//! `sqlx` drivers.
//!
//! Each engine gets a [`SqlConnector`](crate::SqlConnector) that opens a
//! `sqlx` pool and a pool wrapper implementing
//! [`SqlConnection`](crate::SqlConnection). Every column is read as text.

use crate::error::SqlError;

/// Generate a pool-backed [`SqlConnection`](crate::SqlConnection).
macro_rules! pool_connection {
    ($name:ident, $pool:ty) => {
        pub(crate) struct $name {
            pool: $pool,
        }

        impl $name {
            pub(crate) fn new(pool: $pool) -> Self {
                Self { pool }
            }
        }

        #[async_trait::async_trait]
        impl $crate::connection::SqlConnection for $name {
            async fn execute(
                &self,
                sql: &str,
                params: &[&str],
            ) -> $crate::error::SqlResult<u64> {
                let mut query = sqlx::query(sql);
                for param in params {
                    query = query.bind(*param);
                }
                let result = query
                    .execute(&self.pool)
                    .await
                    .map_err($crate::driver::statement_error)?;
                Ok(result.rows_affected())
            }

            async fn query(
                &self,
                sql: &str,
                params: &[&str],
            ) -> $crate::error::SqlResult<Vec<$crate::connection::SqlRow>> {
                use sqlx::Row as _;

                let mut query = sqlx::query(sql);
                for param in params {
                    query = query.bind(*param);
                }
                let rows = query
                    .fetch_all(&self.pool)
                    .await
                    .map_err($crate::driver::statement_error)?;
                rows.iter()
                    .map(|row| {
                        (0..row.len())
                            .map(|i| {
                                row.try_get::<String, _>(i)
                                    .map_err($crate::driver::statement_error)
                            })
                            .collect::<$crate::error::SqlResult<$crate::connection::SqlRow>>()
                    })
                    .collect()
            }
        }
    };
}

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Classify an error raised by a statement on an open pool.
pub(crate) fn statement_error(err: sqlx::Error) -> SqlError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => SqlError::Connect(err.to_string()),
        sqlx::Error::Database(ref db)
            if db
                .code()
                .is_some_and(|code| matches!(code.as_ref(), "42P07" | "42S01")) =>
        {
            SqlError::AlreadyExists(err.to_string())
        },
        other => SqlError::Statement(other.to_string()),
    }
}

/// Classify an error raised while opening a pool from parsed options. A pool
/// that cannot be opened is a connectivity failure, whatever the cause.
pub(crate) fn connect_error(err: sqlx::Error) -> SqlError {
    SqlError::Connect(err.to_string())
}

/// Report a URI that the driver cannot parse.
pub(crate) fn invalid_uri(uri: &str, err: &sqlx::Error) -> SqlError {
    SqlError::InvalidUri(format!("\"{uri}\": {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_connectivity() {
        assert!(matches!(
            statement_error(sqlx::Error::PoolTimedOut),
            SqlError::Connect(_)
        ));
        assert!(matches!(
            statement_error(sqlx::Error::PoolClosed),
            SqlError::Connect(_)
        ));
    }

    #[test]
    fn test_other_errors_are_statement_failures() {
        assert!(matches!(
            statement_error(sqlx::Error::RowNotFound),
            SqlError::Statement(_)
        ));
        assert!(matches!(
            connect_error(sqlx::Error::RowNotFound),
            SqlError::Connect(_)
        ));
    }

    #[test]
    fn test_invalid_uri_names_the_uri() {
        let err = invalid_uri("bogus://", &sqlx::Error::RowNotFound);
        assert!(matches!(err, SqlError::InvalidUri(ref msg) if msg.contains("bogus://")));
    }
}
