//! Driver-level error types.

use endb_core::StoreError;

/// Errors reported by a [`SqlConnection`](crate::SqlConnection).
///
/// Drivers classify engine errors into these buckets; the adapter
/// translates them into [`StoreError`] at its boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SqlError {
    /// The connection URI could not be parsed.
    #[error("invalid connection URI: {0}")]
    InvalidUri(String),

    /// The engine could not be reached or the connection dropped.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The object being created already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The engine rejected the statement.
    #[error("statement failed: {0}")]
    Statement(String),
}

impl From<SqlError> for StoreError {
    fn from(err: SqlError) -> Self {
        match err {
            SqlError::InvalidUri(msg) => Self::Config(msg),
            SqlError::Connect(msg) => Self::Connection(msg),
            SqlError::AlreadyExists(msg) | SqlError::Statement(msg) => Self::Backend(msg),
        }
    }
}

/// Result type for driver operations.
pub type SqlResult<T> = Result<T, SqlError>;
