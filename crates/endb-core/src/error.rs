//! Storage error types.

/// Errors from storage operations.
///
/// A missing key or path is never an error: lookups return `Ok(None)` or
/// `Ok(false)` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The connection descriptor or adapter selection is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The namespace or key is invalid.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A nested path could not be parsed or applied.
    #[error("invalid path `{path}`: {reason}")]
    InvalidPath {
        /// The offending path.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A physical key exceeds the backend's key-size bound.
    #[error("key `{key}` is {len} characters long, exceeding the limit of {limit}")]
    KeyTooLong {
        /// The physical key that was rejected.
        key: String,
        /// Its length in characters.
        len: usize,
        /// The configured bound.
        limit: usize,
    },

    /// The backend could not be reached or the connection was lost.
    #[error("connection error: {0}")]
    Connection(String),

    /// The backend rejected or failed a statement.
    #[error("backend error: {0}")]
    Backend(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The adapter does not provide an optional operation.
    #[error("operation `{0}` is not supported by this adapter")]
    Unsupported(&'static str),

    /// An internal invariant failed (e.g. a poisoned lock).
    #[error("storage error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether this error means the backend connection is unusable.
    ///
    /// Adapters publish these on their [`FaultBus`](crate::FaultBus).
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
