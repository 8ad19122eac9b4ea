//! Redis error classification.

use endb_core::StoreError;
use redis::RedisError;

/// Translate a driver error, separating connectivity from command failures.
pub(crate) fn store_error(err: &RedisError) -> StoreError {
    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
    {
        StoreError::Connection(err.to_string())
    } else {
        StoreError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::ErrorKind;

    #[test]
    fn test_io_errors_are_connectivity() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = RedisError::from(io);
        assert!(store_error(&err).is_connectivity());
    }

    #[test]
    fn test_type_errors_are_backend() {
        let err = RedisError::from((ErrorKind::TypeError, "wrong type"));
        assert!(matches!(store_error(&err), StoreError::Backend(_)));
    }
}
