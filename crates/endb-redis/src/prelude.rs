//! Prelude module - commonly used types for convenient import.
//!
//! Use `use endb_redis::prelude::*;` to import all essential types.

pub use crate::{DEFAULT_URI, RedisAdapter};
