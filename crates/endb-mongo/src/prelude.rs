//! Prelude module - commonly used types for convenient import.
//!
//! Use `use endb_mongo::prelude::*;` to import all essential types.

pub use crate::{DEFAULT_COLLECTION, DEFAULT_URI, MongoAdapter};
