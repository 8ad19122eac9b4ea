//! Endb Mongo - `MongoDB` adapter for Endb.
//!
//! Each element is one document `{ key, value }` in a single collection
//! (default `endb`) with a unique index on `key`. Namespaces are told apart
//! by an anchored regex on the key prefix.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod adapter;

pub use adapter::{DEFAULT_COLLECTION, DEFAULT_URI, MongoAdapter};
