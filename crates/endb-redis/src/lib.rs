//! Endb Redis - Redis adapter for Endb.
//!
//! Values are stored as plain strings under their physical key
//! (`namespace:key`). Each namespace also owns a Redis set, named after the
//! namespace itself, listing its keys so that `clear` and `all` never have
//! to scan the keyspace. The set name contains no `:` and so never collides
//! with a physical key.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod adapter;
mod error;

pub use adapter::{DEFAULT_URI, RedisAdapter};
