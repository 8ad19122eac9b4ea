//! Endb - simple key-value storage with support for multiple backends.
//!
//! [`Endb`] stores JSON-like [`Value`]s under string keys, scoped to a
//! namespace, on whichever backend the connection URI names:
//!
//! ```rust,ignore
//! use endb::Endb;
//!
//! let db = Endb::from_uri("sqlite://:memory:")?;
//! db.set("foo", "bar").await?;
//! assert_eq!(db.get("foo").await?, Some("bar".into()));
//!
//! db.set_path("profile", "name.first", "Ada").await?;
//! assert!(db.has_path("profile", "name.first").await?);
//! ```
//!
//! Without a URI or adapter name the data lives in process memory.
//!
//! # Backends
//!
//! | Scheme | Adapter | Feature |
//! |--------|---------|---------|
//! | `sqlite` | [`SqlAdapter`](endb_sql::SqlAdapter) | `sqlite` (default) |
//! | `mysql` | [`SqlAdapter`](endb_sql::SqlAdapter) | `mysql` |
//! | `postgres`, `postgresql` | [`SqlAdapter`](endb_sql::SqlAdapter) | `postgres` |
//! | `redis` | `RedisAdapter` | `redis` |
//! | `mongo`, `mongodb` | `MongoAdapter` | `mongo` |
//!
//! Connections are opened on first use. Connectivity failures fail the call
//! that hit them and are also published to [`Endb::subscribe_errors`].

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod builder;
mod db;
pub mod resolver;

pub use builder::EndbBuilder;
pub use db::Endb;
pub use resolver::AdapterKind;

pub use endb_config::{ConfigError, EndbOptions};
pub use endb_core::{
    Adapter, Codec, Element, FaultReceiver, JsonCodec, MemoryAdapter, MemoryBackend, Namespace,
    Path, StoreError, StoreFault, StoreResult, Value,
};
