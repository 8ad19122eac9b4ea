//! Endb SQL - one relational adapter for every SQL engine.
//!
//! [`SqlAdapter`] implements the [`Adapter`](endb_core::Adapter) contract
//! once, over a [`SqlConnector`] supplied per engine. Everything that differs
//! between engines lives in a static [`Dialect`] row:
//!
//! | Dialect | Quoting | Placeholders | Upsert |
//! |---------|---------|--------------|--------|
//! | `sqlite` | `"ident"` | `?` | `REPLACE INTO` |
//! | `mysql` | `` `ident` `` | `?` | `INSERT ... ON DUPLICATE KEY UPDATE` |
//! | `postgres` | `"ident"` | `$1`, `$2` | `INSERT ... ON CONFLICT DO UPDATE` |
//!
//! Statements are rendered once when the adapter is built; no call site
//! branches on the engine.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS endb (key VARCHAR(255) PRIMARY KEY, value TEXT)
//! ```
//!
//! One table may hold many namespaces. `clear` and `all` only touch rows
//! whose key starts with the adapter's namespace prefix. On `MySQL` the key
//! column is declared `COLLATE utf8mb4_bin` so keys compare case-sensitively.
//!
//! Connectors parse their URI when constructed; a malformed URI is
//! [`SqlError::InvalidUri`].
//!
//! # Feature Flags
//!
//! - **`sqlite`** (default) - [`SqliteConnector`] via `sqlx`
//! - **`mysql`** - [`MySqlConnector`] via `sqlx`
//! - **`postgres`** - [`PostgresConnector`] via `sqlx`

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod adapter;
pub mod connection;
pub mod dialect;
pub mod error;
pub mod statements;

#[cfg(any(feature = "sqlite", feature = "mysql", feature = "postgres"))]
pub mod driver;

pub use adapter::{SqlAdapter, SqlOptions};
pub use connection::{SqlConnection, SqlConnector, SqlRow};
pub use dialect::{DIALECTS, Dialect, MYSQL, POSTGRES, Placeholder, SQLITE};
pub use error::{SqlError, SqlResult};
pub use statements::{Statements, like_prefix};

#[cfg(feature = "mysql")]
pub use driver::mysql::MySqlConnector;
#[cfg(feature = "postgres")]
pub use driver::postgres::PostgresConnector;
#[cfg(feature = "sqlite")]
pub use driver::sqlite::SqliteConnector;
