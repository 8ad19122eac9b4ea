//! Prelude module - commonly used types for convenient import.
//!
//! Use `use endb_sql::prelude::*;` to import all essential types.

pub use crate::{SqlAdapter, SqlOptions};
pub use crate::{SqlConnection, SqlConnector, SqlError, SqlResult, SqlRow};
pub use crate::{Dialect, MYSQL, POSTGRES, SQLITE};

#[cfg(feature = "mysql")]
pub use crate::MySqlConnector;
#[cfg(feature = "postgres")]
pub use crate::PostgresConnector;
#[cfg(feature = "sqlite")]
pub use crate::SqliteConnector;
