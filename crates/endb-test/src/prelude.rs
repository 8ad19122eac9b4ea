//! Prelude module - commonly used test helpers.
//!
//! Use `use endb_test::prelude::*;` to import all essential helpers.

pub use crate::api_suite;
pub use crate::harness::{init_tracing, setup_test_logging, sqlite_uri, test_dir};
pub use crate::recording::{RecordedStatement, RecordingConnector};
