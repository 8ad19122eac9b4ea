//! Endb Test - Shared test utilities for Endb.
//!
//! This crate provides a recording SQL connector, temp-dir helpers and an
//! API conformance suite that every adapter runs through. Use it as a
//! dev-dependency from integration tests:
//!
//! ```toml
//! [dev-dependencies]
//! endb-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use endb_test::api_suite;
//!
//! #[tokio::test]
//! async fn test_memory_conforms() {
//!     api_suite::run(&endb::Endb::memory()).await;
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod api_suite;
pub mod harness;
pub mod recording;

pub use harness::*;
pub use recording::*;
