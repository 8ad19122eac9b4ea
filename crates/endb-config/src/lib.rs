#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Connection descriptor for Endb.
//!
//! [`EndbOptions`] says which backend to use and how to shape its storage.
//! It is plain data: it can be built in code, parsed from TOML, or filled in
//! from `ENDB_*` environment variables.
//!
//! # Usage
//!
//! ```rust
//! use endb_config::EndbOptions;
//!
//! let options = EndbOptions::from_uri("sqlite://:memory:").with_namespace("cache");
//! assert_eq!(options.namespace, "cache");
//! assert_eq!(options.table, "endb");
//! ```
//!
//! # Precedence
//!
//! From highest to lowest priority:
//!
//! 1. Values set in code or in the loaded TOML file
//! 2. Environment variables (`ENDB_URI`, `ENDB_ADAPTER`, `ENDB_NAMESPACE`), fallback only
//! 3. Built-in defaults
//!
//! # Design
//!
//! This crate has **no dependencies on other internal endb crates**. Codec
//! and pre-built store selection are not data and live on the facade's
//! builder instead.

/// Configuration error types.
pub mod error;
/// TOML and environment loading.
pub mod loader;
/// Option struct definitions.
pub mod types;
/// Validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::*;

impl EndbOptions {
    /// Parse options from a TOML document and validate them.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document is malformed or fails
    /// validation.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        loader::from_toml_str(source, "<inline>")
    }

    /// Load options from a TOML file and validate them.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }

    /// Fill unset fields from the process environment.
    #[must_use]
    pub fn with_env_fallbacks(mut self) -> Self {
        let vars = loader::collect_env_vars();
        loader::apply_env_fallbacks(&mut self, &vars);
        self
    }

    /// Check the options against the validation rules.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::ValidationError`] found.
    pub fn validate(&self) -> ConfigResult<()> {
        validate::validate(self)
    }
}
