//! Validation rules for [`EndbOptions`].
//!
//! Adapter names and URI schemes are not checked here; resolving them is the
//! facade's job.

use crate::error::{ConfigError, ConfigResult};
use crate::types::EndbOptions;

/// Largest key size any supported engine accepts for `VARCHAR(n)`.
pub const MAX_KEY_SIZE: usize = 65_535;

/// Separator the facade places between namespace and key.
const NAMESPACE_SEPARATOR: char = ':';

/// Validate options.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(options: &EndbOptions) -> ConfigResult<()> {
    validate_namespace(options)?;
    validate_names(options)?;
    validate_key_size(options)?;
    Ok(())
}

fn validate_namespace(options: &EndbOptions) -> ConfigResult<()> {
    if options.namespace.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "namespace".to_owned(),
            message: "namespace must not be empty".to_owned(),
        });
    }
    if options.namespace.contains(NAMESPACE_SEPARATOR) {
        return Err(ConfigError::ValidationError {
            field: "namespace".to_owned(),
            message: format!(
                "namespace '{}' must not contain '{NAMESPACE_SEPARATOR}'",
                options.namespace
            ),
        });
    }
    Ok(())
}

fn validate_names(options: &EndbOptions) -> ConfigResult<()> {
    if options.table.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "table".to_owned(),
            message: "table name must not be empty".to_owned(),
        });
    }
    if options.collection.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "collection".to_owned(),
            message: "collection name must not be empty".to_owned(),
        });
    }
    if let Some(adapter) = &options.adapter
        && adapter.trim().is_empty()
    {
        return Err(ConfigError::ValidationError {
            field: "adapter".to_owned(),
            message: "adapter must not be empty when set".to_owned(),
        });
    }
    Ok(())
}

fn validate_key_size(options: &EndbOptions) -> ConfigResult<()> {
    if options.key_size == 0 || options.key_size > MAX_KEY_SIZE {
        return Err(ConfigError::ValidationError {
            field: "key_size".to_owned(),
            message: format!("key_size must be between 1 and {MAX_KEY_SIZE}"),
        });
    }
    Ok(())
}
