use thiserror::Error;

/// Errors that can occur while loading or validating options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path that could not be read.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A config file contained invalid TOML.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path (or label) of the source that failed to parse.
        path: String,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },

    /// A field holds an unacceptable value.
    #[error("invalid value for {field}: {message}")]
    ValidationError {
        /// Dotted field name.
        field: String,
        /// Human-readable explanation.
        message: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
