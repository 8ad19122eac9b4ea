//! Loading options from TOML and the environment.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::types::{DEFAULT_NAMESPACE, EndbOptions};
use crate::validate;

/// Environment variable supplying a fallback URI.
pub const ENV_URI: &str = "ENDB_URI";
/// Environment variable supplying a fallback adapter.
pub const ENV_ADAPTER: &str = "ENDB_ADAPTER";
/// Environment variable supplying a fallback namespace.
pub const ENV_NAMESPACE: &str = "ENDB_NAMESPACE";

/// Parse and validate a TOML document. `label` names the source in errors.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] for malformed TOML and
/// [`ConfigError::ValidationError`] for rejected values.
pub fn from_toml_str(source: &str, label: &str) -> ConfigResult<EndbOptions> {
    let options: EndbOptions = toml::from_str(source).map_err(|e| ConfigError::ParseError {
        path: label.to_owned(),
        source: e,
    })?;
    validate::validate(&options)?;
    Ok(options)
}

/// Read, parse and validate a TOML file.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file cannot be read, otherwise
/// as [`from_toml_str`].
pub fn load_file(path: &Path) -> ConfigResult<EndbOptions> {
    let source = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let options = from_toml_str(&source, &path.display().to_string())?;
    info!(path = %path.display(), "loaded endb config");
    Ok(options)
}

/// Snapshot the `ENDB_*` variables from the process environment.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("ENDB_"))
        .collect()
}

/// Fill unset fields from `vars`.
///
/// `uri` and `adapter` are filled only when `None`; `namespace` only when
/// it still holds the default.
pub fn apply_env_fallbacks(options: &mut EndbOptions, vars: &HashMap<String, String>) {
    if options.uri.is_none()
        && let Some(uri) = vars.get(ENV_URI)
    {
        debug!(var = ENV_URI, "using environment fallback");
        options.uri = Some(uri.clone());
    }
    if options.adapter.is_none()
        && let Some(adapter) = vars.get(ENV_ADAPTER)
    {
        debug!(var = ENV_ADAPTER, "using environment fallback");
        options.adapter = Some(adapter.clone());
    }
    if options.namespace == DEFAULT_NAMESPACE
        && let Some(namespace) = vars.get(ENV_NAMESPACE)
    {
        debug!(var = ENV_NAMESPACE, "using environment fallback");
        options.namespace.clone_from(namespace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        let options = from_toml_str("", "<test>").unwrap();
        assert_eq!(options, EndbOptions::default());
    }

    #[test]
    fn test_parse_full_document() {
        let options = from_toml_str(
            r#"
            uri = "postgresql://localhost:5432/app"
            namespace = "sessions"
            table = "kv"
            key_size = 128
            "#,
            "<test>",
        )
        .unwrap();
        assert_eq!(
            options.uri.as_deref(),
            Some("postgresql://localhost:5432/app")
        );
        assert_eq!(options.namespace, "sessions");
        assert_eq!(options.table, "kv");
        assert_eq!(options.key_size, 128);
        assert_eq!(options.collection, "endb");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = from_toml_str("tabel = \"typo\"", "<test>").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let err = from_toml_str("namespace = \"a:b\"", "<test>").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "adapter = \"sqlite\"\nbusy_timeout_ms = 250").unwrap();
        let options = load_file(file.path()).unwrap();
        assert_eq!(options.adapter.as_deref(), Some("sqlite"));
        assert_eq!(options.busy_timeout_ms, Some(250));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_env_fallbacks_fill_only_unset_fields() {
        let vars: HashMap<String, String> = [
            (ENV_URI, "redis://cache:6379"),
            (ENV_ADAPTER, "redis"),
            (ENV_NAMESPACE, "from-env"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        let mut unset = EndbOptions::default();
        apply_env_fallbacks(&mut unset, &vars);
        assert_eq!(unset.uri.as_deref(), Some("redis://cache:6379"));
        assert_eq!(unset.adapter.as_deref(), Some("redis"));
        assert_eq!(unset.namespace, "from-env");

        let mut explicit = EndbOptions::from_uri("sqlite://:memory:").with_namespace("mine");
        apply_env_fallbacks(&mut explicit, &vars);
        assert_eq!(explicit.uri.as_deref(), Some("sqlite://:memory:"));
        assert_eq!(explicit.namespace, "mine");
    }
}
