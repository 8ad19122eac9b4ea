//! Adapter resolution.
//!
//! Picks a backend from [`EndbOptions`]: an explicit `adapter` name wins,
//! otherwise the URI scheme decides. Neither means the in-memory adapter.

use std::fmt;
use std::sync::Arc;

use endb_config::EndbOptions;
use endb_core::{Adapter, FaultBus, Namespace, StoreError, StoreResult};
use tracing::debug;

/// The built-in backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    /// `MongoDB`.
    Mongo,
    /// `MySQL` / `MariaDB`.
    MySql,
    /// `PostgreSQL`.
    Postgres,
    /// Redis.
    Redis,
    /// `SQLite`.
    Sqlite,
}

/// Accepted adapter names and URI schemes.
static REGISTRY: [(&str, AdapterKind); 7] = [
    ("mongo", AdapterKind::Mongo),
    ("mongodb", AdapterKind::Mongo),
    ("mysql", AdapterKind::MySql),
    ("postgres", AdapterKind::Postgres),
    ("postgresql", AdapterKind::Postgres),
    ("redis", AdapterKind::Redis),
    ("sqlite", AdapterKind::Sqlite),
];

impl AdapterKind {
    /// Canonical adapter name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mongo => "mongo",
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Redis => "redis",
            Self::Sqlite => "sqlite",
        }
    }

    /// Cargo feature that compiles this adapter in.
    #[must_use]
    pub fn feature(self) -> &'static str {
        self.name()
    }

    /// Whether this adapter was compiled into the crate.
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            Self::Mongo => cfg!(feature = "mongo"),
            Self::MySql => cfg!(feature = "mysql"),
            Self::Postgres => cfg!(feature = "postgres"),
            Self::Redis => cfg!(feature = "redis"),
            Self::Sqlite => cfg!(feature = "sqlite"),
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up an adapter name or URI scheme.
#[must_use]
pub fn lookup(name: &str) -> Option<AdapterKind> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, kind)| *kind)
}

/// The scheme of `uri`: everything before the first `:`.
///
/// # Errors
///
/// Returns [`StoreError::Config`] naming the URI when it has no `:` or the
/// scheme is empty.
pub fn scheme_of(uri: &str) -> StoreResult<&str> {
    match uri.split_once(':') {
        Some((scheme, _)) if !scheme.is_empty() => Ok(scheme),
        _ => Err(StoreError::Config(format!(
            "could not infer adapter from URI \"{uri}\""
        ))),
    }
}

/// Decide which adapter `options` ask for; `None` means in-memory.
///
/// # Errors
///
/// Returns [`StoreError::Config`] for a URI without a scheme or an unknown
/// adapter name.
pub fn resolve(options: &EndbOptions) -> StoreResult<Option<AdapterKind>> {
    let name = match (&options.adapter, &options.uri) {
        (Some(adapter), _) => adapter.as_str(),
        (None, Some(uri)) => scheme_of(uri)?,
        (None, None) => return Ok(None),
    };
    lookup(name)
        .map(Some)
        .ok_or_else(|| StoreError::Config(format!("invalid adapter \"{name}\"")))
}

/// Construct the adapter for `kind`.
///
/// Without a configured URI each adapter uses its own default.
///
/// # Errors
///
/// Returns [`StoreError::Config`] if the adapter's feature is not compiled
/// in, or if the adapter cannot parse its URI.
#[allow(unused_variables)]
pub fn build(
    kind: AdapterKind,
    options: &EndbOptions,
    namespace: Namespace,
    faults: &FaultBus,
) -> StoreResult<Arc<dyn Adapter>> {
    let uri = |default: &'static str| options.uri.as_deref().unwrap_or(default);
    debug!(adapter = kind.name(), namespace = %namespace, "Building adapter");

    match kind {
        #[cfg(feature = "sqlite")]
        AdapterKind::Sqlite => {
            let mut connector = endb_sql::SqliteConnector::new(uri(endb_sql::SQLITE.default_uri))?;
            if let Some(millis) = options.busy_timeout_ms {
                connector = connector.with_busy_timeout(std::time::Duration::from_millis(millis));
            }
            Ok(sql_adapter(Arc::new(connector), options, namespace, faults))
        },
        #[cfg(feature = "mysql")]
        AdapterKind::MySql => {
            let connector = endb_sql::MySqlConnector::new(uri(endb_sql::MYSQL.default_uri))?;
            Ok(sql_adapter(Arc::new(connector), options, namespace, faults))
        },
        #[cfg(feature = "postgres")]
        AdapterKind::Postgres => {
            let connector = endb_sql::PostgresConnector::new(uri(endb_sql::POSTGRES.default_uri))?;
            Ok(sql_adapter(Arc::new(connector), options, namespace, faults))
        },
        #[cfg(feature = "redis")]
        AdapterKind::Redis => {
            let adapter = endb_redis::RedisAdapter::new(namespace, uri(endb_redis::DEFAULT_URI))?
                .with_faults(faults.clone());
            Ok(Arc::new(adapter))
        },
        #[cfg(feature = "mongo")]
        AdapterKind::Mongo => {
            let adapter = endb_mongo::MongoAdapter::new(
                namespace,
                uri(endb_mongo::DEFAULT_URI),
                options.collection.clone(),
            )?
            .with_faults(faults.clone());
            Ok(Arc::new(adapter))
        },
        #[allow(unreachable_patterns)]
        missing => Err(StoreError::Config(format!(
            "adapter \"{missing}\" requires the \"{}\" feature of endb",
            missing.feature()
        ))),
    }
}

#[cfg(any(feature = "sqlite", feature = "mysql", feature = "postgres"))]
fn sql_adapter(
    connector: Arc<dyn endb_sql::SqlConnector>,
    options: &EndbOptions,
    namespace: Namespace,
    faults: &FaultBus,
) -> Arc<dyn Adapter> {
    let sql_options = endb_sql::SqlOptions::default()
        .with_table(options.table.clone())
        .with_key_size(options.key_size);
    Arc::new(endb_sql::SqlAdapter::new(connector, namespace, sql_options).with_faults(faults.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_aliases() {
        assert_eq!(lookup("mongo"), Some(AdapterKind::Mongo));
        assert_eq!(lookup("mongodb"), Some(AdapterKind::Mongo));
        assert_eq!(lookup("postgresql"), Some(AdapterKind::Postgres));
        assert_eq!(lookup("sqlite"), Some(AdapterKind::Sqlite));
        assert_eq!(lookup("SQLite"), None);
        assert_eq!(lookup("oracle"), None);
    }

    #[test]
    fn test_scheme_of() {
        assert_eq!(scheme_of("redis://localhost:6379").unwrap(), "redis");
        assert_eq!(scheme_of("sqlite::memory:").unwrap(), "sqlite");
        assert!(matches!(scheme_of("localhost"), Err(StoreError::Config(_))));
        assert!(matches!(scheme_of("://host"), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_explicit_adapter_wins_over_scheme() {
        let options = EndbOptions::from_uri("redis://localhost").with_adapter("sqlite");
        assert_eq!(resolve(&options).unwrap(), Some(AdapterKind::Sqlite));
    }

    #[test]
    fn test_nothing_configured_is_memory() {
        assert_eq!(resolve(&EndbOptions::default()).unwrap(), None);
    }

    #[test]
    fn test_unknown_adapter_is_named_in_error() {
        let err = resolve(&EndbOptions::from_uri("oracle://db")).unwrap_err();
        assert_eq!(err, StoreError::Config("invalid adapter \"oracle\"".to_owned()));

        let err = resolve(&EndbOptions::from_uri("no-scheme")).unwrap_err();
        assert!(err.to_string().contains("no-scheme"));
    }

    #[test]
    fn test_default_uris_resolve_to_their_own_kind() {
        for dialect in endb_sql::DIALECTS {
            let kind = scheme_of(dialect.default_uri).ok().and_then(lookup);
            assert_eq!(kind.map(AdapterKind::name), Some(dialect.name));
        }
    }

    #[cfg(feature = "redis")]
    #[test]
    fn test_redis_default_uri_resolves_to_redis() {
        assert_eq!(
            scheme_of(endb_redis::DEFAULT_URI).ok().and_then(lookup),
            Some(AdapterKind::Redis)
        );
    }

    #[cfg(feature = "mongo")]
    #[test]
    fn test_mongo_default_uri_resolves_to_mongo() {
        assert_eq!(
            scheme_of(endb_mongo::DEFAULT_URI).ok().and_then(lookup),
            Some(AdapterKind::Mongo)
        );
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_build_sqlite_applies_table_options() {
        let options = EndbOptions::default().with_table("cache");
        let adapter = build(
            AdapterKind::Sqlite,
            &options,
            Namespace::default(),
            &FaultBus::new(),
        )
        .unwrap();
        assert_eq!(adapter.name(), "sqlite");
        assert!(adapter.faults().is_some());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_build_rejects_malformed_sqlite_uri() {
        let options = EndbOptions::default()
            .with_adapter("sqlite")
            .with_uri("sqlite://endb.sqlite?bogus=1");
        let err = build(
            AdapterKind::Sqlite,
            &options,
            Namespace::default(),
            &FaultBus::new(),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Config(ref msg) if msg.contains("bogus")));
    }

    #[test]
    fn test_missing_feature_is_config_error() {
        for (_, kind) in &REGISTRY {
            if kind.is_available() {
                continue;
            }
            let err = build(*kind, &EndbOptions::default(), Namespace::default(), &FaultBus::new())
                .unwrap_err();
            assert!(err.to_string().contains(kind.feature()));
        }
    }
}
