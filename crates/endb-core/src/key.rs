//! Namespaces and the logical-to-physical key mapping.
//!
//! A physical key is `"{namespace}:{key}"`. Namespaces may not contain the
//! separator, so the mapping is injective: every physical key has exactly one
//! `(namespace, key)` origin, and two namespaces sharing a backend never see
//! each other's keys.

use std::fmt;

use crate::error::{StoreError, StoreResult};

/// Separator between the namespace and the logical key.
pub const SEPARATOR: char = ':';

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "endb";

/// A validated namespace bound to an adapter for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    name: String,
    prefix: String,
}

impl Namespace {
    /// Validate and create a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] if the namespace is empty or
    /// contains the separator.
    pub fn new(name: impl Into<String>) -> StoreResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(StoreError::InvalidKey(
                "namespace must not be empty".into(),
            ));
        }
        if name.contains(SEPARATOR) {
            return Err(StoreError::InvalidKey(format!(
                "namespace `{name}` must not contain `{SEPARATOR}`"
            )));
        }
        let mut prefix = String::with_capacity(name.len().saturating_add(1));
        prefix.push_str(&name);
        prefix.push(SEPARATOR);
        Ok(Self { name, prefix })
    }

    /// The namespace name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The prefix shared by every physical key in this namespace (`"ns:"`).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Map a logical key to its physical key.
    #[must_use]
    pub fn encode(&self, key: &str) -> String {
        let mut physical = String::with_capacity(self.prefix.len().saturating_add(key.len()));
        physical.push_str(&self.prefix);
        physical.push_str(key);
        physical
    }

    /// Recover the logical key, or `None` if the key belongs elsewhere.
    #[must_use]
    pub fn decode<'a>(&self, physical: &'a str) -> Option<&'a str> {
        physical.strip_prefix(self.prefix.as_str())
    }

    /// Whether a physical key belongs to this namespace.
    #[must_use]
    pub fn owns(&self, physical: &str) -> bool {
        physical.starts_with(self.prefix.as_str())
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAMESPACE.to_owned(),
            prefix: format!("{DEFAULT_NAMESPACE}{SEPARATOR}"),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Validate a logical key.
///
/// Keys must be non-empty. Any other content, including the separator, is
/// allowed because only the namespace side of the mapping needs to be
/// separator-free.
///
/// # Errors
///
/// Returns [`StoreError::InvalidKey`] for an empty key.
pub fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("key must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let ns = Namespace::new("endb").unwrap();
        assert_eq!(ns.encode("foo"), "endb:foo");
        assert_eq!(ns.decode("endb:foo"), Some("foo"));
        assert_eq!(ns.prefix(), "endb:");
    }

    #[test]
    fn test_default_matches_validated_namespace() {
        assert_eq!(Namespace::default(), Namespace::new(DEFAULT_NAMESPACE).unwrap());
    }

    #[test]
    fn test_decode_only_strips_leading_prefix() {
        let ns = Namespace::new("a").unwrap();
        assert_eq!(ns.decode("a:b:a:c"), Some("b:a:c"));
        assert_eq!(ns.decode("b:a:c"), None);
        assert_eq!(ns.decode("ab:c"), None);
    }

    #[test]
    fn test_keys_may_contain_separator() {
        let ns = Namespace::new("users").unwrap();
        let physical = ns.encode("eu:42");
        assert_eq!(ns.decode(&physical), Some("eu:42"));
    }

    #[test]
    fn test_namespaces_do_not_overlap() {
        let a = Namespace::new("a").unwrap();
        let ab = Namespace::new("ab").unwrap();
        assert!(!a.owns(&ab.encode("x")));
        assert!(!ab.owns(&a.encode("bx")));
    }

    #[test]
    fn test_rejects_invalid_namespace() {
        assert!(Namespace::new("").is_err());
        assert!(Namespace::new("a:b").is_err());
    }

    #[test]
    fn test_rejects_empty_key() {
        assert!(validate_key("").is_err());
        assert!(validate_key("k").is_ok());
    }
}
