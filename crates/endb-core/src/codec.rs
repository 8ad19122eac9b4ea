//! Serialization codecs.
//!
//! A [`Codec`] turns a [`Value`] into the string a backend stores and back.
//! The default [`JsonCodec`] writes JSON text with a tagged form for binary
//! payloads:
//!
//! ```text
//! Value::Bytes([0xde, 0xad])      ──►  {"$bytes":"3q0="}
//! {"$ref": 1, "plain": 2}         ──►  {"$$ref":1,"plain":2}
//! ```
//!
//! Map keys starting with `$` are escaped with one extra `$`, so the only
//! unescaped `$`-key that can appear in encoded output is the binary tag.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::{StoreError, StoreResult};
use crate::value::Value;

/// Tag key marking a base64 binary payload.
const BYTES_TAG: &str = "$bytes";

/// Escape prefix for user keys.
const ESCAPE: char = '$';

/// Converts values to and from their stored representation.
///
/// `decode(encode(v))` must equal `v` for every value the codec accepts.
pub trait Codec: Send + Sync + std::fmt::Debug {
    /// Encode a value for storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the value cannot be encoded.
    fn encode(&self, value: &Value) -> StoreResult<String>;

    /// Decode a stored representation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the stored data is corrupted.
    fn decode(&self, data: &str) -> StoreResult<Value>;
}

/// JSON codec with tagged binary payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create the default codec.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> StoreResult<String> {
        serde_json::to_string(&to_wire(value))
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn decode(&self, data: &str) -> StoreResult<Value> {
        let wire: serde_json::Value =
            serde_json::from_str(data).map_err(|e| StoreError::Serialization(e.to_string()))?;
        from_wire(wire)
    }
}

fn to_wire(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Value::Number(n.clone()),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(bytes) => {
            let mut tagged = serde_json::Map::with_capacity(1);
            tagged.insert(
                BYTES_TAG.to_owned(),
                serde_json::Value::String(STANDARD.encode(bytes)),
            );
            serde_json::Value::Object(tagged)
        },
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_wire).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (escape_key(k), to_wire(v)))
                .collect(),
        ),
    }
}

fn from_wire(wire: serde_json::Value) -> StoreResult<Value> {
    Ok(match wire {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(n),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(from_wire)
                .collect::<StoreResult<Vec<_>>>()?,
        ),
        serde_json::Value::Object(map) => {
            if map.len() == 1
                && let Some(serde_json::Value::String(encoded)) = map.get(BYTES_TAG)
            {
                let bytes = STANDARD
                    .decode(encoded)
                    .map_err(|e| StoreError::Serialization(format!("invalid binary tag: {e}")))?;
                return Ok(Value::Bytes(bytes));
            }
            let mut out = BTreeMap::new();
            for (key, value) in map {
                out.insert(unescape_key(key)?, from_wire(value)?);
            }
            Value::Map(out)
        },
    })
}

fn escape_key(key: &str) -> String {
    if key.starts_with(ESCAPE) {
        let mut escaped = String::with_capacity(key.len().saturating_add(1));
        escaped.push(ESCAPE);
        escaped.push_str(key);
        escaped
    } else {
        key.to_owned()
    }
}

fn unescape_key(key: String) -> StoreResult<String> {
    match key.strip_prefix(ESCAPE) {
        None => Ok(key),
        Some(rest) if rest.starts_with(ESCAPE) => Ok(rest.to_owned()),
        Some(_) => Err(StoreError::Serialization(format!(
            "unexpected reserved key `{key}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_trip(value: &Value) -> Value {
        let codec = JsonCodec::new();
        let encoded = codec.encode(value).unwrap();
        codec.decode(&encoded).unwrap()
    }

    #[test]
    fn test_round_trip_scalars_and_containers() {
        let value = Value::from(json!({
            "id": 1_234_567_890,
            "username": "user",
            "verified": true,
            "nil": null,
            "ratio": 0.1,
            "todo": ["Add a authentication system.", "Refactor the generator"],
        }));
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_round_trip_binary() {
        let value: Value = [
            ("raw", Value::bytes(vec![0_u8, 159, 146, 150, 255])),
            ("empty", Value::bytes(Vec::new())),
        ]
        .into_iter()
        .collect();
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_binary_wire_form() {
        let encoded = JsonCodec::new()
            .encode(&Value::bytes(vec![0xde, 0xad]))
            .unwrap();
        assert_eq!(encoded, r#"{"$bytes":"3q0="}"#);
    }

    #[test]
    fn test_user_map_shaped_like_tag_is_not_binary() {
        let value: Value = [("$bytes", Value::from("3q0="))].into_iter().collect();
        let encoded = JsonCodec::new().encode(&value).unwrap();
        assert_eq!(encoded, r#"{"$$bytes":"3q0="}"#);
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_dollar_keys_round_trip() {
        let value: Value = [
            ("$", Value::from(1)),
            ("$$double", Value::from(2)),
            ("plain", Value::from(3)),
        ]
        .into_iter()
        .collect();
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_float_precision_survives() {
        let value = Value::from(0.300_000_000_000_000_04_f64);
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_decode_rejects_corruption() {
        let codec = JsonCodec::new();
        assert!(matches!(
            codec.decode("{not json"),
            Err(StoreError::Serialization(_))
        ));
        assert!(codec.decode(r#"{"$bytes":"***"}"#).is_err());
        assert!(codec.decode(r#"{"$bytes":"AA==","extra":1}"#).is_err());
    }
}
