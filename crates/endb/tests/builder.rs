//! Builder options: custom codecs and pre-built stores.

use std::sync::Arc;

use endb::{
    Adapter, Codec, Endb, EndbOptions, JsonCodec, MemoryAdapter, Namespace, StoreError,
    StoreResult, Value,
};

/// Wraps JSON output in a version marker.
#[derive(Debug)]
struct VersionedCodec;

impl Codec for VersionedCodec {
    fn encode(&self, value: &Value) -> StoreResult<String> {
        Ok(format!("v1|{}", JsonCodec::new().encode(value)?))
    }

    fn decode(&self, data: &str) -> StoreResult<Value> {
        let body = data
            .strip_prefix("v1|")
            .ok_or_else(|| StoreError::Serialization("missing version marker".to_owned()))?;
        JsonCodec::new().decode(body)
    }
}

#[tokio::test]
async fn test_custom_codec_controls_stored_form() {
    let store = Arc::new(MemoryAdapter::new(Namespace::default()));
    let db = Endb::builder()
        .codec(VersionedCodec)
        .store(store.clone())
        .build()
        .unwrap();

    db.set("foo", "bar").await.unwrap();
    assert_eq!(
        store.get("endb:foo").await.unwrap().as_deref(),
        Some("v1|\"bar\"")
    );
    assert_eq!(db.get("foo").await.unwrap(), Some(Value::from("bar")));
}

#[tokio::test]
async fn test_corrupt_stored_value_is_serialization_error() {
    let store = Arc::new(MemoryAdapter::new(Namespace::default()));
    store.set("endb:foo", "not json".to_owned()).await.unwrap();

    let db = Endb::builder().store(store).build().unwrap();
    assert!(matches!(
        db.get("foo").await,
        Err(StoreError::Serialization(_))
    ));
}

#[tokio::test]
async fn test_clones_share_the_store() {
    let db = Endb::new(EndbOptions::default().with_namespace("shared")).unwrap();
    let clone = db.clone();
    db.set("k", 1).await.unwrap();
    assert_eq!(clone.get("k").await.unwrap(), Some(Value::from(1)));
}

#[test]
fn test_builder_validates_options() {
    let err = Endb::builder()
        .options(EndbOptions::default().with_table(""))
        .build()
        .unwrap_err();
    assert!(matches!(err, StoreError::Config(ref msg) if msg.contains("table")));
}

#[test]
fn test_uri_on_builder_resolves_adapter() {
    let err = Endb::builder().uri("nope://x").build().unwrap_err();
    assert!(matches!(err, StoreError::Config(ref msg) if msg.contains("nope")));
}
