//! `SqlAdapter` over real `SQLite` databases.

#![cfg(feature = "sqlite")]

use std::sync::Arc;
use std::time::Duration;

use endb_core::{Adapter, Element, Namespace};
use endb_sql::{SqlAdapter, SqlOptions, SqliteConnector};
use endb_test::{sqlite_uri, test_dir};

fn sqlite(uri: &str, namespace: &str, options: SqlOptions) -> SqlAdapter {
    let connector = SqliteConnector::new(uri)
        .unwrap()
        .with_busy_timeout(Duration::from_secs(5));
    SqlAdapter::new(Arc::new(connector), Namespace::new(namespace).unwrap(), options)
}

#[tokio::test]
async fn test_in_memory_crud() {
    let store = sqlite("sqlite://:memory:", "endb", SqlOptions::default());

    assert_eq!(store.get("endb:foo").await.unwrap(), None);
    store.set("endb:foo", "\"bar\"".into()).await.unwrap();
    store.set("endb:foo", "\"baz\"".into()).await.unwrap();
    assert_eq!(store.get("endb:foo").await.unwrap().as_deref(), Some("\"baz\""));
    assert!(store.has("endb:foo").await.unwrap());
    assert_eq!(
        store.all().await.unwrap(),
        vec![Element::new("endb:foo", "\"baz\"".to_owned())]
    );
    assert!(store.delete("endb:foo").await.unwrap());
    assert!(!store.delete("endb:foo").await.unwrap());
}

#[tokio::test]
async fn test_file_database_shared_between_namespaces() {
    let dir = test_dir();
    let uri = sqlite_uri(dir.path(), "shared.sqlite");
    let a = sqlite(&uri, "a", SqlOptions::default());
    let b = sqlite(&uri, "b", SqlOptions::default());

    a.set("a:k", "1".into()).await.unwrap();
    b.set("b:k", "2".into()).await.unwrap();

    assert_eq!(a.get("a:k").await.unwrap().as_deref(), Some("1"));
    assert_eq!(b.get("b:k").await.unwrap().as_deref(), Some("2"));
    assert_eq!(a.all().await.unwrap().len(), 1);

    a.clear().await.unwrap();
    assert!(a.all().await.unwrap().is_empty());
    assert_eq!(b.get("b:k").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn test_data_survives_reopening_the_file() {
    let dir = test_dir();
    let uri = sqlite_uri(dir.path(), "persist.sqlite");

    sqlite(&uri, "endb", SqlOptions::default())
        .set("endb:foo", "42".into())
        .await
        .unwrap();

    let reopened = sqlite(&uri, "endb", SqlOptions::default());
    assert_eq!(reopened.get("endb:foo").await.unwrap().as_deref(), Some("42"));
}

#[tokio::test]
async fn test_custom_table_name_with_quote() {
    let options = SqlOptions::default().with_table("my \"kv\"");
    let store = sqlite("sqlite://:memory:", "endb", options);
    store.set("endb:foo", "1".into()).await.unwrap();
    assert_eq!(store.get("endb:foo").await.unwrap().as_deref(), Some("1"));
}

#[tokio::test]
async fn test_like_wildcards_in_namespace_are_literal() {
    let dir = test_dir();
    let uri = sqlite_uri(dir.path(), "wild.sqlite");
    let underscore = sqlite(&uri, "a_", SqlOptions::default());
    let letter = sqlite(&uri, "ab", SqlOptions::default());

    underscore.set("a_:x", "1".into()).await.unwrap();
    letter.set("ab:y", "2".into()).await.unwrap();

    underscore.clear().await.unwrap();
    assert_eq!(letter.get("ab:y").await.unwrap().as_deref(), Some("2"));
    assert!(underscore.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_first_use_on_file_database() {
    let dir = test_dir();
    let uri = sqlite_uri(dir.path(), "race.sqlite");
    let store = sqlite(&uri, "endb", SqlOptions::default());

    let (a, b, c) = tokio::join!(
        store.set("endb:a", "1".into()),
        store.set("endb:b", "2".into()),
        store.set("endb:c", "3".into()),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();
    assert_eq!(store.all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_namespaces_differing_in_case_stay_apart() {
    let dir = test_dir();
    let uri = sqlite_uri(dir.path(), "case.sqlite");
    let upper = sqlite(&uri, "Cache", SqlOptions::default());
    let lower = sqlite(&uri, "cache", SqlOptions::default());

    upper.set("Cache:k", "1".into()).await.unwrap();
    lower.set("cache:k", "2".into()).await.unwrap();

    upper.clear().await.unwrap();
    assert_eq!(lower.get("cache:k").await.unwrap().as_deref(), Some("2"));
    assert_eq!(lower.all().await.unwrap().len(), 1);
}
