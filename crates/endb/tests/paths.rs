//! Nested path operations through the facade.

use endb::{Endb, StoreError, Value};

#[tokio::test]
async fn test_set_path_on_scalar_replaces_it_with_a_map() {
    let db = Endb::memory();
    db.set("profile", "plain").await.unwrap();
    db.set_path("profile", "name", "Ada").await.unwrap();

    let expected: Value = [("name", Value::from("Ada"))].into_iter().collect();
    assert_eq!(db.get("profile").await.unwrap(), Some(expected));
}

#[tokio::test]
async fn test_bracket_paths_address_arrays() {
    let db = Endb::memory();
    db.set("list", Value::from(vec![Value::from("a"), Value::from("b")]))
        .await
        .unwrap();

    assert_eq!(db.get_path("list", "[1]").await.unwrap(), Some(Value::from("b")));
    db.set_path("list", "[2]", "c").await.unwrap();
    assert_eq!(db.get_path("list", "[2]").await.unwrap(), Some(Value::from("c")));

    let err = db.set_path("list", "[9]", "z").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidPath { .. }));

    assert!(db.delete_path("list", "[0]").await.unwrap());
    assert_eq!(db.get_path("list", "[0]").await.unwrap(), Some(Value::Null));
    assert_eq!(db.get_path("list", "[1]").await.unwrap(), Some(Value::from("b")));
    assert!(!db.delete_path("list", "[3]").await.unwrap());
}

#[tokio::test]
async fn test_mixed_paths_and_null_leaves() {
    let db = Endb::memory();
    db.set_path("doc", "users[0].name", "Ada").await.unwrap();
    db.set_path("doc", "users[0][\"nick.name\"]", Value::Null)
        .await
        .unwrap();

    assert_eq!(
        db.get_path("doc", "users[0].name").await.unwrap(),
        Some(Value::from("Ada"))
    );
    assert!(db.has_path("doc", "users[0][\"nick.name\"]").await.unwrap());
    assert_eq!(
        db.get_path("doc", "users[0][\"nick.name\"]").await.unwrap(),
        Some(Value::Null)
    );
    assert!(!db.has_path("doc", "users[1]").await.unwrap());
}

#[tokio::test]
async fn test_get_path_on_missing_key_is_none() {
    let db = Endb::memory();
    assert_eq!(db.get_path("nothing", "a.b").await.unwrap(), None);
    assert!(!db.has_path("nothing", "a.b").await.unwrap());
}
