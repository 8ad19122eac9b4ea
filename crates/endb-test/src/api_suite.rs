//! API conformance suite.
//!
//! Every adapter must pass [`run`]. Each case starts and ends with
//! [`Endb::clear`], so the store must be dedicated to the suite's namespace.
//!
//! # Panics
//!
//! Every function panics on the first failed expectation.

use endb::{Element, Endb, Value};
use serde::{Deserialize, Serialize};

/// Run every case against `db`.
pub async fn run(db: &Endb) {
    macro_rules! cases {
        ($($case:ident),* $(,)?) => {
            $(
                reset(db).await;
                $case(db).await;
                reset(db).await;
            )*
        };
    }

    cases![
        all_contains_every_element,
        clear_is_repeatable,
        delete_existing_returns_true,
        delete_missing_returns_false,
        delete_path_removes_property,
        find_returns_matching_value,
        find_without_match_returns_none,
        get_returns_value,
        get_missing_returns_none,
        get_path_returns_property,
        has_existing_returns_true,
        has_missing_returns_false,
        has_path_checks_property,
        set_returns_true,
        set_overwrites_value,
        set_path_builds_nested_maps,
        typed_values_round_trip,
        bytes_round_trip,
        keys_values_entries_agree,
    ];
}

async fn reset(db: &Endb) {
    db.clear().await.expect("clear failed");
}

/// `all` lists a stored element under its logical key.
pub async fn all_contains_every_element(db: &Endb) {
    db.set("foo", "bar").await.expect("set failed");
    let all = db.all().await.expect("all failed");
    assert!(all.contains(&Element::new("foo", Value::from("bar"))));
}

/// `clear` succeeds on an empty and a populated namespace.
pub async fn clear_is_repeatable(db: &Endb) {
    db.clear().await.expect("clear on empty store failed");
    db.set("foo", "bar").await.expect("set failed");
    db.clear().await.expect("clear failed");
    assert!(db.all().await.expect("all failed").is_empty());
}

/// Deleting a stored key reports `true`.
pub async fn delete_existing_returns_true(db: &Endb) {
    db.set("foo", "bar").await.expect("set failed");
    assert!(db.delete("foo").await.expect("delete failed"));
    assert!(!db.has("foo").await.expect("has failed"));
}

/// Deleting a missing key reports `false`.
pub async fn delete_missing_returns_false(db: &Endb) {
    assert!(!db.delete("foo").await.expect("delete failed"));
}

/// `delete_path` removes a nested property.
pub async fn delete_path_removes_property(db: &Endb) {
    db.set_path("foo", "fizz.buzz", "bar").await.expect("set_path failed");
    assert!(db.delete_path("foo", "fizz.buzz").await.expect("delete_path failed"));
    assert!(!db.has_path("foo", "fizz.buzz").await.expect("has_path failed"));
    assert!(db.has_path("foo", "fizz").await.expect("has_path failed"));
}

/// `find` returns the first matching value.
pub async fn find_returns_matching_value(db: &Endb) {
    db.set("foo", "bar").await.expect("set failed");
    let found = db
        .find(|value, _| value.as_str() == Some("bar"))
        .await
        .expect("find failed");
    assert_eq!(found, Some(Value::from("bar")));
}

/// `find` without a match returns `None`.
pub async fn find_without_match_returns_none(db: &Endb) {
    let found = db
        .find(|value, _| value.as_str() == Some("bar"))
        .await
        .expect("find failed");
    assert_eq!(found, None);
}

/// `get` returns what `set` stored.
pub async fn get_returns_value(db: &Endb) {
    db.set("foo", "bar").await.expect("set failed");
    assert_eq!(db.get("foo").await.expect("get failed"), Some(Value::from("bar")));
}

/// `get` on a missing key returns `None`.
pub async fn get_missing_returns_none(db: &Endb) {
    assert_eq!(db.get("foo").await.expect("get failed"), None);
}

/// `get_path` returns a nested property.
pub async fn get_path_returns_property(db: &Endb) {
    db.set_path("foo", "fizz.buzz", "bar").await.expect("set_path failed");
    assert_eq!(
        db.get_path("foo", "fizz.buzz").await.expect("get_path failed"),
        Some(Value::from("bar"))
    );
    assert_eq!(db.get_path("foo", "fizz.nope").await.expect("get_path failed"), None);
}

/// `has` on a stored key is `true`.
pub async fn has_existing_returns_true(db: &Endb) {
    db.set("foo", "bar").await.expect("set failed");
    assert!(db.has("foo").await.expect("has failed"));
}

/// `has` on a missing key is `false`.
pub async fn has_missing_returns_false(db: &Endb) {
    assert!(!db.has("foo").await.expect("has failed"));
}

/// `has_path` reports whether a nested property exists.
pub async fn has_path_checks_property(db: &Endb) {
    db.set_path("foo", "fizz.buzz", "bar").await.expect("set_path failed");
    assert!(db.has_path("foo", "fizz.buzz").await.expect("has_path failed"));
    assert!(!db.has_path("foo", "fizz.bar").await.expect("has_path failed"));
    assert!(!db.has_path("missing", "fizz").await.expect("has_path failed"));
}

/// `set` reports `true`.
pub async fn set_returns_true(db: &Endb) {
    assert!(db.set("foo", "bar").await.expect("set failed"));
}

/// A second `set` replaces the first value.
pub async fn set_overwrites_value(db: &Endb) {
    db.set("foo", "bar").await.expect("set failed");
    db.set("foo", 42).await.expect("set failed");
    assert_eq!(db.get("foo").await.expect("get failed"), Some(Value::from(42)));
}

/// `set_path` on a missing key creates the nested maps.
pub async fn set_path_builds_nested_maps(db: &Endb) {
    db.set_path("foo", "fizz.buzz", "bar").await.expect("set_path failed");
    let expected: Value = [(
        "fizz",
        [("buzz", Value::from("bar"))].into_iter().collect::<Value>(),
    )]
    .into_iter()
    .collect();
    assert_eq!(db.get("foo").await.expect("get failed"), Some(expected));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    verified: bool,
    score: f64,
    tags: Vec<String>,
    nickname: Option<String>,
}

/// Serde types survive `set_as` / `get_as`.
pub async fn typed_values_round_trip(db: &Endb) {
    let profile = Profile {
        name: "Ada".to_owned(),
        verified: true,
        score: 0.25,
        tags: vec!["admin".to_owned(), "$root".to_owned()],
        nickname: None,
    };
    db.set_as("profile", &profile).await.expect("set_as failed");
    let loaded: Option<Profile> = db.get_as("profile").await.expect("get_as failed");
    assert_eq!(loaded, Some(profile));
}

/// Byte strings survive a round trip, including inside containers.
pub async fn bytes_round_trip(db: &Endb) {
    let value: Value = [
        ("raw", Value::bytes(vec![0_u8, 159, 146, 150, 255])),
        ("list", Value::from(vec![Value::bytes(b"hi".to_vec())])),
    ]
    .into_iter()
    .collect();
    db.set("blob", value.clone()).await.expect("set failed");
    assert_eq!(db.get("blob").await.expect("get failed"), Some(value));
}

/// `keys`, `values` and `entries` describe the same elements.
pub async fn keys_values_entries_agree(db: &Endb) {
    db.set("a", 1).await.expect("set failed");
    db.set("b", 2).await.expect("set failed");

    let mut keys = db.keys().await.expect("keys failed");
    keys.sort();
    assert_eq!(keys, vec!["a".to_owned(), "b".to_owned()]);

    let mut values: Vec<i64> = db
        .values()
        .await
        .expect("values failed")
        .iter()
        .filter_map(Value::as_i64)
        .collect();
    values.sort_unstable();
    assert_eq!(values, vec![1, 2]);

    let mut entries = db.entries().await.expect("entries failed");
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        entries,
        vec![("a".to_owned(), Value::from(1)), ("b".to_owned(), Value::from(2))]
    );
}
