//! Determinism tests for canonical JSON encoding

use palisade_canonical::{canonical_bytes, canonical_string, CanonicalError};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

#[test]
fn insertion_order_does_not_matter() {
    let mut forward = Map::new();
    forward.insert("alpha".into(), json!(1));
    forward.insert("mike".into(), json!([1, 2]));
    forward.insert("zulu".into(), json!({"k": "v"}));

    let mut reverse = Map::new();
    reverse.insert("zulu".into(), json!({"k": "v"}));
    reverse.insert("mike".into(), json!([1, 2]));
    reverse.insert("alpha".into(), json!(1));

    assert_eq!(
        canonical_bytes(&Value::Object(forward)).unwrap(),
        canonical_bytes(&Value::Object(reverse)).unwrap()
    );
}

#[test]
fn no_insignificant_whitespace() {
    let value = json!({"a": [1, 2, 3], "b": {"c": null, "d": false}});
    let text = canonical_string(&value).unwrap();
    assert!(!text.contains(' '));
    assert!(!text.contains('\n'));
    assert_eq!(text, r#"{"a":[1,2,3],"b":{"c":null,"d":false}}"#);
}

#[test]
fn matches_python_json_dumps_compact_sorted() {
    // The peer side canonicalizes with sorted keys and "," ":" separators;
    // both implementations must produce these exact bytes.
    let value = json!({
        "root": "abc123",
        "anchor": {"txid": "demo-0011", "chain": "dev-null"},
        "ts": "2026-08-24T00:00:00Z",
    });
    assert_eq!(
        canonical_string(&value).unwrap(),
        r#"{"anchor":{"chain":"dev-null","txid":"demo-0011"},"root":"abc123","ts":"2026-08-24T00:00:00Z"}"#
    );
}

#[test]
fn unicode_keys_sort_by_utf8_bytes() {
    let value = json!({"é": 1, "z": 2, "a": 3});
    // "é" encodes as 0xC3 0xA9, after ASCII 'z'
    assert_eq!(canonical_string(&value).unwrap(), r#"{"a":3,"z":2,"é":1}"#);
}

#[test]
fn floats_are_a_caller_error() {
    let value = json!({"temperature": 36.6});
    assert_eq!(
        canonical_bytes(&value).unwrap_err(),
        CanonicalError::FloatNotAllowed
    );
    // ... but the same quantity as a string is fine
    let value = json!({"temperature": "36.6"});
    assert!(canonical_bytes(&value).is_ok());
}
