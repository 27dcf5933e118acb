//! Tests for path extraction

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

#[test]
fn test_collection_at_nested_path() {
    let doc = json!({"result": {"items": [{"t": "X"}, {"t": "Y"}]}});
    let items = extract_collection(&doc, "result.items");
    assert_eq!(items, vec![json!({"t": "X"}), json!({"t": "Y"})]);
}

#[test]
fn test_collection_empty_path_root_array() {
    let doc = json!([1, 2, 3]);
    assert_eq!(extract_collection(&doc, ""), vec![json!(1), json!(2), json!(3)]);
}

#[test]
fn test_collection_empty_path_root_object_wrapped() {
    let doc = json!({"id": 7});
    assert_eq!(extract_collection(&doc, ""), vec![json!({"id": 7})]);
}

#[test_case(json!({"a": {"b": []}}), "a.c" ; "missing key")]
#[test_case(json!({"a": null}), "a" ; "null at end")]
#[test_case(json!({"a": null}), "a.b" ; "null in the middle")]
#[test_case(json!({"a": "text"}), "a.b" ; "walk into scalar")]
#[test_case(json!({"a": [1]}), "a.5" ; "index out of range")]
#[test_case(json!({"a": [1]}), "a.x" ; "non numeric index")]
fn test_collection_miss_is_empty(doc: JsonValue, path: &str) {
    assert!(extract_collection(&doc, path).is_empty());
}

#[test]
fn test_collection_scalar_is_wrapped() {
    let doc = json!({"data": {"item": {"id": 1}}});
    assert_eq!(extract_collection(&doc, "data.item"), vec![json!({"id": 1})]);
}

#[test]
fn test_collection_array_index_segment() {
    let doc = json!({"pages": [{"rows": [1, 2]}, {"rows": [3]}]});
    assert_eq!(extract_collection(&doc, "pages.1.rows"), vec![json!(3)]);
}

#[test]
fn test_collection_numeric_object_key() {
    let doc = json!({"0": {"rows": ["a"]}});
    assert_eq!(extract_collection(&doc, "0.rows"), vec![json!("a")]);
}

#[test]
fn test_collection_is_deterministic() {
    let doc = json!({"a": {"b": [{"x": 1}, {"x": 2}]}});
    assert_eq!(extract_collection(&doc, "a.b"), extract_collection(&doc, "a.b"));
}

#[test_case("title", json!("Hello") ; "top level")]
#[test_case("meta.author.name", json!("Ann") ; "nested")]
#[test_case("tags.1", json!("b") ; "array index")]
#[test_case("meta", json!({"author": {"name": "Ann"}}) ; "structured value")]
#[test_case("missing", json!(null) ; "missing key")]
#[test_case("title.deeper", json!(null) ; "walk past scalar")]
#[test_case("tags.9", json!(null) ; "index out of range")]
fn test_extract_value(path: &str, expected: JsonValue) {
    let item = json!({
        "title": "Hello",
        "tags": ["a", "b"],
        "meta": {"author": {"name": "Ann"}}
    });
    assert_eq!(extract_value(&item, path), expected);
}

#[test]
fn test_extract_value_keeps_falsy_values() {
    let item = json!({"count": 0, "flag": false, "name": ""});
    assert_eq!(extract_value(&item, "count"), json!(0));
    assert_eq!(extract_value(&item, "flag"), json!(false));
    assert_eq!(extract_value(&item, "name"), json!(""));
}
