//! Dot-path extraction over JSON documents
//!
//! Two walks share one segment resolver:
//! - [`extract_collection`] locates the list of items inside a response
//! - [`extract_value`] pulls one field out of a single item
//!
//! Segments are separated by `.`. A segment that parses as an integer
//! indexes into an array; otherwise it is an object key. Misses are never
//! errors: a collection walk yields no items and a value walk yields `null`.

use crate::types::JsonValue;

/// Resolve one path segment against the current value
fn step<'a>(current: &'a JsonValue, segment: &str) -> Option<&'a JsonValue> {
    match current {
        JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        JsonValue::Object(map) => map.get(segment),
        _ => None,
    }
}

/// Walk every segment, stopping at the first miss or `null`
fn walk<'a>(root: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut current = root;
    for segment in path.split('.') {
        current = step(current, segment)?;
        if current.is_null() {
            return None;
        }
    }
    Some(current)
}

/// Find the item collection at `path`.
///
/// An empty path selects the root. Whatever is found is returned as a list:
/// arrays as-is, any other value wrapped in a single-element list.
pub fn extract_collection(doc: &JsonValue, path: &str) -> Vec<JsonValue> {
    let found = if path.is_empty() {
        Some(doc)
    } else {
        walk(doc, path)
    };

    match found {
        Some(JsonValue::Array(items)) => items.clone(),
        Some(value) => vec![value.clone()],
        None => Vec::new(),
    }
}

/// Resolve `path` within one item, `null` on any miss
pub fn extract_value(item: &JsonValue, path: &str) -> JsonValue {
    walk(item, path).cloned().unwrap_or(JsonValue::Null)
}

#[cfg(test)]
mod tests;
