//! Item to target-record mapping

use super::types::{DirectField, MappingTable, TargetRecord};
use crate::error::{Error, Result};
use crate::extract::extract_value;
use crate::types::{json_to_plain_string, JsonValue};
use tracing::debug;

/// Message recorded for items whose title resolves to nothing
pub const MISSING_TITLE: &str = "Missing post title";

/// Whether a resolved title counts as unset.
///
/// Stricter than a plain falsy check in one direction and looser in the
/// other: `0` and `"0"` are real titles, whitespace-only strings are not.
pub fn is_empty_title(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null | JsonValue::Bool(false) => true,
        JsonValue::String(s) => s.trim().is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Build the target record for one item.
///
/// Every mapping entry is resolved; direct fields and meta fields are split
/// by target name. Fails with [`MISSING_TITLE`] when the title is unset.
pub fn build_record(mapping: &MappingTable, item: &JsonValue) -> Result<TargetRecord> {
    let mut record = TargetRecord::default();

    for (target, source_path) in mapping.iter() {
        let value = extract_value(item, source_path);
        debug!(target, source_path, resolved = !value.is_null(), "mapping field");

        if DirectField::from_name(target).is_some() {
            record.direct_fields.insert(target.to_string(), value);
        } else {
            record.meta_fields.insert(target.to_string(), value);
        }
    }

    let title = record
        .direct(DirectField::Title)
        .filter(|t| !is_empty_title(t))
        .ok_or_else(|| Error::mapping(MISSING_TITLE))?;
    record.lookup_key = json_to_plain_string(title);

    Ok(record)
}
