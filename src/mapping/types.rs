//! Mapping and upsert types

use crate::error::{Error, Result};
use crate::store::RecordId;
use crate::types::{JsonObject, JsonValue};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Mapping Table
// ============================================================================

/// Ordered target-field to source-path correspondence.
///
/// Keys are unique; a duplicate key is rejected when the table is built or
/// deserialized. Deserializes from a map or from a string holding a JSON
/// object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<(String, String)>,
}

impl MappingTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from pairs, rejecting duplicate target fields
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (target, source) in pairs {
            table
                .insert(target.into(), source.into())
                .map_err(|e| Error::invalid_value("mapping", e))?;
        }
        Ok(table)
    }

    fn insert(&mut self, target: String, source: String) -> std::result::Result<(), String> {
        if self.entries.iter().any(|(k, _)| *k == target) {
            return Err(format!("duplicate mapping key: {target}"));
        }
        self.entries.push((target, source));
        Ok(())
    }

    /// Iterate `(target_field, source_path)` in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Source path mapped to a target field
    pub fn get(&self, target: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == target)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a title mapping is present
    pub fn has_title(&self) -> bool {
        self.get(DirectField::Title.as_str()).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MappingTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct MappingTableVisitor;

impl<'de> Visitor<'de> for MappingTableVisitor {
    type Value = MappingTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of target field to source path, or a JSON object string")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<MappingTable, A::Error> {
        let mut table = MappingTable::new();
        while let Some((target, source)) = access.next_entry::<String, String>()? {
            table.insert(target, source).map_err(de::Error::custom)?;
        }
        Ok(table)
    }

    fn visit_str<E: de::Error>(self, raw: &str) -> std::result::Result<MappingTable, E> {
        if raw.trim().is_empty() {
            return Ok(MappingTable::new());
        }
        let mut de = serde_json::Deserializer::from_str(raw);
        (&mut de)
            .deserialize_map(MappingTableVisitor)
            .and_then(|table| de.end().map(|()| table))
            .map_err(|e| E::custom(format!("invalid mapping JSON: {e}")))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<MappingTable, E> {
        Ok(MappingTable::new())
    }
}

impl<'de> Deserialize<'de> for MappingTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(MappingTableVisitor)
    }
}

// ============================================================================
// Target Record
// ============================================================================

/// Fields the content store models natively; everything else is meta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectField {
    Title,
    Content,
    Excerpt,
    Date,
    Author,
}

impl DirectField {
    pub const ALL: [DirectField; 5] = [
        DirectField::Title,
        DirectField::Content,
        DirectField::Excerpt,
        DirectField::Date,
        DirectField::Author,
    ];

    /// Field name as used in mapping tables
    pub fn as_str(self) -> &'static str {
        match self {
            DirectField::Title => "post_title",
            DirectField::Content => "post_content",
            DirectField::Excerpt => "post_excerpt",
            DirectField::Date => "post_date",
            DirectField::Author => "post_author",
        }
    }

    /// Recognize a direct field by its mapping name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

/// One mapped item, ready for the content store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    /// Title used for the create-or-update lookup
    pub lookup_key: String,
    /// Natively modelled fields keyed by their mapping name
    pub direct_fields: JsonObject,
    /// Everything else
    pub meta_fields: JsonObject,
}

impl TargetRecord {
    /// Value of a direct field, if mapped
    pub fn direct(&self, field: DirectField) -> Option<&JsonValue> {
        self.direct_fields.get(field.as_str())
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Terminal state of one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Created(RecordId),
    Updated(RecordId),
    Skipped(String),
}

/// A per-item failure; never aborts the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    /// Position of the item in its collection
    pub item_index: usize,
    pub message: String,
}

/// Counts and per-item errors for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertReport {
    pub created: usize,
    pub updated: usize,
    pub errors: Vec<ItemError>,
}

impl UpsertReport {
    /// Fold one item's outcome into the report
    pub fn record(&mut self, item_index: usize, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Created(_) => self.created += 1,
            ItemOutcome::Updated(_) => self.updated += 1,
            ItemOutcome::Skipped(message) => self.errors.push(ItemError {
                item_index,
                message: message.clone(),
            }),
        }
    }

    /// Items written to the store
    pub fn processed(&self) -> usize {
        self.created + self.updated
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
