//! Source configuration types
//!
//! A source is one polled endpoint plus everything needed to turn its
//! response into records. Loading is tolerant: malformed optional values
//! fall back to defaults instead of failing the whole file.

use crate::http::DEFAULT_WAIT_SECONDS;
use crate::mapping::MappingTable;
use crate::types::{json_to_plain_string, JsonValue, Method, StringMap};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Requests per day assumed when the configured value is unusable
pub const DEFAULT_REQUESTS_PER_DAY: u64 = 1000;

// ============================================================================
// Sources File
// ============================================================================

/// Top-level layout of a sources file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesFile {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

// ============================================================================
// Source Config
// ============================================================================

/// One configured API source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SourceConfig {
    /// Unique source identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Endpoint URL
    pub url: String,
    #[serde(default, deserialize_with = "lenient::method")]
    pub method: Method,
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub headers: StringMap,
    /// Request body; sent as query parameters on GET
    #[serde(default = "empty_object", deserialize_with = "lenient::object")]
    pub body: JsonValue,
    /// Auth discriminator (`none`, `basic`, `oauth1`, `oauth2`, `api_key`, `trademe`)
    #[serde(default = "default_auth_type")]
    pub auth_type: String,
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub auth_data: StringMap,
    /// Dot path to the item collection; empty selects the root
    #[serde(default)]
    pub object_path: String,
    #[serde(default)]
    pub mapping: MappingTable,
    /// Collection records are written to
    #[serde(alias = "post_type")]
    pub target_collection: String,
    /// Minimum seconds between two fetches
    #[serde(
        default = "default_wait_seconds",
        deserialize_with = "lenient::wait_seconds"
    )]
    pub rate_limit_wait_seconds: u64,
    /// Daily request budget; drives the polling interval
    #[serde(
        default = "default_requests_per_day",
        deserialize_with = "lenient::requests_per_day"
    )]
    pub requests_per_day: u64,
}

impl SourceConfig {
    /// Create a source with default request settings
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        target_collection: impl Into<String>,
        mapping: MappingTable,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            url: url.into(),
            method: Method::GET,
            headers: StringMap::new(),
            body: empty_object(),
            auth_type: default_auth_type(),
            auth_data: StringMap::new(),
            object_path: String::new(),
            mapping,
            target_collection: target_collection.into(),
            rate_limit_wait_seconds: DEFAULT_WAIT_SECONDS,
            requests_per_day: DEFAULT_REQUESTS_PER_DAY,
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = body;
        self
    }

    /// Set the auth scheme and its credentials
    #[must_use]
    pub fn with_auth(mut self, auth_type: impl Into<String>, auth_data: StringMap) -> Self {
        self.auth_type = auth_type.into();
        self.auth_data = auth_data;
        self
    }

    #[must_use]
    pub fn with_object_path(mut self, path: impl Into<String>) -> Self {
        self.object_path = path.into();
        self
    }

    #[must_use]
    pub fn with_rate_limit(mut self, wait_seconds: u64, requests_per_day: u64) -> Self {
        self.rate_limit_wait_seconds = if wait_seconds == 0 {
            DEFAULT_WAIT_SECONDS
        } else {
            wait_seconds
        };
        self.requests_per_day = if requests_per_day == 0 {
            DEFAULT_REQUESTS_PER_DAY
        } else {
            requests_per_day
        };
        self
    }

    /// Display name, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Minimum spacing between fetches
    pub fn min_wait(&self) -> Duration {
        Duration::from_secs(self.rate_limit_wait_seconds)
    }
}

fn empty_object() -> JsonValue {
    JsonValue::Object(serde_json::Map::new())
}

fn default_auth_type() -> String {
    "none".to_string()
}

fn default_wait_seconds() -> u64 {
    DEFAULT_WAIT_SECONDS
}

fn default_requests_per_day() -> u64 {
    DEFAULT_REQUESTS_PER_DAY
}

/// Tolerant field deserializers.
///
/// Each reads whatever the document holds as a JSON value and interprets
/// it, so YAML and JSON inputs behave the same.
mod lenient {
    use super::*;

    /// Parse a value that may itself be JSON text
    fn unwrap_json_text(value: JsonValue) -> Option<JsonValue> {
        match value {
            JsonValue::String(raw) if raw.trim().is_empty() => None,
            JsonValue::String(raw) => serde_json::from_str(&raw).ok(),
            JsonValue::Null => None,
            other => Some(other),
        }
    }

    pub(super) fn method<'de, D: Deserializer<'de>>(d: D) -> Result<Method, D::Error> {
        let value = JsonValue::deserialize(d)?;
        Ok(value
            .as_str()
            .map(Method::parse_lenient)
            .unwrap_or_default())
    }

    pub(super) fn string_map<'de, D: Deserializer<'de>>(d: D) -> Result<StringMap, D::Error> {
        let value = JsonValue::deserialize(d)?;
        Ok(match unwrap_json_text(value) {
            Some(JsonValue::Object(map)) => map
                .into_iter()
                .map(|(k, v)| (k, json_to_plain_string(&v)))
                .collect(),
            _ => StringMap::new(),
        })
    }

    pub(super) fn object<'de, D: Deserializer<'de>>(d: D) -> Result<JsonValue, D::Error> {
        let value = JsonValue::deserialize(d)?;
        Ok(match unwrap_json_text(value) {
            Some(obj @ JsonValue::Object(_)) => obj,
            _ => empty_object(),
        })
    }

    fn positive(value: &JsonValue) -> Option<u64> {
        match value {
            JsonValue::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f as u64)),
            JsonValue::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        }
        .filter(|n| *n > 0)
    }

    pub(super) fn wait_seconds<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let value = JsonValue::deserialize(d)?;
        Ok(positive(&value).unwrap_or(DEFAULT_WAIT_SECONDS))
    }

    pub(super) fn requests_per_day<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let value = JsonValue::deserialize(d)?;
        Ok(positive(&value).unwrap_or(DEFAULT_REQUESTS_PER_DAY))
    }
}
