//! Auth types
//!
//! Discriminators, field descriptors, and the request value that auth
//! strategies decorate.

use crate::types::{JsonValue, Method, StringMap};
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Authentication scheme selected by a source's `auth_type` string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// No authentication
    #[default]
    None,
    /// HTTP Basic
    Basic,
    /// OAuth 1.0a
    #[serde(rename = "oauth1")]
    OAuth1,
    /// OAuth 2 bearer token
    #[serde(rename = "oauth2")]
    OAuth2,
    /// API key in a header or the query string
    ApiKey,
    /// TradeMe's PLAINTEXT OAuth 1 variant
    #[serde(rename = "trademe")]
    TradeMe,
}

impl AuthType {
    /// Every scheme, in the order a settings form lists them
    pub const ALL: [AuthType; 6] = [
        AuthType::None,
        AuthType::Basic,
        AuthType::OAuth1,
        AuthType::OAuth2,
        AuthType::ApiKey,
        AuthType::TradeMe,
    ];

    /// Resolve a stored discriminator. Unknown values select `None`.
    pub fn from_discriminator(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "basic" => AuthType::Basic,
            "oauth1" => AuthType::OAuth1,
            "oauth2" => AuthType::OAuth2,
            "api_key" => AuthType::ApiKey,
            "trademe" => AuthType::TradeMe,
            _ => AuthType::None,
        }
    }

    /// The discriminator string stored in configuration
    pub fn as_str(self) -> &'static str {
        match self {
            AuthType::None => "none",
            AuthType::Basic => "basic",
            AuthType::OAuth1 => "oauth1",
            AuthType::OAuth2 => "oauth2",
            AuthType::ApiKey => "api_key",
            AuthType::TradeMe => "trademe",
        }
    }
}

/// Kind of form input an auth field is rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Password,
    Url,
    Select,
}

/// One option of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Stored value
    pub value: String,
    /// Human-readable label
    pub label: String,
}

/// Descriptor of one credential field, used to drive dynamic forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthField {
    /// Key under which the value is stored in `auth_data`
    pub key: String,
    /// Human-readable label
    pub label: String,
    /// Input kind
    pub input_kind: InputKind,
    /// Options, only for select inputs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

impl AuthField {
    pub(crate) fn text(key: &str, label: &str) -> Self {
        Self::new(key, label, InputKind::Text)
    }

    pub(crate) fn password(key: &str, label: &str) -> Self {
        Self::new(key, label, InputKind::Password)
    }

    pub(crate) fn url(key: &str, label: &str) -> Self {
        Self::new(key, label, InputKind::Url)
    }

    pub(crate) fn select(key: &str, label: &str, options: &[(&str, &str)]) -> Self {
        let mut field = Self::new(key, label, InputKind::Select);
        field.options = options
            .iter()
            .map(|(value, label)| SelectOption {
                value: (*value).to_string(),
                label: (*label).to_string(),
            })
            .collect();
        field
    }

    fn new(key: &str, label: &str, input_kind: InputKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            input_kind,
            options: Vec::new(),
        }
    }
}

/// Location for API key placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Place in HTTP header
    #[default]
    Header,
    /// Place in query parameter
    Query,
}

/// OAuth 1 signature method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureMethod {
    #[default]
    HmacSha1,
    RsaSha1,
    Plaintext,
}

impl SignatureMethod {
    /// Parse the configured method name. Empty selects HMAC-SHA1.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "" | "HMAC-SHA1" => Some(SignatureMethod::HmacSha1),
            "RSA-SHA1" => Some(SignatureMethod::RsaSha1),
            "PLAINTEXT" => Some(SignatureMethod::Plaintext),
            _ => None,
        }
    }

    /// Wire name for `oauth_signature_method`
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureMethod::HmacSha1 => "HMAC-SHA1",
            SignatureMethod::RsaSha1 => "RSA-SHA1",
            SignatureMethod::Plaintext => "PLAINTEXT",
        }
    }
}

/// TradeMe authentication mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradeMeMode {
    /// Signed with the consumer secret only
    #[default]
    Application,
    /// Signed with consumer and member token secrets
    Member,
}

/// The parts of an outgoing request an auth strategy may rewrite
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    /// Absolute request URL
    pub url: String,
    /// HTTP method
    pub method: Method,
    /// Request headers
    pub headers: StringMap,
    /// Request body (an object, possibly empty)
    pub body: JsonValue,
}

impl PreparedRequest {
    /// Create a request with no headers and an empty object body
    pub fn new(url: impl Into<String>, method: Method) -> Self {
        Self {
            url: url.into(),
            method,
            headers: StringMap::new(),
            body: JsonValue::Object(serde_json::Map::new()),
        }
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the body
    #[must_use]
    pub fn body(mut self, body: JsonValue) -> Self {
        self.body = body;
        self
    }
}

/// Per-request OAuth 1 values that are not derived from credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthParams {
    /// Unix timestamp in seconds
    pub timestamp: i64,
    /// Random nonce
    pub nonce: String,
}

impl OAuthParams {
    /// Create fixed params
    pub fn new(timestamp: i64, nonce: impl Into<String>) -> Self {
        Self {
            timestamp,
            nonce: nonce.into(),
        }
    }

    /// Draw the current time and a fresh 12-character alphanumeric nonce
    pub fn generate() -> Self {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();
        Self {
            timestamp: Utc::now().timestamp(),
            nonce,
        }
    }
}
