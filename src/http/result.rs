//! Fetch outcome classification

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::Serialize;

/// Outcome of one fetch.
///
/// Produced once per request and consumed immediately; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchResult {
    /// 2xx response with a JSON body
    Success { status_code: u16, body: JsonValue },
    /// Response outside the 2xx range
    HttpError { status_code: u16, raw_body: String },
    /// No response at all (DNS, connect, TLS, timeout)
    TransportError { message: String },
    /// 2xx response whose body is not JSON
    ParseError { status_code: u16, raw_body: String },
}

impl FetchResult {
    /// Classify a fully buffered response
    pub fn classify(status_code: u16, raw_body: String) -> Self {
        if !(200..300).contains(&status_code) {
            return FetchResult::HttpError {
                status_code,
                raw_body,
            };
        }

        match serde_json::from_str(&raw_body) {
            Ok(body) => FetchResult::Success { status_code, body },
            Err(_) => FetchResult::ParseError {
                status_code,
                raw_body,
            },
        }
    }

    /// Build a transport failure
    pub fn transport(message: impl Into<String>) -> Self {
        FetchResult::TransportError {
            message: message.into(),
        }
    }

    /// Whether the fetch produced a usable JSON body
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    /// Response status, if a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchResult::Success { status_code, .. }
            | FetchResult::HttpError { status_code, .. }
            | FetchResult::ParseError { status_code, .. } => Some(*status_code),
            FetchResult::TransportError { .. } => None,
        }
    }

    /// Short human-readable summary
    pub fn message(&self) -> String {
        match self {
            FetchResult::Success { .. } => "API request successful".to_string(),
            FetchResult::HttpError { status_code, .. } => format!("HTTP Error: {status_code}"),
            FetchResult::TransportError { message } => message.clone(),
            FetchResult::ParseError { .. } => "Invalid JSON response".to_string(),
        }
    }

    /// Take the parsed body, turning any failure into an [`Error`]
    pub fn into_body(self) -> Result<JsonValue> {
        match self {
            FetchResult::Success { body, .. } => Ok(body),
            FetchResult::HttpError {
                status_code,
                raw_body,
            } => Err(Error::http_status(status_code, raw_body)),
            FetchResult::TransportError { message } => Err(Error::Transport { message }),
            FetchResult::ParseError { raw_body, .. } => Err(Error::decode(format!(
                "Invalid JSON response: {}",
                truncate(&raw_body, 200)
            ))),
        }
    }
}

fn truncate(raw: &str, max_chars: usize) -> String {
    match raw.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &raw[..idx]),
        None => raw.to_string(),
    }
}
