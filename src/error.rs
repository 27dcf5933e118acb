//! Error types for postsync
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Outcomes of a fetch (HTTP status errors, transport failures, unparsable
//! bodies) are normally carried as [`crate::http::FetchResult`] values; the
//! variants below cover configuration problems, the rate-limit gate, store
//! failures, and conversions from a `FetchResult` when a caller wants `?`.

use thiserror::Error;

/// The main error type for postsync
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Rate limited, retry after {seconds_remaining}s")]
    RateLimited { seconds_remaining: u64 },

    // ============================================================================
    // Mapping Errors
    // ============================================================================
    #[error("{message}")]
    Mapping { message: String },

    // ============================================================================
    // Store Errors
    // ============================================================================
    #[error("Store error: {message}")]
    Store { message: String },

    #[error("State error: {message}")]
    State { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a per-item mapping error
    pub fn mapping(message: impl Into<String>) -> Self {
        Self::Mapping {
            message: message.into(),
        }
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Whether this error belongs to the configuration class.
    ///
    /// Configuration errors fail fast: nothing is fetched and nothing is
    /// written when one is raised.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::MissingConfigField { .. }
                | Error::InvalidConfigValue { .. }
                | Error::YamlParse(_)
                | Error::JsonParse(_)
                | Error::InvalidUrl(_)
                | Error::Auth { .. }
        )
    }

    /// Whether the cycle was only deferred rather than failed
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::RateLimited { .. })
    }
}

/// Result type alias for postsync
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("consumer_key");
        assert_eq!(
            err.to_string(),
            "Missing required config field: consumer_key"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::RateLimited {
            seconds_remaining: 7,
        };
        assert_eq!(err.to_string(), "Rate limited, retry after 7s");
    }

    #[test]
    fn test_error_classes() {
        assert!(Error::config("x").is_config_error());
        assert!(Error::missing_field("url").is_config_error());
        assert!(Error::auth("bad").is_config_error());
        assert!(Error::invalid_value("method", "nope").is_config_error());

        assert!(!Error::http_status(500, "").is_config_error());
        assert!(!Error::store("disk full").is_config_error());

        assert!(Error::RateLimited {
            seconds_remaining: 1
        }
        .is_rate_limited());
        assert!(!Error::decode("junk").is_rate_limited());
    }

    #[test]
    fn test_parse_errors_are_config_errors() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.is_config_error());
        assert!(err.to_string().starts_with("Failed to parse JSON"));

        let err: Error = serde_yaml::from_str::<serde_yaml::Value>("a: [")
            .unwrap_err()
            .into();
        assert!(err.is_config_error());
        assert!(err.to_string().starts_with("Failed to parse YAML"));
    }
}
