//! Auth strategy implementation
//!
//! Each variant decorates an outgoing [`PreparedRequest`] for one scheme.
//! Decoration is pure: no I/O, and the request is taken by value so the
//! caller's header map is never modified in place.

use super::oauth1;
use super::types::{
    AuthField, AuthType, Location, OAuthParams, PreparedRequest, SignatureMethod, TradeMeMode,
};
use crate::error::{Error, Result};
use crate::types::StringMap;
use base64::Engine as _;
use std::fmt;
use url::Url;

/// Authentication strategy resolved from a source's `auth_type` and `auth_data`
#[derive(Clone, Default)]
pub enum AuthStrategy {
    /// No authentication required
    #[default]
    None,

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// OAuth 1.0a with a configurable signature method
    OAuth1 {
        consumer_key: String,
        consumer_secret: String,
        token: String,
        token_secret: String,
        signature_method: SignatureMethod,
    },

    /// OAuth 2 bearer token. Refreshing is the caller's job.
    OAuth2 {
        /// The access token
        access_token: String,
    },

    /// API key authentication (header or query)
    ApiKey {
        /// Where to place the API key
        location: Location,
        /// Header or query parameter name
        name: String,
        /// The API key value
        value: String,
    },

    /// TradeMe PLAINTEXT OAuth, always over HTTPS
    TradeMe {
        consumer_key: String,
        consumer_secret: String,
        token: String,
        token_secret: String,
        mode: TradeMeMode,
    },
}

impl AuthStrategy {
    /// Build a strategy from a stored discriminator and credential map.
    ///
    /// Unknown discriminators select [`AuthStrategy::None`]. Missing
    /// required credentials are configuration errors.
    pub fn from_config(auth_type: &str, auth_data: &StringMap) -> Result<Self> {
        Self::from_type(AuthType::from_discriminator(auth_type), auth_data)
    }

    /// Build a strategy for an already-resolved [`AuthType`]
    pub fn from_type(auth_type: AuthType, auth_data: &StringMap) -> Result<Self> {
        let strategy = match auth_type {
            AuthType::None => AuthStrategy::None,

            AuthType::Basic => AuthStrategy::Basic {
                username: required(auth_data, "username")?,
                password: optional(auth_data, "password"),
            },

            AuthType::OAuth1 => {
                let raw_method = optional(auth_data, "signature_method");
                let signature_method = SignatureMethod::parse(&raw_method).ok_or_else(|| {
                    Error::invalid_value(
                        "signature_method",
                        format!("unknown OAuth signature method '{raw_method}'"),
                    )
                })?;
                AuthStrategy::OAuth1 {
                    consumer_key: required(auth_data, "consumer_key")?,
                    consumer_secret: required(auth_data, "consumer_secret")?,
                    token: optional(auth_data, "token"),
                    token_secret: optional(auth_data, "token_secret"),
                    signature_method,
                }
            }

            AuthType::OAuth2 => AuthStrategy::OAuth2 {
                access_token: required(auth_data, "access_token")?,
            },

            AuthType::ApiKey => AuthStrategy::ApiKey {
                location: if optional(auth_data, "api_key_location").eq_ignore_ascii_case("query")
                {
                    Location::Query
                } else {
                    Location::Header
                },
                name: required(auth_data, "api_key_name")?,
                value: required(auth_data, "api_key")?,
            },

            AuthType::TradeMe => AuthStrategy::TradeMe {
                consumer_key: required(auth_data, "consumer_key")?,
                consumer_secret: required(auth_data, "consumer_secret")?,
                token: optional(auth_data, "token"),
                token_secret: optional(auth_data, "token_secret"),
                mode: if optional(auth_data, "auth_type").eq_ignore_ascii_case("member") {
                    TradeMeMode::Member
                } else {
                    TradeMeMode::Application
                },
            },
        };

        Ok(strategy)
    }

    /// The scheme this strategy implements
    pub fn auth_type(&self) -> AuthType {
        match self {
            AuthStrategy::None => AuthType::None,
            AuthStrategy::Basic { .. } => AuthType::Basic,
            AuthStrategy::OAuth1 { .. } => AuthType::OAuth1,
            AuthStrategy::OAuth2 { .. } => AuthType::OAuth2,
            AuthStrategy::ApiKey { .. } => AuthType::ApiKey,
            AuthStrategy::TradeMe { .. } => AuthType::TradeMe,
        }
    }

    /// Field descriptors for this strategy's scheme
    pub fn fields(&self) -> Vec<AuthField> {
        auth_fields(self.auth_type())
    }

    /// Decorate a request, drawing a fresh OAuth nonce and timestamp
    pub fn prepare_request(&self, request: PreparedRequest) -> Result<PreparedRequest> {
        self.prepare_request_with(request, &OAuthParams::generate())
    }

    /// Decorate a request with caller-supplied OAuth nonce and timestamp.
    ///
    /// Deterministic for identical inputs.
    pub fn prepare_request_with(
        &self,
        request: PreparedRequest,
        oauth: &OAuthParams,
    ) -> Result<PreparedRequest> {
        let PreparedRequest {
            mut url,
            method,
            mut headers,
            body,
        } = request;

        match self {
            AuthStrategy::None => {}

            AuthStrategy::Basic { username, password } => {
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{username}:{password}"));
                headers.insert("Authorization".to_string(), format!("Basic {credentials}"));
            }

            AuthStrategy::OAuth1 {
                consumer_key,
                consumer_secret,
                token,
                token_secret,
                signature_method,
            } => {
                let mut params = vec![
                    ("oauth_consumer_key".to_string(), consumer_key.clone()),
                    ("oauth_token".to_string(), token.clone()),
                    (
                        "oauth_signature_method".to_string(),
                        signature_method.as_str().to_string(),
                    ),
                    ("oauth_timestamp".to_string(), oauth.timestamp.to_string()),
                    ("oauth_nonce".to_string(), oauth.nonce.clone()),
                    ("oauth_version".to_string(), "1.0".to_string()),
                ];

                let mut signed = params.clone();
                signed.extend(oauth1::body_params(&body));
                let base_string =
                    oauth1::signature_base_string(method.as_str(), &url, &signed);
                let signing_key = format!("{consumer_secret}&{token_secret}");
                let signature = oauth1::sign(*signature_method, &base_string, &signing_key)?;

                params.push(("oauth_signature".to_string(), signature));
                headers.insert(
                    "Authorization".to_string(),
                    oauth1::authorization_header(&params),
                );
            }

            AuthStrategy::OAuth2 { access_token } => {
                headers.insert("Authorization".to_string(), format!("Bearer {access_token}"));
            }

            AuthStrategy::ApiKey {
                location,
                name,
                value,
            } => match location {
                Location::Header => {
                    headers.insert(name.clone(), value.clone());
                }
                Location::Query => {
                    url = set_query_param(&url, name, value)?;
                }
            },

            AuthStrategy::TradeMe {
                consumer_key,
                consumer_secret,
                token,
                token_secret,
                mode,
            } => {
                let mut params = vec![
                    ("oauth_consumer_key".to_string(), consumer_key.clone()),
                    (
                        "oauth_signature_method".to_string(),
                        SignatureMethod::Plaintext.as_str().to_string(),
                    ),
                    ("oauth_timestamp".to_string(), oauth.timestamp.to_string()),
                    ("oauth_nonce".to_string(), oauth.nonce.clone()),
                    ("oauth_version".to_string(), "1.0".to_string()),
                ];

                let signature = if *mode == TradeMeMode::Member && !token.is_empty() {
                    params.push(("oauth_token".to_string(), token.clone()));
                    format!("{consumer_secret}&{token_secret}")
                } else {
                    format!("{consumer_secret}&")
                };
                params.push(("oauth_signature".to_string(), signature));

                headers.insert(
                    "Authorization".to_string(),
                    oauth1::authorization_header(&params),
                );
                url = force_https(&url)?;
            }
        }

        Ok(PreparedRequest {
            url,
            method,
            headers,
            body,
        })
    }
}

impl fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Credentials stay out of logs
        f.debug_struct("AuthStrategy")
            .field("auth_type", &self.auth_type())
            .finish_non_exhaustive()
    }
}

/// Ordered field descriptors for a scheme
pub fn auth_fields(auth_type: AuthType) -> Vec<AuthField> {
    match auth_type {
        AuthType::None => Vec::new(),
        AuthType::Basic => vec![
            AuthField::text("username", "Username"),
            AuthField::password("password", "Password"),
        ],
        AuthType::OAuth1 => vec![
            AuthField::text("consumer_key", "Consumer Key"),
            AuthField::password("consumer_secret", "Consumer Secret"),
            AuthField::text("token", "Access Token"),
            AuthField::password("token_secret", "Access Token Secret"),
            AuthField::select(
                "signature_method",
                "Signature Method",
                &[
                    ("HMAC-SHA1", "HMAC-SHA1"),
                    ("RSA-SHA1", "RSA-SHA1"),
                    ("PLAINTEXT", "PLAINTEXT"),
                ],
            ),
        ],
        AuthType::OAuth2 => vec![
            AuthField::text("client_id", "Client ID"),
            AuthField::password("client_secret", "Client Secret"),
            AuthField::text("access_token", "Access Token"),
            AuthField::text("refresh_token", "Refresh Token"),
            AuthField::url("token_url", "Token URL"),
            AuthField::url("authorize_url", "Authorize URL"),
        ],
        AuthType::ApiKey => vec![
            AuthField::text("api_key", "API Key"),
            AuthField::select(
                "api_key_location",
                "API Key Location",
                &[("query", "Query Parameter"), ("header", "Header")],
            ),
            AuthField::text("api_key_name", "API Key Name"),
        ],
        AuthType::TradeMe => vec![
            AuthField::text("consumer_key", "Consumer Key"),
            AuthField::password("consumer_secret", "Consumer Secret"),
            AuthField::text("token", "Access Token"),
            AuthField::password("token_secret", "Access Token Secret"),
            AuthField::select(
                "auth_type",
                "Authentication Type",
                &[
                    ("application", "Application Authenticated"),
                    ("member", "Member Authenticated"),
                ],
            ),
        ],
    }
}

fn required(auth_data: &StringMap, key: &str) -> Result<String> {
    match auth_data.get(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => Err(Error::missing_field(format!("auth_data.{key}"))),
    }
}

fn optional(auth_data: &StringMap, key: &str) -> String {
    auth_data.get(key).cloned().unwrap_or_default()
}

/// Replace or append a query parameter
fn set_query_param(url: &str, name: &str, value: &str) -> Result<String> {
    let mut parsed = Url::parse(url)?;

    // Existing pairs keep their original encoding unless one is replaced
    if !parsed.query_pairs().any(|(k, _)| k == name) {
        let pair = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(name, value)
            .finish();
        let query = match parsed.query() {
            Some(q) if !q.is_empty() => format!("{q}&{pair}"),
            _ => pair,
        };
        parsed.set_query(Some(&query));
        return Ok(parsed.to_string());
    }

    let retained: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| k != name)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(name, value);

    Ok(parsed.to_string())
}

fn force_https(url: &str) -> Result<String> {
    let mut parsed = Url::parse(url)?;
    if parsed.scheme() != "https" {
        parsed
            .set_scheme("https")
            .map_err(|()| Error::invalid_value("url", format!("cannot use https for '{url}'")))?;
    }
    Ok(parsed.to_string())
}
