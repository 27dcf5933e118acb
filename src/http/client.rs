//! HTTP fetch client
//!
//! Issues exactly one request per call:
//! - Auth decoration through the source's [`AuthStrategy`]
//! - Fixed timeout, no retries, fully buffered bodies
//! - Outcome classification into a [`FetchResult`]

use super::result::FetchResult;
use crate::auth::{AuthStrategy, PreparedRequest};
use crate::error::{Error, Result};
use crate::source::SourceConfig;
use crate::types::{flatten_object, Method};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("postsync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Single-shot HTTP client for polling sources
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// The active configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Fetch a source once.
    ///
    /// `Err` is reserved for configuration problems found while preparing
    /// the request; every network outcome is a [`FetchResult`].
    pub async fn fetch(&self, source: &SourceConfig) -> Result<FetchResult> {
        let strategy = AuthStrategy::from_config(&source.auth_type, &source.auth_data)?;
        let request = PreparedRequest {
            url: source.url.clone(),
            method: source.method,
            headers: source.headers.clone(),
            body: source.body.clone(),
        };
        self.execute(&strategy, request).await
    }

    /// Decorate and send one request
    pub async fn execute(
        &self,
        strategy: &AuthStrategy,
        request: PreparedRequest,
    ) -> Result<FetchResult> {
        let prepared = strategy.prepare_request(request)?;
        let url = Url::parse(&prepared.url)?;
        let method = prepared.method;

        let mut req = self.client.request(method.into(), url.clone());

        for (key, value) in &prepared.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let params = flatten_object(&prepared.body);
        if !params.is_empty() {
            req = match method {
                Method::GET => req.query(&params),
                Method::POST => req.json(&prepared.body),
            };
        }

        req = req.timeout(self.config.timeout);

        debug!(%method, url = %redact_query(&url), "sending request");

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                return Err(Error::config(format!("Invalid request: {e}")));
            }
            Err(e) => {
                let message = if e.is_timeout() {
                    format!(
                        "Request timed out after {}s",
                        self.config.timeout.as_secs()
                    )
                } else {
                    e.to_string()
                };
                warn!(%method, url = %redact_query(&url), error = %message, "transport error");
                return Ok(FetchResult::transport(message));
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status, error = %e, "failed to read response body");
                return Ok(FetchResult::transport(format!(
                    "Failed to read response body: {e}"
                )));
            }
        };

        let result = FetchResult::classify(status, body);
        debug!(status, outcome = %result.message(), "request finished");
        Ok(result)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// URL without its query string, for logs (API keys may live there)
fn redact_query(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}
