//! HTTP client module
//!
//! Provides the single-shot fetch client and the per-source rate limiter.
//!
//! # Features
//!
//! - **One request per call**: no retries, fixed timeout
//! - **Outcome classification**: success, HTTP error, transport error, parse error
//! - **Rate Limiting**: cooldown gate backed by a timestamp store
//! - **Authentication**: Integration with auth module

mod client;
mod rate_limit;
mod result;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{rate_limit_key, RateLimiter, DEFAULT_RETENTION, DEFAULT_WAIT_SECONDS};
pub use result::FetchResult;
