//! State management module
//!
//! Persists the per-source "last request" timestamps the rate limiter reads.
//! Entries carry a time-to-live; an expired entry reads as absent.
//!
//! # Overview
//!
//! The state module provides:
//! - `TimestampStore` - the key-value port the rate limiter depends on
//! - `StateManager` - in-memory or JSON-file implementation of that port

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{State, TimestampEntry};

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Key-value store of timestamps with per-entry retention
#[async_trait]
pub trait TimestampStore: Send + Sync {
    /// Timestamp stored under `key`, or `None` if absent or expired
    async fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>>;

    /// Store `at` under `key`, retained for `ttl`
    async fn set(&self, key: &str, at: DateTime<Utc>, ttl: Duration) -> Result<()>;
}
