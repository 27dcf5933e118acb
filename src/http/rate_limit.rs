//! Rate limiting implementation
//!
//! A per-source cooldown gate. The last successful call for each source is
//! recorded in a [`TimestampStore`]; a call arriving sooner than the
//! configured wait is refused with the seconds still remaining.
//!
//! The check is read-then-write and is not atomic across processes, so two
//! concurrent ticks for the same source can both pass.

use crate::error::{Error, Result};
use crate::state::TimestampStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Minimum time a recorded call is retained
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60);

/// Wait used when a source does not configure a valid one
pub const DEFAULT_WAIT_SECONDS: u64 = 10;

/// Store key for a source's last-call timestamp
pub fn rate_limit_key(source_id: &str) -> String {
    format!("api_last_request_{source_id}")
}

/// Per-source cooldown rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn TimestampStore>,
    retention: Duration,
}

impl RateLimiter {
    /// Create a rate limiter over the given store
    pub fn new(store: Arc<dyn TimestampStore>) -> Self {
        Self {
            store,
            retention: DEFAULT_RETENTION,
        }
    }

    /// Override how long a recorded call is retained
    #[must_use]
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Check the gate for `source_id` and record the call if it passes
    pub async fn check_and_record(&self, source_id: &str, min_wait_seconds: u64) -> Result<()> {
        self.check_and_record_at(source_id, min_wait_seconds, Utc::now())
            .await
    }

    /// Same as [`check_and_record`](Self::check_and_record) with an explicit clock.
    ///
    /// A refused call leaves the stored timestamp untouched. A recorded call is
    /// retained for at least the wait itself, so a long wait cannot lapse early.
    pub async fn check_and_record_at(
        &self,
        source_id: &str,
        min_wait_seconds: u64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let key = rate_limit_key(source_id);

        if let Some(last) = self.store.get(&key).await? {
            let elapsed = (now - last).num_seconds().max(0) as u64;
            if elapsed < min_wait_seconds {
                let seconds_remaining = min_wait_seconds - elapsed;
                debug!(source = source_id, seconds_remaining, "rate limit gate closed");
                return Err(Error::RateLimited { seconds_remaining });
            }
        }

        let ttl = self.retention.max(Duration::from_secs(min_wait_seconds));
        self.store.set(&key, now, ttl).await
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("retention", &self.retention)
            .finish_non_exhaustive()
    }
}
