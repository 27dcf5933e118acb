//! State types for rate-limit bookkeeping
//!
//! These types are serialized to JSON and persisted between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// All persisted timestamps, keyed by store key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    /// Timestamp entries
    #[serde(default)]
    pub entries: HashMap<String, TimestampEntry>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp stored under `key`, unless it has expired by `now`
    pub fn get_live(&self, key: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.at)
    }

    /// Store a timestamp that expires `ttl` after `at`
    pub fn set(&mut self, key: &str, at: DateTime<Utc>, ttl: Duration) {
        self.entries
            .insert(key.to_string(), TimestampEntry::new(at, ttl));
    }

    /// Drop every entry expired by `now`, returning how many were removed
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }
}

/// One stored timestamp with its expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampEntry {
    /// The recorded instant
    pub at: DateTime<Utc>,
    /// When the entry stops being visible
    pub expires_at: DateTime<Utc>,
}

impl TimestampEntry {
    /// Create an entry retained for `ttl` after `at`
    pub fn new(at: DateTime<Utc>, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500));
        Self {
            at,
            expires_at: at.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Whether the entry has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
