//! Sync pipeline
//!
//! The single fetch → extract → map → upsert cycle. Scheduled ticks and
//! manual `sync` runs both go through [`Pipeline::run_cycle`];
//! [`Pipeline::test_fetch`] shares the fetch path but skips the rate-limit
//! gate and never writes.

mod types;

pub use types::{CycleOutcome, CycleReport};

use crate::error::{Error, Result};
use crate::extract::extract_collection;
use crate::http::{FetchResult, HttpClient, RateLimiter};
use crate::mapping::UpsertEngine;
use crate::source::SourceConfig;
use crate::state::TimestampStore;
use crate::store::ContentStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Runs sync cycles for sources
#[derive(Debug, Clone)]
pub struct Pipeline {
    client: HttpClient,
    limiter: RateLimiter,
    engine: UpsertEngine,
}

impl Pipeline {
    /// Create a pipeline from its parts
    pub fn new(client: HttpClient, limiter: RateLimiter, engine: UpsertEngine) -> Self {
        Self {
            client,
            limiter,
            engine,
        }
    }

    /// Create a pipeline with a default HTTP client
    pub fn with_stores(
        timestamps: Arc<dyn TimestampStore>,
        content: Arc<dyn ContentStore>,
    ) -> Result<Self> {
        Ok(Self::new(
            HttpClient::new()?,
            RateLimiter::new(timestamps),
            UpsertEngine::new(content),
        ))
    }

    /// The HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Run one gated cycle for a source.
    ///
    /// `Err` only for configuration problems. Fetch failures, a closed rate
    /// gate and item errors are all reported in the [`CycleReport`].
    pub async fn run_cycle(&self, source: &SourceConfig) -> Result<CycleReport> {
        let start = Instant::now();

        match self
            .limiter
            .check_and_record(&source.id, source.rate_limit_wait_seconds)
            .await
        {
            Ok(()) => {}
            Err(Error::RateLimited { seconds_remaining }) => {
                warn!(
                    source = %source.id,
                    seconds_remaining,
                    "rate limit exceeded, cycle deferred"
                );
                return Ok(CycleReport::new(
                    &source.id,
                    CycleOutcome::Deferred { seconds_remaining },
                ));
            }
            Err(e) => return Err(e),
        }

        let fetched = self.client.fetch(source).await?;
        let mut report = self.process(source, fetched).await;
        report.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            source = %source.id,
            items = report.items_found,
            created = report.report.created,
            updated = report.report.updated,
            errors = report.report.errors.len() + report.source_errors.len(),
            duration_ms = report.duration_ms,
            "cycle finished"
        );

        Ok(report)
    }

    /// Extract and upsert the items of an already fetched response
    pub async fn process(&self, source: &SourceConfig, fetched: FetchResult) -> CycleReport {
        let body = match fetched {
            FetchResult::Success { body, .. } => body,
            failed => {
                let message = match &failed {
                    FetchResult::HttpError { raw_body, .. } if !raw_body.is_empty() => {
                        format!("{}: {}", failed.message(), raw_body)
                    }
                    _ => failed.message(),
                };
                warn!(source = %source.id, error = %message, "fetch failed");
                let mut report = CycleReport::new(&source.id, CycleOutcome::FetchFailed);
                report.source_errors.push(message);
                return report;
            }
        };

        let items = extract_collection(&body, &source.object_path);
        let mut report = CycleReport::new(&source.id, CycleOutcome::Completed);
        report.items_found = items.len();

        if items.is_empty() {
            warn!(source = %source.id, path = %source.object_path, "no items found");
            report.source_errors.push(format!(
                "No items found at object path: {}",
                source.object_path
            ));
            return report;
        }

        report.report = self
            .engine
            .process(&source.target_collection, &source.mapping, &items)
            .await;
        report
    }

    /// Fetch a source once without the rate-limit gate or any writes
    pub async fn test_fetch(&self, source: &SourceConfig) -> Result<FetchResult> {
        let result = self.client.fetch(source).await?;
        info!(source = %source.id, outcome = %result.message(), "test fetch");
        Ok(result)
    }
}

#[cfg(test)]
mod tests;
