//! Recurring per-source jobs
//!
//! Each scheduled source gets its own tokio task that runs one pipeline
//! cycle per tick. Ticks of one source run back to back and never overlap;
//! a tick that falls due while a cycle is still running is skipped.

use crate::pipeline::{CycleReport, Pipeline};
use crate::source::{SourceConfig, DEFAULT_REQUESTS_PER_DAY};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Shortest interval a source is ever polled at
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(60);

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Interval that spreads `requests_per_day` evenly over a day, never below a minute
#[allow(clippy::cast_precision_loss)]
pub fn poll_interval(requests_per_day: u64) -> Duration {
    let per_day = if requests_per_day == 0 {
        DEFAULT_REQUESTS_PER_DAY
    } else {
        requests_per_day
    };
    Duration::from_secs_f64(SECONDS_PER_DAY / per_day as f64).max(MIN_POLL_INTERVAL)
}

/// Owns the recurring job of every scheduled source
pub struct Scheduler {
    pipeline: Pipeline,
    reports: Option<mpsc::UnboundedSender<CycleReport>>,
    jobs: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            reports: None,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Forward every cycle report to `sender`
    #[must_use]
    pub fn with_reports(mut self, sender: mpsc::UnboundedSender<CycleReport>) -> Self {
        self.reports = Some(sender);
        self
    }

    /// Start polling a source at its computed interval
    pub async fn schedule(&self, source: SourceConfig) -> Duration {
        self.schedule_every(source.clone(), poll_interval(source.requests_per_day))
            .await
    }

    /// Start polling a source at an explicit interval.
    ///
    /// Any job already registered for the same id is cancelled first.
    pub async fn schedule_every(&self, source: SourceConfig, period: Duration) -> Duration {
        let id = source.id.clone();
        let mut jobs = self.jobs.lock().await;

        if let Some(previous) = jobs.remove(&id) {
            previous.abort();
            info!(source = %id, "replaced existing schedule");
        }

        let pipeline = self.pipeline.clone();
        let reports = self.reports.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                match pipeline.run_cycle(&source).await {
                    Ok(report) => {
                        if let Some(sender) = &reports {
                            // receiver gone means nobody is listening any more
                            let _ = sender.send(report);
                        }
                    }
                    Err(e) => error!(source = %source.id, error = %e, "scheduled cycle failed"),
                }
            }
        });

        info!(source = %id, interval_secs = period.as_secs_f64(), "scheduled");
        jobs.insert(id, handle);
        period
    }

    /// Cancel a source's job; returns whether one existed
    pub async fn unschedule(&self, source_id: &str) -> bool {
        match self.jobs.lock().await.remove(source_id) {
            Some(handle) => {
                handle.abort();
                info!(source = source_id, "unscheduled");
                true
            }
            None => false,
        }
    }

    /// Ids of all scheduled sources, sorted
    pub async fn scheduled_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.jobs.lock().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Cancel every job
    pub async fn shutdown(&self) {
        let mut jobs = self.jobs.lock().await;
        for (id, handle) in jobs.drain() {
            handle.abort();
            info!(source = %id, "stopped");
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}
