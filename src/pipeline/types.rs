//! Pipeline report types

use crate::mapping::UpsertReport;
use serde::Serialize;

/// How a cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// The response was fetched and every item processed
    Completed,
    /// The rate-limit gate was closed; nothing was fetched
    Deferred { seconds_remaining: u64 },
    /// The fetch failed; no item was processed
    FetchFailed,
}

/// Result of one fetch → extract → map → upsert cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub source_id: String,
    pub outcome: CycleOutcome,
    /// Items found at the object path
    pub items_found: usize,
    pub report: UpsertReport,
    /// Failures that concern the whole source rather than one item
    pub source_errors: Vec<String>,
    pub duration_ms: u64,
}

impl CycleReport {
    pub(crate) fn new(source_id: impl Into<String>, outcome: CycleOutcome) -> Self {
        Self {
            source_id: source_id.into(),
            outcome,
            items_found: 0,
            report: UpsertReport::default(),
            source_errors: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Whether the cycle ran without any source or item errors
    pub fn is_clean(&self) -> bool {
        self.outcome == CycleOutcome::Completed
            && self.source_errors.is_empty()
            && !self.report.has_errors()
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.outcome, CycleOutcome::Deferred { .. })
    }
}
