//! Content store module
//!
//! The upsert engine writes through the [`ContentStore`] port. The crate
//! ships [`MemoryContentStore`], an in-memory store with optional JSON-file
//! persistence used by the CLI and tests.

mod memory;

pub use memory::{MemoryContentStore, RecordStatus, StoredRecord};

use crate::error::Result;
use crate::mapping::TargetRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Destination of mapped records
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Exact-title lookup among published records of a collection.
    /// Returns at most one id.
    async fn find_published(&self, collection: &str, title: &str) -> Result<Option<RecordId>>;

    /// Create a published record
    async fn insert(&self, collection: &str, record: &TargetRecord) -> Result<RecordId>;

    /// Overwrite the mapped fields of an existing record
    async fn update(&self, collection: &str, id: RecordId, record: &TargetRecord)
        -> Result<RecordId>;
}
