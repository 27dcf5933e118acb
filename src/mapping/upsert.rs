//! Create-or-update engine

use super::mapper::build_record;
use super::types::{ItemOutcome, MappingTable, TargetRecord, UpsertReport};
use crate::store::ContentStore;
use crate::types::JsonValue;
use std::sync::Arc;
use tracing::{debug, warn};

/// Applies a mapping table to items and writes them through a content store
#[derive(Clone)]
pub struct UpsertEngine {
    store: Arc<dyn ContentStore>,
}

impl UpsertEngine {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Process a batch strictly in order.
    ///
    /// Item failures land in the report; the batch always runs to the end.
    pub async fn process(
        &self,
        collection: &str,
        mapping: &MappingTable,
        items: &[JsonValue],
    ) -> UpsertReport {
        let mut report = UpsertReport::default();

        for (index, item) in items.iter().enumerate() {
            let outcome = self.process_item(collection, mapping, item).await;
            if let ItemOutcome::Skipped(message) = &outcome {
                warn!(collection, item_index = index, %message, "item skipped");
            }
            report.record(index, &outcome);
        }

        report
    }

    /// Map and upsert a single item
    pub async fn process_item(
        &self,
        collection: &str,
        mapping: &MappingTable,
        item: &JsonValue,
    ) -> ItemOutcome {
        let record = match build_record(mapping, item) {
            Ok(record) => record,
            Err(e) => return ItemOutcome::Skipped(e.to_string()),
        };
        self.upsert(collection, &record).await
    }

    async fn upsert(&self, collection: &str, record: &TargetRecord) -> ItemOutcome {
        let existing = match self
            .store
            .find_published(collection, &record.lookup_key)
            .await
        {
            Ok(existing) => existing,
            Err(e) => return ItemOutcome::Skipped(format!("Failed to look up record: {e}")),
        };

        match existing {
            Some(id) => match self.store.update(collection, id, record).await {
                Ok(id) => {
                    debug!(%id, title = %record.lookup_key, "updated");
                    ItemOutcome::Updated(id)
                }
                Err(e) => ItemOutcome::Skipped(format!("Failed to update record: {e}")),
            },
            None => match self.store.insert(collection, record).await {
                Ok(id) => {
                    debug!(%id, title = %record.lookup_key, "created");
                    ItemOutcome::Created(id)
                }
                Err(e) => ItemOutcome::Skipped(format!("Failed to create record: {e}")),
            },
        }
    }
}

impl std::fmt::Debug for UpsertEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpsertEngine").finish_non_exhaustive()
    }
}
