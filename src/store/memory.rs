//! In-memory content store with optional JSON persistence

use super::{ContentStore, RecordId};
use crate::error::{Error, Result};
use crate::mapping::{DirectField, TargetRecord};
use crate::types::JsonObject;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Publication state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Publish,
    Draft,
    Trash,
}

/// A record as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    pub collection: String,
    pub status: RecordStatus,
    pub title: String,
    #[serde(default)]
    pub fields: JsonObject,
    #[serde(default)]
    pub meta: JsonObject,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    next_id: u64,
    records: Vec<StoredRecord>,
}

/// Content store kept in memory, optionally mirrored to a JSON file
#[derive(Debug, Clone)]
pub struct MemoryContentStore {
    path: Option<PathBuf>,
    data: Arc<RwLock<StoreData>>,
}

impl MemoryContentStore {
    /// Create an empty store that never touches disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Arc::new(RwLock::new(StoreData::default())),
        }
    }

    /// Open a file-backed store, loading existing records if the file exists
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::store(format!("Failed to read store file: {e}")))?;
            serde_json::from_str(&contents)
                .map_err(|e| Error::store(format!("Failed to parse store file: {e}")))?
        } else {
            StoreData::default()
        };

        Ok(Self {
            path: Some(path),
            data: Arc::new(RwLock::new(data)),
        })
    }

    /// Snapshot of every record
    pub async fn records(&self) -> Vec<StoredRecord> {
        self.data.read().await.records.clone()
    }

    /// Records of one collection
    pub async fn records_in(&self, collection: &str) -> Vec<StoredRecord> {
        self.data
            .read()
            .await
            .records
            .iter()
            .filter(|r| r.collection == collection)
            .cloned()
            .collect()
    }

    /// Look up a record by id
    pub async fn get(&self, id: RecordId) -> Option<StoredRecord> {
        self.data
            .read()
            .await
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Change a record's publication state
    pub async fn set_status(&self, id: RecordId, status: RecordStatus) -> Result<()> {
        {
            let mut data = self.data.write().await;
            let record = data
                .records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| Error::store(format!("Record {id} not found")))?;
            record.status = status;
        }
        self.save().await
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.records.is_empty()
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the store to its file (no-op in memory mode)
    pub async fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        // Held across write and rename so concurrent saves never share the temp file
        let data = self.data.write().await;
        let contents = serde_json::to_string_pretty(&*data)
            .map_err(|e| Error::store(format!("Failed to serialize store: {e}")))?;

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::store(format!("Failed to write store file: {e}")))?;
        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|e| Error::store(format!("Failed to rename store file: {e}")))?;

        Ok(())
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn title_of(record: &TargetRecord) -> String {
    record.lookup_key.clone()
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn find_published(&self, collection: &str, title: &str) -> Result<Option<RecordId>> {
        let data = self.data.read().await;
        Ok(data
            .records
            .iter()
            .find(|r| {
                r.collection == collection && r.status == RecordStatus::Publish && r.title == title
            })
            .map(|r| r.id))
    }

    async fn insert(&self, collection: &str, record: &TargetRecord) -> Result<RecordId> {
        let id = {
            let mut data = self.data.write().await;
            data.next_id += 1;
            let id = RecordId(data.next_id);
            let now = Utc::now();
            data.records.push(StoredRecord {
                id,
                collection: collection.to_string(),
                status: RecordStatus::Publish,
                title: title_of(record),
                fields: record.direct_fields.clone(),
                meta: record.meta_fields.clone(),
                created_at: now,
                updated_at: now,
            });
            id
        };
        debug!(%id, collection, "inserted record");
        self.save().await?;
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: RecordId,
        record: &TargetRecord,
    ) -> Result<RecordId> {
        {
            let mut data = self.data.write().await;
            let stored = data
                .records
                .iter_mut()
                .find(|r| r.id == id && r.collection == collection)
                .ok_or_else(|| Error::store(format!("Record {id} not found in {collection}")))?;

            for (key, value) in &record.direct_fields {
                stored.fields.insert(key.clone(), value.clone());
            }
            for (key, value) in &record.meta_fields {
                stored.meta.insert(key.clone(), value.clone());
            }
            if record.direct(DirectField::Title).is_some() {
                stored.title = title_of(record);
            }
            stored.updated_at = Utc::now();
        }
        debug!(%id, collection, "updated record");
        self.save().await?;
        Ok(id)
    }
}
