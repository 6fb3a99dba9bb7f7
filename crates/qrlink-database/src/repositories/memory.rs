//! In-process image record repository.
//!
//! Backs the `memory` database provider used for local development and
//! the test suites. Nothing survives a restart.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use qrlink_core::error::AppError;
use qrlink_core::result::AppResult;
use qrlink_core::traits::RecordStore;
use qrlink_core::types::{ImageId, OwnerId};
use qrlink_entity::image::ImageRecord;

#[derive(Debug, Clone)]
struct Row {
    seq: u64,
    record: ImageRecord,
}

/// Concurrent map of image records keyed by id.
#[derive(Debug, Default)]
pub struct MemoryImageRepository {
    rows: DashMap<ImageId, Row>,
    seq: AtomicU64,
}

impl MemoryImageRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the repository holds no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Insert a record with a caller-chosen id.
    ///
    /// Fails with `DuplicateViolation` if the id or storage path is taken.
    pub fn insert_with_id(
        &self,
        id: ImageId,
        owner_id: &OwnerId,
        storage_path: &str,
    ) -> AppResult<ImageRecord> {
        if self
            .rows
            .iter()
            .any(|row| row.record.storage_path == storage_path)
        {
            return Err(AppError::duplicate(format!(
                "Storage path already recorded: {storage_path}"
            )));
        }

        match self.rows.entry(id) {
            Entry::Occupied(_) => Err(AppError::duplicate(format!("Image id collision: {id}"))),
            Entry::Vacant(slot) => {
                let record = ImageRecord {
                    id,
                    owner_id: owner_id.clone(),
                    storage_path: storage_path.to_string(),
                    created_at: Utc::now(),
                };
                slot.insert(Row {
                    seq: self.seq.fetch_add(1, Ordering::SeqCst),
                    record: record.clone(),
                });
                Ok(record)
            }
        }
    }
}

#[async_trait]
impl RecordStore<ImageRecord> for MemoryImageRepository {
    async fn insert(&self, owner_id: &OwnerId, storage_path: &str) -> AppResult<ImageRecord> {
        self.insert_with_id(ImageId::new(), owner_id, storage_path)
    }

    async fn select_by_owner(&self, owner_id: &OwnerId) -> AppResult<Vec<ImageRecord>> {
        let mut rows: Vec<Row> = self
            .rows
            .iter()
            .filter(|row| &row.record.owner_id == owner_id)
            .map(|row| row.value().clone())
            .collect();
        rows.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(rows.into_iter().map(|row| row.record).collect())
    }

    async fn select_by_id(&self, id: &ImageId) -> AppResult<Option<ImageRecord>> {
        Ok(self.rows.get(id).map(|row| row.record.clone()))
    }

    async fn delete_by_id(&self, id: &ImageId) -> AppResult<bool> {
        Ok(self.rows.remove(id).is_some())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
