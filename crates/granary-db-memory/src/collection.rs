//! In-memory grant collection.

use std::collections::HashMap;

use async_trait::async_trait;
use granary_storage::{GrantCollection, GrantFilter, GrantRecord, StorageError, StoredGrant};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory [`GrantCollection`] backed by a `HashMap` keyed by the grant's
/// natural key.
///
/// Upserts take the write lock for the whole insert-or-update, so racing
/// first writes for the same key converge to a single record, mirroring the
/// per-document atomicity of the real backends.
#[derive(Debug, Default)]
pub struct InMemoryGrantCollection {
    data: RwLock<HashMap<String, StoredGrant>>,
}

impl InMemoryGrantCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records currently held.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Returns `true` if the collection holds no records.
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl GrantCollection for InMemoryGrantCollection {
    async fn find_by_key(&self, key: &str) -> Result<Option<StoredGrant>, StorageError> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn find_all(&self, filter: &GrantFilter) -> Result<Vec<StoredGrant>, StorageError> {
        let data = self.data.read().await;
        Ok(data
            .values()
            .filter(|stored| filter.matches(&stored.record))
            .cloned()
            .collect())
    }

    async fn upsert(&self, record: &GrantRecord) -> Result<StoredGrant, StorageError> {
        let mut data = self.data.write().await;
        let stored = match data.get(&record.key) {
            // Update in place, keeping the surrogate id assigned on insert.
            Some(existing) => StoredGrant {
                id: existing.id,
                record: record.clone(),
            },
            None => StoredGrant {
                id: Uuid::new_v4(),
                record: record.clone(),
            },
        };
        data.insert(record.key.clone(), stored.clone());
        Ok(stored)
    }

    async fn delete_by_key(&self, key: &str) -> Result<u64, StorageError> {
        let mut data = self.data.write().await;
        Ok(u64::from(data.remove(key).is_some()))
    }

    async fn delete_all(&self, filter: &GrantFilter) -> Result<u64, StorageError> {
        let mut data = self.data.write().await;
        let before = data.len();
        data.retain(|_, stored| !filter.matches(&stored.record));
        Ok((before - data.len()) as u64)
    }

    async fn delete_expired(&self, cutoff: OffsetDateTime) -> Result<u64, StorageError> {
        let mut data = self.data.write().await;
        let before = data.len();
        data.retain(|_, stored| !stored.record.is_expired_at(cutoff));
        Ok((before - data.len()) as u64)
    }

    async fn truncate(&self) -> Result<u64, StorageError> {
        let mut data = self.data.write().await;
        let removed = data.len() as u64;
        data.clear();
        Ok(removed)
    }
}
