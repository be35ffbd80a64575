//! Persisted grant store.

use granary_storage::{DynGrantCollection, GrantFilter};
use tracing::debug;

use crate::error::{GrantStoreError, GrantStoreResult};
use crate::mapper;
use crate::types::Grant;

/// Durable, idempotent storage and retrieval of grants, keyed by the
/// grant's natural key.
///
/// Store operations execute on the caller's own concurrency context and are
/// not coordinated beyond the backend's per-document atomicity. `store` is
/// an atomic upsert: repeated calls for the same key converge to a single
/// record reflecting the latest call, with the storage-internal surrogate
/// id preserved across updates - including under concurrent first writes.
#[derive(Clone)]
pub struct PersistedGrantStore {
    collection: DynGrantCollection,
}

impl PersistedGrantStore {
    /// Creates a store over the given collection handle. The handle is
    /// shared with the cleanup job; no additional locking is layered on it.
    #[must_use]
    pub fn new(collection: DynGrantCollection) -> Self {
        Self { collection }
    }

    /// Stores a grant, inserting it if its key is unseen and updating the
    /// existing record in place otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`GrantStoreError::EmptyKey`] for an empty key, or the
    /// backend failure unchanged.
    pub async fn store(&self, grant: &Grant) -> GrantStoreResult<()> {
        require_key(&grant.key)?;

        let record = mapper::to_record(grant);
        let stored = self.collection.upsert(&record).await?;

        debug!(key = %grant.key, id = %stored.id, "persisted grant stored");

        Ok(())
    }

    /// Returns the grant stored under `key`, or `None` if there is none.
    ///
    /// An expired grant that the sweep has not yet removed is still
    /// returned; callers check [`Grant::is_expired`].
    ///
    /// # Errors
    ///
    /// Returns [`GrantStoreError::EmptyKey`] for an empty key, or the
    /// backend failure unchanged.
    pub async fn get(&self, key: &str) -> GrantStoreResult<Option<Grant>> {
        require_key(key)?;

        let found = self.collection.find_by_key(key).await?;

        debug!(key, found = found.is_some(), "persisted grant lookup");

        Ok(found.map(|stored| mapper::to_model(stored.record)))
    }

    /// Returns every grant belonging to `subject_id`, in backend-native
    /// order. No matches yield an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    pub async fn get_all(&self, subject_id: &str) -> GrantStoreResult<Vec<Grant>> {
        let filter = GrantFilter::new().with_subject_id(subject_id);
        let stored = self.collection.find_all(&filter).await?;

        debug!(
            subject_id,
            count = stored.len(),
            "persisted grants found for subject"
        );

        Ok(mapper::to_models(stored))
    }

    /// Removes the grant stored under `key`. Removing a missing key is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GrantStoreError::EmptyKey`] for an empty key, or the
    /// backend failure unchanged.
    pub async fn remove(&self, key: &str) -> GrantStoreResult<()> {
        require_key(key)?;

        let removed = self.collection.delete_by_key(key).await?;

        if removed > 0 {
            debug!(key, "removed persisted grant");
        } else {
            debug!(key, "no persisted grant found to remove");
        }

        Ok(())
    }

    /// Removes every grant matching both `subject_id` and `client_id`.
    /// Used for full revocation of a client's grants for a user.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    pub async fn remove_all(&self, subject_id: &str, client_id: &str) -> GrantStoreResult<()> {
        let filter = GrantFilter::new()
            .with_subject_id(subject_id)
            .with_client_id(client_id);
        let removed = self.collection.delete_all(&filter).await?;

        debug!(subject_id, client_id, removed, "removed persisted grants");

        Ok(())
    }

    /// Removes every grant matching `subject_id`, `client_id`, and
    /// `grant_type`; the narrower, grant-kind-specific revocation.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    pub async fn remove_all_of_type(
        &self,
        subject_id: &str,
        client_id: &str,
        grant_type: &str,
    ) -> GrantStoreResult<()> {
        let filter = GrantFilter::new()
            .with_subject_id(subject_id)
            .with_client_id(client_id)
            .with_grant_type(grant_type);
        let removed = self.collection.delete_all(&filter).await?;

        debug!(
            subject_id,
            client_id,
            grant_type,
            removed,
            "removed persisted grants of type"
        );

        Ok(())
    }
}

fn require_key(key: &str) -> GrantStoreResult<()> {
    if key.is_empty() {
        return Err(GrantStoreError::EmptyKey);
    }
    Ok(())
}
