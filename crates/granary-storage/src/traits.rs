//! The grant collection trait all storage backends implement.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::StorageError;
use crate::filter::GrantFilter;
use crate::record::{GrantRecord, StoredGrant};

/// Driver contract for a collection of persisted grants.
///
/// Implementations must be thread-safe (`Send + Sync`); the collection
/// handle is shared read/write across the request path and the background
/// cleanup job. Single-document writes must be atomic; no multi-document
/// transactional guarantees are assumed.
///
/// Missing records are never an error on this trait: lookups return
/// `Ok(None)` and deletions return the number of records actually removed.
#[async_trait]
pub trait GrantCollection: Send + Sync {
    /// Finds at most one record by its natural key.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures, not for a missing key.
    async fn find_by_key(&self, key: &str) -> Result<Option<StoredGrant>, StorageError>;

    /// Finds every record matching the filter, in backend-native order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails; an empty match set is `Ok`.
    async fn find_all(&self, filter: &GrantFilter) -> Result<Vec<StoredGrant>, StorageError>;

    /// Atomically inserts the record, or updates the existing record with
    /// the same `key` in place.
    ///
    /// The backend assigns the surrogate id on first insert and must
    /// preserve it on update, so two racing upserts for the same new key
    /// converge to a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn upsert(&self, record: &GrantRecord) -> Result<StoredGrant, StorageError>;

    /// Deletes at most one record by its natural key.
    ///
    /// Returns the number of records deleted (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails; a missing key is `Ok(0)`.
    async fn delete_by_key(&self, key: &str) -> Result<u64, StorageError>;

    /// Deletes every record matching the filter in one backend-native bulk
    /// operation, returning the number of records deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails.
    async fn delete_all(&self, filter: &GrantFilter) -> Result<u64, StorageError>;

    /// Deletes every record whose expiration is set and earlier than
    /// `cutoff`, returning the number of records deleted.
    ///
    /// This is the bulk primitive behind the cleanup sweep; deletions are
    /// not observable individually and carry no ordering guarantee.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails.
    async fn delete_expired(&self, cutoff: OffsetDateTime) -> Result<u64, StorageError>;

    /// Removes every record in the collection, returning the number
    /// removed.
    ///
    /// Intended for test setup and operator-driven resets, replacing any
    /// ambient "drop the database once" initialization state.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset fails.
    async fn truncate(&self) -> Result<u64, StorageError>;
}
