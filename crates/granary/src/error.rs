//! Grant store error types.

use granary_storage::StorageError;

/// Errors surfaced by [`PersistedGrantStore`](crate::PersistedGrantStore)
/// operations.
///
/// A missing grant is never an error - reads return `Ok(None)` and removals
/// of absent keys are no-ops. Errors here are either rejected input or a
/// failing storage backend, propagated unchanged so the issuing service can
/// decide on retry or backoff.
#[derive(Debug, thiserror::Error)]
pub enum GrantStoreError {
    /// An empty grant key was passed to `store`, `get`, or `remove`.
    /// Empty keys are rejected outright rather than treated as a wildcard.
    #[error("grant key must not be empty")]
    EmptyKey,

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GrantStoreError {
    /// Returns `true` if the underlying failure was transient backend
    /// unavailability, meaning a caller-side retry may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(err) if err.is_transient())
    }
}

/// Result type for grant store operations.
pub type GrantStoreResult<T> = Result<T, GrantStoreError>;
