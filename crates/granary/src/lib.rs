//! # granary
//!
//! Operational grant store for OAuth/OIDC token-issuing services.
//!
//! Granary persists short-lived authorization artifacts ("grants": refresh
//! tokens, authorization codes, device codes, consent records) and removes
//! them once expired. It owns no protocol semantics - the issuing service
//! mints and interprets grants; this crate stores them.
//!
//! ## Components
//!
//! - [`PersistedGrantStore`] - idempotent storage and retrieval of grants,
//!   keyed by the grant's natural key, with subject/client/type-scoped bulk
//!   removal for revocation flows.
//! - [`TokenCleanup`] - a recurring, cancellable background job that bulk
//!   deletes expired grants to bound storage growth.
//!
//! Both are built on the [`GrantCollection`] driver trait from
//! `granary-storage`; backends are provided by `granary-db-memory` and
//! `granary-db-postgres`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use granary::{Grant, PersistedGrantStore, TokenCleanup};
//! use granary_db_memory::InMemoryGrantCollection;
//!
//! let collection = Arc::new(InMemoryGrantCollection::new());
//! let store = PersistedGrantStore::new(collection.clone());
//!
//! store.store(&grant).await?;
//! let found = store.get(&grant.key).await?;
//!
//! let cleanup = TokenCleanup::new(collection).start(Duration::from_secs(3600));
//! // ... at shutdown:
//! cleanup.stop().await;
//! ```

pub mod cleanup;
pub mod config;
pub mod error;
pub mod mapper;
pub mod store;
pub mod types;

pub use cleanup::{CleanupHandle, TokenCleanup};
pub use config::CleanupConfig;
pub use error::{GrantStoreError, GrantStoreResult};
pub use store::PersistedGrantStore;
pub use types::Grant;

// Re-export the storage contract so downstream callers can wire a backend
// without naming granary-storage directly.
pub use granary_storage::{
    DynGrantCollection, GrantCollection, GrantFilter, GrantRecord, StorageError, StoredGrant,
};
