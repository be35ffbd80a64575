//! # granary-storage
//!
//! Storage abstraction layer for the Granary grant store.
//!
//! This crate defines the contract between the grant store and its document
//! storage backends. It does not contain any backend - those are provided by
//! separate crates.
//!
//! ## Overview
//!
//! The main trait is [`GrantCollection`], which defines the driver contract
//! for:
//! - typed filtered queries (by key, by composite [`GrantFilter`])
//! - atomic upsert keyed by the grant's natural key
//! - single and bulk deletion
//! - expiration-driven bulk deletion for the cleanup job
//!
//! ## Storage Backends
//!
//! To implement a storage backend, implement the [`GrantCollection`] trait:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use granary_storage::{GrantCollection, GrantRecord, StoredGrant, StorageResult};
//!
//! struct MyCollection {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl GrantCollection for MyCollection {
//!     async fn upsert(&self, record: &GrantRecord) -> StorageResult<StoredGrant> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
mod filter;
mod record;
mod traits;

pub use error::StorageError;
pub use filter::GrantFilter;
pub use record::{GrantRecord, StoredGrant};
pub use traits::GrantCollection;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared grant collection trait object.
pub type DynGrantCollection = std::sync::Arc<dyn GrantCollection>;
