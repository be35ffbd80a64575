//! In-memory storage backend for the Granary grant store.
//!
//! Useful for embedded deployments, examples, and test setups that should
//! not depend on a running database. The collection lives entirely in
//! process memory; nothing survives a restart.

mod collection;

pub use collection::InMemoryGrantCollection;
