//! Operational store configuration.
//!
//! Connection settings belong to the backend crates (see
//! `granary-db-postgres`); this module covers the store-level surface the
//! issuing service injects at startup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the expired-grant cleanup job.
///
/// # Example (TOML)
///
/// ```toml
/// [operational_store.cleanup]
/// enabled = true
/// interval = "1h"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Whether the issuing service should run the cleanup job at all.
    /// When disabled, expired grants accumulate until removed externally.
    pub enabled: bool,

    /// Time between sweep ticks.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(3600),
        }
    }
}
