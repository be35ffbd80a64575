//! Expired grant cleanup job.
//!
//! A recurring background task that bulk deletes grants whose expiration
//! has passed, independent of the request path. Deletion is a single
//! backend-native bulk operation per tick; individual removals are not
//! observable and carry no ordering guarantee.

use std::time::Duration;

use granary_storage::{DynGrantCollection, StorageError};
use time::OffsetDateTime;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Periodic removal of expired grants.
///
/// Constructed over the same shared collection handle as the store, then
/// either driven manually with [`remove_expired_grants`] or started as a
/// long-lived task with [`start`].
///
/// [`remove_expired_grants`]: Self::remove_expired_grants
/// [`start`]: Self::start
pub struct TokenCleanup {
    collection: DynGrantCollection,
}

impl TokenCleanup {
    /// Creates a cleanup job over the given collection handle.
    #[must_use]
    pub fn new(collection: DynGrantCollection) -> Self {
        Self { collection }
    }

    /// Runs one sweep tick: deletes every grant whose expiration is earlier
    /// than now, returning the number removed.
    ///
    /// # Errors
    ///
    /// Returns the backend failure. The background loop logs and continues
    /// on error; callers driving ticks manually decide for themselves.
    pub async fn remove_expired_grants(&self) -> Result<u64, StorageError> {
        let removed = self
            .collection
            .delete_expired(OffsetDateTime::now_utc())
            .await?;

        if removed > 0 {
            debug!(removed, "removed expired grants");
        }

        Ok(removed)
    }

    /// Spawns the cleanup loop, ticking at `interval` until the returned
    /// handle is stopped.
    ///
    /// The first tick fires immediately after start. A failed tick is
    /// logged and never terminates the loop. After a stop signal no new
    /// tick starts; an in-flight delete completes before the task exits.
    #[must_use]
    pub fn start(self, interval: Duration) -> CleanupHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            info!(interval = ?interval, "token cleanup started");

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        info!("token cleanup shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = self.remove_expired_grants().await {
                            warn!(error = %e, "token cleanup tick failed");
                        }
                    }
                }
            }
        });

        CleanupHandle {
            shutdown_tx,
            handle,
        }
    }
}

/// Handle to a running cleanup loop.
///
/// [`stop`](Self::stop) shuts the loop down cooperatively and waits for the
/// task to finish. Dropping the handle also winds the loop down (the closed
/// shutdown channel resolves) but without waiting for it.
pub struct CleanupHandle {
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl CleanupHandle {
    /// Signals shutdown and waits for the cleanup task to exit. A tick in
    /// flight at the time of the signal completes first.
    pub async fn stop(self) {
        // Send fails only if the task already exited; either way the join
        // below observes a finished task.
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }

    /// Returns `true` if the cleanup task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
