//! Periodic refetch task
//!
//! The live channel carries no replay; eventual consistency after missed
//! events comes from refetching the historical window on a fixed interval
//! and bulk-replacing the store. The first tick fires immediately, so the
//! task also performs the initial load.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::history::HistoryClient;
use crate::store::StoreHandle;

/// Handle to the spawned refresh loop
pub struct RefreshTask {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Spawn the refresh loop
    ///
    /// Every `interval` the task fetches the recent window and replaces the
    /// store's contents. A failed fetch is logged and the previous snapshot
    /// stays visible; the loop never dies on a fetch error.
    pub fn spawn(
        client: HistoryClient,
        store: StoreHandle,
        project_id: Option<String>,
        interval: Duration,
    ) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let limit = store.max_items().await;
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        tokio::select! {
                            result = client.recent_activities(project_id.as_deref(), limit) => {
                                match result {
                                    Ok(activities) => {
                                        debug!("refresh fetched {} activities", activities.len());
                                        store.replace_all(activities).await;
                                    }
                                    Err(e) => {
                                        warn!("activity refresh failed, keeping stale view: {e}");
                                    }
                                }
                            }
                            _ = shutdown_rx.changed() => break,
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            debug!("refresh task stopped");
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Stop the loop and wait for it to exit; a mid-flight response is
    /// discarded rather than applied
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }
}
