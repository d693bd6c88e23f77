//! Background change polling.
//!
//! The reference deployment pushed changes through a hosted pub/sub service;
//! here the store's own `_since` changeset protocol covers the same ground
//! with nothing but the HTTP client. The slideshow only ever sees
//! [`RecordEvent`]s on a channel, so a push transport can replace this
//! without touching it.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use wallcast_core::RecordEvent;

use crate::kinto::KintoClient;

pub struct ChangePoller {
    client: KintoClient,
    interval_secs: u64,
    /// `_since` cursor: highest `last_modified` seen so far.
    cursor: i64,
    tx: mpsc::Sender<RecordEvent>,
}

impl ChangePoller {
    /// `cursor` starts at the highest `last_modified` of the initial batch so
    /// the first poll only returns genuinely new changes.
    pub fn new(
        client: KintoClient,
        interval_secs: u64,
        cursor: i64,
        tx: mpsc::Sender<RecordEvent>,
    ) -> Self {
        Self {
            client,
            interval_secs,
            cursor,
            tx,
        }
    }

    /// Poll loop. Runs until `shutdown` broadcasts `true`.
    ///
    /// Poll failures are logged and retried on the next tick; a transient
    /// network error must not end the subscription.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = self.interval_secs, "change poller started");

        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(self.interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.poll_once().await {
                        warn!(error = %e, "change poll failed");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("change poller shutting down");
                        break;
                    }
                }
            }
        }
    }

    async fn poll_once(&mut self) -> crate::error::Result<()> {
        let changes = self.client.poll_changes(self.cursor).await?;
        if changes.cursor > self.cursor {
            self.cursor = changes.cursor;
        }
        if changes.is_empty() {
            return Ok(());
        }

        debug!(
            created = changes.created.len(),
            deleted = changes.deleted.len(),
            cursor = self.cursor,
            "changes received"
        );

        // Created before deleted, in arrival order; a record both created and
        // deleted between two polls must end up gone.
        if !changes.created.is_empty() {
            let _ = self.tx.send(RecordEvent::Created(changes.created)).await;
        }
        if !changes.deleted.is_empty() {
            let _ = self.tx.send(RecordEvent::Deleted(changes.deleted)).await;
        }
        Ok(())
    }
}
