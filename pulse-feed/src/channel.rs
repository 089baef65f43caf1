//! Event channel client
//!
//! Owns one live bidirectional connection, modeled as a message-passing
//! mailbox: outbound room-control requests go onto an ordered queue, inbound
//! frames are drained by a single consumer task. Room membership is a scoped
//! resource ([`RoomGuard`]) released on every exit path, including drops
//! during unwinding.
//!
//! No replay is attempted after a dropped connection; the periodic refetch
//! in [`crate::poller`] is the consistency backstop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use pulse_common::events::{EventBus, FeedEvent, RoomRequest};

use crate::error::{Error, Result};
use crate::store::StoreHandle;

/// Subscription scope: a single project room, or the global activity feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomScope {
    Project(String),
    Global,
}

impl RoomScope {
    fn join_request(&self) -> RoomRequest {
        match self {
            RoomScope::Project(id) => RoomRequest::JoinProject {
                project_id: id.clone(),
            },
            RoomScope::Global => RoomRequest::JoinActivityFeed,
        }
    }

    fn leave_request(&self) -> RoomRequest {
        match self {
            RoomScope::Project(id) => RoomRequest::LeaveProject {
                project_id: id.clone(),
            },
            RoomScope::Global => RoomRequest::LeaveActivityFeed,
        }
    }
}

/// Publishes workflow-collaboration events to local observers and outward
/// onto the channel in one call
///
/// The workflow engine emits through this so other observers of the same
/// project room see step mutations without a refetch.
#[derive(Clone)]
pub struct CollabPublisher {
    bus: Arc<EventBus>,
    outbound: mpsc::Sender<FeedEvent>,
}

impl CollabPublisher {
    pub fn new(bus: Arc<EventBus>, outbound: mpsc::Sender<FeedEvent>) -> Self {
        Self { bus, outbound }
    }

    /// Emit locally and enqueue for channel transmission
    pub fn publish(&self, event: FeedEvent) {
        self.bus.emit_lossy(event.clone());
        if let Err(e) = self.outbound.try_send(event) {
            warn!("dropping outbound collaboration event: {e}");
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}

/// Live event channel client
///
/// Holds the ordered control queue and the targets for normalized inbound
/// events: the activity store and the local event bus.
#[derive(Clone)]
pub struct ChannelClient {
    control_tx: mpsc::Sender<RoomRequest>,
    bus: Arc<EventBus>,
    store: StoreHandle,
}

impl ChannelClient {
    pub fn new(
        control_tx: mpsc::Sender<RoomRequest>,
        bus: Arc<EventBus>,
        store: StoreHandle,
    ) -> Self {
        Self {
            control_tx,
            bus,
            store,
        }
    }

    /// Join a room, returning a guard that releases membership when dropped
    pub async fn join(&self, scope: RoomScope) -> Result<RoomGuard> {
        self.control_tx
            .send(scope.join_request())
            .await
            .map_err(|_| Error::ChannelClosed)?;
        debug!("joined room scope {:?}", scope);
        Ok(RoomGuard {
            scope: Some(scope),
            control_tx: self.control_tx.clone(),
        })
    }

    /// Spawn the single consumer task draining the inbound mailbox
    ///
    /// Each raw frame is deserialized into a [`FeedEvent`] (the wire
    /// timestamp becomes a structured instant in the process). Activity
    /// records go to the store's insertion entry point; every event is then
    /// re-emitted on the local bus for the notification services. Frames
    /// that fail to parse are logged and skipped, never fatal.
    pub fn spawn_consumer(
        &self,
        mut inbound: mpsc::Receiver<serde_json::Value>,
    ) -> JoinHandle<()> {
        let store = self.store.clone();
        let bus = self.bus.clone();
        tokio::spawn(async move {
            while let Some(frame) = inbound.recv().await {
                let event: FeedEvent = match serde_json::from_value(frame) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("unparseable channel frame: {e}");
                        continue;
                    }
                };
                if let FeedEvent::ActivityCreated { activity } = &event {
                    store.insert_front(activity.clone()).await;
                }
                bus.emit_lossy(event);
            }
            debug!("channel mailbox closed, consumer exiting");
        })
    }
}

/// Scoped room membership
///
/// Exactly one room is held at a time. [`RoomGuard::switch`] leaves the
/// previous room before joining the new one on the same ordered queue, so a
/// scope change can never observe both rooms at once. Dropping the guard on
/// any exit path enqueues the matching leave request.
pub struct RoomGuard {
    scope: Option<RoomScope>,
    control_tx: mpsc::Sender<RoomRequest>,
}

impl RoomGuard {
    pub fn scope(&self) -> Option<&RoomScope> {
        self.scope.as_ref()
    }

    /// Switch scope: leave the current room, then join the new one
    pub async fn switch(&mut self, scope: RoomScope) -> Result<()> {
        if let Some(old) = self.scope.take() {
            self.control_tx
                .send(old.leave_request())
                .await
                .map_err(|_| Error::ChannelClosed)?;
        }
        self.control_tx
            .send(scope.join_request())
            .await
            .map_err(|_| Error::ChannelClosed)?;
        debug!("switched room scope to {:?}", scope);
        self.scope = Some(scope);
        Ok(())
    }

    /// Explicitly leave the room
    pub async fn leave(mut self) -> Result<()> {
        if let Some(scope) = self.scope.take() {
            self.control_tx
                .send(scope.leave_request())
                .await
                .map_err(|_| Error::ChannelClosed)?;
        }
        Ok(())
    }
}

impl Drop for RoomGuard {
    fn drop(&mut self) {
        // Release on every exit path; Drop cannot await, so enqueue without
        // blocking and log if the control queue is full or gone.
        if let Some(scope) = self.scope.take() {
            if let Err(e) = self.control_tx.try_send(scope.leave_request()) {
                warn!("failed to release room membership on drop: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(capacity: usize) -> (ChannelClient, mpsc::Receiver<RoomRequest>) {
        let (control_tx, control_rx) = mpsc::channel(capacity);
        let bus = Arc::new(EventBus::new(16));
        let store = StoreHandle::new(10);
        (ChannelClient::new(control_tx, bus, store), control_rx)
    }

    #[tokio::test]
    async fn join_sends_the_matching_control_message() {
        let (client, mut control_rx) = client(8);

        let _guard = client.join(RoomScope::Project("PRJ-001".to_string())).await.unwrap();
        assert_eq!(
            control_rx.recv().await.unwrap(),
            RoomRequest::JoinProject { project_id: "PRJ-001".to_string() }
        );
    }

    #[tokio::test]
    async fn dropping_the_guard_releases_the_room() {
        let (client, mut control_rx) = client(8);

        {
            let _guard = client.join(RoomScope::Global).await.unwrap();
            assert_eq!(control_rx.recv().await.unwrap(), RoomRequest::JoinActivityFeed);
        }

        assert_eq!(control_rx.recv().await.unwrap(), RoomRequest::LeaveActivityFeed);
    }

    #[tokio::test]
    async fn switch_leaves_before_joining() {
        let (client, mut control_rx) = client(8);

        let mut guard = client.join(RoomScope::Project("P1".to_string())).await.unwrap();
        guard.switch(RoomScope::Project("P2".to_string())).await.unwrap();

        assert_eq!(
            control_rx.recv().await.unwrap(),
            RoomRequest::JoinProject { project_id: "P1".to_string() }
        );
        assert_eq!(
            control_rx.recv().await.unwrap(),
            RoomRequest::LeaveProject { project_id: "P1".to_string() }
        );
        assert_eq!(
            control_rx.recv().await.unwrap(),
            RoomRequest::JoinProject { project_id: "P2".to_string() }
        );
        assert_eq!(guard.scope(), Some(&RoomScope::Project("P2".to_string())));
    }

    #[tokio::test]
    async fn explicit_leave_does_not_double_release() {
        let (client, mut control_rx) = client(8);

        let guard = client.join(RoomScope::Project("P1".to_string())).await.unwrap();
        guard.leave().await.unwrap();

        assert_eq!(
            control_rx.recv().await.unwrap(),
            RoomRequest::JoinProject { project_id: "P1".to_string() }
        );
        assert_eq!(
            control_rx.recv().await.unwrap(),
            RoomRequest::LeaveProject { project_id: "P1".to_string() }
        );
        // No further message pending
        assert!(control_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn join_on_closed_channel_is_a_typed_error() {
        let (client, control_rx) = client(8);
        drop(control_rx);
        let result = client.join(RoomScope::Global).await;
        assert!(matches!(result, Err(Error::ChannelClosed)));
    }
}
