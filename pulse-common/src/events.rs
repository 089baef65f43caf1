//! Event types for the PULSE collaboration channel
//!
//! Provides the shared event definitions and the EventBus used by all
//! subsystem components. The same `FeedEvent` enum is carried on the wire
//! (project rooms and the global feed room) and on the in-process bus.

use chrono::{DateTime, Utc};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

use crate::activity::Activity;

/// PULSE collaboration event types
///
/// Events are broadcast via [`EventBus`] and serialized for channel
/// transmission. All events use this central enum for type safety and
/// exhaustive matching; the `type` tag matches the wire protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FeedEvent {
    /// A new activity record was produced somewhere in the system
    ///
    /// Triggers:
    /// - Activity store: insert at front, evict from tail at capacity
    /// - Transient notifications: toast when priority is high/critical
    ActivityCreated { activity: Activity },

    /// A workflow step was modified (status, assignee, or notes)
    ///
    /// Triggers:
    /// - Persistent notifications: append a dismissible entry
    StepUpdate {
        #[serde(rename = "projectId")]
        project_id: String,
        #[serde(rename = "stepId")]
        step_id: String,
        #[serde(rename = "userName")]
        user_name: String,
        timestamp: DateTime<Utc>,
    },

    /// A workflow step reached `completed`
    ///
    /// Carries the step title so observers can render the completion
    /// message without refetching the project.
    StepCompleted {
        #[serde(rename = "projectId")]
        project_id: String,
        #[serde(rename = "stepId")]
        step_id: String,
        #[serde(rename = "stepTitle")]
        step_title: String,
        #[serde(rename = "userName")]
        user_name: String,
        timestamp: DateTime<Utc>,
    },

    /// A project's derived progress value changed
    ProgressUpdate {
        #[serde(rename = "projectId")]
        project_id: String,
        progress: u8,
        #[serde(rename = "userName")]
        user_name: String,
        timestamp: DateTime<Utc>,
    },
}

impl FeedEvent {
    /// Get event type as string for filtering and logging
    pub fn event_type(&self) -> &'static str {
        match self {
            FeedEvent::ActivityCreated { .. } => "activity-created",
            FeedEvent::StepUpdate { .. } => "step-update",
            FeedEvent::StepCompleted { .. } => "step-completed",
            FeedEvent::ProgressUpdate { .. } => "progress-update",
        }
    }

    /// Project the event is scoped to, if any
    pub fn project_id(&self) -> Option<&str> {
        match self {
            FeedEvent::ActivityCreated { activity } => activity.project_id.as_deref(),
            FeedEvent::StepUpdate { project_id, .. }
            | FeedEvent::StepCompleted { project_id, .. }
            | FeedEvent::ProgressUpdate { project_id, .. } => Some(project_id),
        }
    }
}

/// Control messages sent by the client to manage room membership
///
/// Exactly one of the join/leave pairs is active at a time per subscription
/// instance: either a project-scoped room or the global activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RoomRequest {
    JoinProject {
        #[serde(rename = "projectId")]
        project_id: String,
    },
    LeaveProject {
        #[serde(rename = "projectId")]
        project_id: String,
    },
    JoinActivityFeed,
    LeaveActivityFeed,
}

/// Central event distribution bus for subsystem-wide events
///
/// Uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<FeedEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the specified channel capacity
    ///
    /// Events beyond capacity are dropped for lagging subscribers.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.tx.subscribe()
    }

    /// Subscribe as a `Stream`, skipping over lag gaps
    ///
    /// A subscriber that falls behind logs the lag and continues with the
    /// next available event rather than terminating the stream.
    pub fn subscribe_stream(&self) -> impl Stream<Item = FeedEvent> {
        let rx = self.tx.subscribe();
        BroadcastStream::new(rx).filter_map(|result| async move {
            match result {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!("event bus subscriber lagged: {:?}", e);
                    None
                }
            }
        })
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: FeedEvent,
    ) -> Result<usize, broadcast::error::SendError<FeedEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: FeedEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityKind, Priority};

    fn activity() -> Activity {
        Activity {
            id: "activity-1".to_string(),
            kind: ActivityKind::RiskIdentified,
            title: "Risk Identified".to_string(),
            description: "Potential security vulnerability detected".to_string(),
            project_id: Some("PRJ-002".to_string()),
            project_name: Some("Data Analytics Pipeline".to_string()),
            user_id: "3".to_string(),
            user_name: "Mike Chen".to_string(),
            user_email: "mike.chen@example.com".to_string(),
            timestamp: Utc::now(),
            priority: Priority::Critical,
            metadata: serde_json::Map::new(),
        }
    }

    #[test]
    fn events_carry_their_wire_tag() {
        let event = FeedEvent::ActivityCreated { activity: activity() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "activity-created");
        assert_eq!(json["activity"]["projectId"], "PRJ-002");
        assert_eq!(json["activity"]["type"], "risk_identified");

        let back: FeedEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.event_type(), "activity-created");
        assert_eq!(back.project_id(), Some("PRJ-002"));
    }

    #[test]
    fn room_requests_match_the_control_protocol() {
        let join = RoomRequest::JoinProject { project_id: "PRJ-001".to_string() };
        let json = serde_json::to_value(&join).unwrap();
        assert_eq!(json["type"], "join-project");
        assert_eq!(json["projectId"], "PRJ-001");

        let global = serde_json::to_value(RoomRequest::JoinActivityFeed).unwrap();
        assert_eq!(global["type"], "join-activity-feed");
    }

    #[tokio::test]
    async fn bus_delivers_to_all_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        let event = FeedEvent::StepUpdate {
            project_id: "PRJ-001".to_string(),
            step_id: "ea-project".to_string(),
            user_name: "Sarah Johnson".to_string(),
            timestamp: Utc::now(),
        };
        let delivered = bus.emit(event.clone()).unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(rx1.recv().await.unwrap(), event);
        assert_eq!(rx2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn subscribe_stream_yields_events_in_order() {
        use futures::StreamExt;

        let bus = EventBus::new(16);
        let mut stream = Box::pin(bus.subscribe_stream());

        bus.emit_lossy(FeedEvent::ActivityCreated { activity: activity() });
        bus.emit_lossy(FeedEvent::ProgressUpdate {
            project_id: "PRJ-002".to_string(),
            progress: 50,
            user_name: "Mike Chen".to_string(),
            timestamp: Utc::now(),
        });

        assert_eq!(stream.next().await.unwrap().event_type(), "activity-created");
        assert_eq!(stream.next().await.unwrap().event_type(), "progress-update");
    }

    #[tokio::test]
    async fn emit_lossy_without_subscribers_is_ok() {
        let bus = EventBus::new(4);
        bus.emit_lossy(FeedEvent::ActivityCreated { activity: activity() });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
