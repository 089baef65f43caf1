//! Persistent collaboration notifications
//!
//! Workflow events observed on the bus accumulate as dismissible
//! notifications. Nothing here expires on a timer; each entry stays until
//! the user dismisses it by id.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use pulse_common::events::{EventBus, FeedEvent};

/// Which workflow event produced a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    StepUpdate,
    StepCompleted,
    ProgressUpdate,
}

/// One persistent, dismissible notification
///
/// `user_name` is carried separately from `message` so display surfaces
/// can render the actor on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub project_id: String,
    pub user_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Persistent notification tier
#[derive(Clone, Default)]
pub struct CollabNotifications {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl CollabNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a workflow event; activity-created events are not this tier's
    /// concern and are ignored
    pub async fn push_event(&self, event: &FeedEvent) -> Option<Uuid> {
        let (kind, project_id, user_name, message, timestamp) = match event {
            FeedEvent::StepUpdate {
                project_id,
                user_name,
                timestamp,
                ..
            } => (
                NotificationKind::StepUpdate,
                project_id,
                user_name,
                format!("{user_name} updated a workflow step"),
                *timestamp,
            ),
            FeedEvent::StepCompleted {
                project_id,
                step_title,
                user_name,
                timestamp,
                ..
            } => (
                NotificationKind::StepCompleted,
                project_id,
                user_name,
                format!("{user_name} completed \"{step_title}\""),
                *timestamp,
            ),
            FeedEvent::ProgressUpdate {
                project_id,
                progress,
                user_name,
                timestamp,
            } => (
                NotificationKind::ProgressUpdate,
                project_id,
                user_name,
                format!("Project progress is now {progress}%"),
                *timestamp,
            ),
            FeedEvent::ActivityCreated { .. } => return None,
        };

        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            project_id: project_id.clone(),
            user_name: user_name.clone(),
            message,
            timestamp,
        };
        let id = notification.id;
        self.entries.lock().await.push(notification);
        Some(id)
    }

    /// Dismiss exactly one notification; unknown ids are a no-op
    pub async fn clear(&self, id: Uuid) {
        self.entries.lock().await.retain(|n| n.id != id);
    }

    /// Dismiss everything at once
    pub async fn clear_all(&self) {
        self.entries.lock().await.clear();
    }

    /// Current notifications, oldest first
    pub async fn list(&self) -> Vec<Notification> {
        self.entries.lock().await.clone()
    }

    /// Subscribe to the bus and accumulate workflow notifications until the
    /// bus has no senders left
    pub fn run(&self, bus: &EventBus) -> JoinHandle<()> {
        let service = self.clone();
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        service.push_event(&event).await;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!("notification subscriber lagged by {n} events");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
