//! Transient toast notifications
//!
//! Live activities at high or critical priority surface a toast that
//! auto-dismisses after a fixed duration. Activities at lower priorities,
//! and records arriving via the bulk historical load, never toast.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use pulse_common::activity::{Activity, Priority};
use pulse_common::events::{EventBus, FeedEvent};

/// One visible toast
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

/// Transient toast tier
#[derive(Clone)]
pub struct ToastService {
    visible: Arc<Mutex<Vec<Toast>>>,
    duration: Duration,
}

impl ToastService {
    pub fn new(duration: Duration) -> Self {
        Self {
            visible: Arc::new(Mutex::new(Vec::new())),
            duration,
        }
    }

    /// Offer a live activity; only urgent priorities produce a toast
    ///
    /// Returns the id of the scheduled toast, or `None` when the activity
    /// was below the urgency threshold.
    pub async fn offer(&self, activity: &Activity) -> Option<Uuid> {
        if !activity.priority.is_urgent() {
            return None;
        }
        let toast = Toast {
            id: Uuid::new_v4(),
            title: activity.title.clone(),
            description: activity.description.clone(),
            priority: activity.priority,
        };
        let id = toast.id;
        self.visible.lock().await.push(toast);
        self.schedule_dismiss(id);
        Some(id)
    }

    fn schedule_dismiss(&self, id: Uuid) {
        let visible = self.visible.clone();
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            visible.lock().await.retain(|t| t.id != id);
            debug!("toast {id} auto-dismissed");
        });
    }

    /// Currently visible toasts, oldest first
    pub async fn visible(&self) -> Vec<Toast> {
        self.visible.lock().await.clone()
    }

    /// Subscribe to the bus and toast urgent live activities until the bus
    /// has no senders left
    pub fn run(&self, bus: &EventBus) -> JoinHandle<()> {
        let service = self.clone();
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(FeedEvent::ActivityCreated { activity }) => {
                        service.offer(&activity).await;
                    }
                    Ok(_) => {}
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!("toast subscriber lagged by {n} events");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
