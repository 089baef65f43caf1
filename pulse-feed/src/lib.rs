//! # PULSE Feed Library (pulse-feed)
//!
//! Real-time workflow collaboration and activity subsystem.
//!
//! **Purpose:** Maintain a bounded, arrival-ordered activity log fed by a
//! room-scoped live event channel and a periodic historical refetch; drive a
//! per-project workflow model with derived progress; dispatch two independent
//! notification tiers; filter, search, and export the feed.
//!
//! **Architecture:** Single-runtime cooperative model. The activity store is
//! the only shared mutable state, written exclusively through its two entry
//! points. The channel client is a message-passing mailbox drained by one
//! consumer task; room membership is a scoped resource released on every
//! exit path.

pub mod channel;
pub mod engine;
pub mod error;
pub mod export;
pub mod filter;
pub mod history;
pub mod notify;
pub mod poller;
pub mod sample;
pub mod store;

pub use channel::{ChannelClient, CollabPublisher, RoomGuard, RoomScope};
pub use engine::{StepOrderPolicy, WorkflowEngine};
pub use error::{Error, Result};
pub use filter::ActivityFilter;
pub use history::HistoryClient;
pub use notify::{CollabNotifications, Notification, NotificationKind, Toast, ToastService};
pub use poller::RefreshTask;
pub use store::{ActivityStore, StoreHandle};
