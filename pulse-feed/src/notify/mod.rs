//! Two-tier notification dispatcher
//!
//! Tier one ([`toast`]): transient toasts for urgent live activities,
//! auto-dismissed after a fixed duration. Tier two ([`collab`]): persistent
//! collaboration notifications for workflow events, dismissed one at a time
//! by explicit user action. The tiers share nothing but the event bus they
//! subscribe to.

pub mod collab;
pub mod toast;

pub use collab::{CollabNotifications, Notification, NotificationKind};
pub use toast::{Toast, ToastService};
