//! # PULSE Common Library
//!
//! Shared code for the PULSE workflow collaboration subsystem including:
//! - Activity and workflow data model
//! - Event types (FeedEvent enum) and EventBus
//! - Channel control messages
//! - Configuration loading
//! - Error types

pub mod activity;
pub mod config;
pub mod error;
pub mod events;
pub mod workflow;

pub use activity::{Activity, ActivityKind, Priority};
pub use error::{Error, Result};
pub use workflow::{Project, ProjectStatus, StepStatus, WorkflowStep};
