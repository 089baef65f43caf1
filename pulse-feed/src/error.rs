//! Error types for pulse-feed
//!
//! Defines subsystem-specific error types using thiserror for clear error
//! propagation. Transition failures are rejected synchronously and never
//! coerced to a neighboring state; fetch and channel failures degrade the
//! feed to a read-only view rather than blocking interaction.

use thiserror::Error;

/// Main error type for the feed subsystem
#[derive(Error, Debug)]
pub enum Error {
    /// Status string not in {pending, in-progress, completed, blocked}
    #[error("Invalid transition: unrecognized status '{0}'")]
    InvalidTransition(String),

    /// Strict-gate policy refused an out-of-order step mutation
    #[error("Step order violation: step '{step_id}' cannot advance while step '{blocking_step}' is incomplete")]
    StepOrderViolation {
        step_id: String,
        blocking_step: String,
    },

    /// Project id not in the engine's cache
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Step id not present in the project's step list
    #[error("Step not found: {0}")]
    StepNotFound(String),

    /// Network-level failure on the historical fetch path
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Historical fetch returned a non-success status
    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(u16),

    /// The live channel's control queue is gone
    #[error("Event channel closed")]
    ChannelClosed,

    /// Shared error from pulse-common
    #[error(transparent)]
    Common(#[from] pulse_common::Error),
}

/// Convenience Result type using the feed Error
pub type Result<T> = std::result::Result<T, Error>;
