//! Activity feed data model
//!
//! An [`Activity`] is an immutable record of something that happened in the
//! system. Records arrive either via the bulk historical fetch or as a single
//! live channel push; once constructed they are never mutated, only evicted
//! from the bounded store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of activity kinds.
///
/// The original system keyed icon/color lookups off free-form strings; here
/// the set is a closed enum so adding a kind is a compile-checked change
/// (every `match` below must be extended).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    ProjectCreated,
    ProjectUpdated,
    StepStarted,
    StepCompleted,
    StepBlocked,
    AssetLinked,
    AssetRemoved,
    UserJoined,
    UserLeft,
    CommentAdded,
    ApprovalRequested,
    ApprovalGranted,
    ApprovalDenied,
    PdfExported,
    MilestoneReached,
    DeadlineApproaching,
    RiskIdentified,
}

impl ActivityKind {
    /// Wire identifier, also used in CSV export
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::ProjectCreated => "project_created",
            ActivityKind::ProjectUpdated => "project_updated",
            ActivityKind::StepStarted => "step_started",
            ActivityKind::StepCompleted => "step_completed",
            ActivityKind::StepBlocked => "step_blocked",
            ActivityKind::AssetLinked => "asset_linked",
            ActivityKind::AssetRemoved => "asset_removed",
            ActivityKind::UserJoined => "user_joined",
            ActivityKind::UserLeft => "user_left",
            ActivityKind::CommentAdded => "comment_added",
            ActivityKind::ApprovalRequested => "approval_requested",
            ActivityKind::ApprovalGranted => "approval_granted",
            ActivityKind::ApprovalDenied => "approval_denied",
            ActivityKind::PdfExported => "pdf_exported",
            ActivityKind::MilestoneReached => "milestone_reached",
            ActivityKind::DeadlineApproaching => "deadline_approaching",
            ActivityKind::RiskIdentified => "risk_identified",
        }
    }

    /// Human-readable label for display surfaces
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::ProjectCreated => "Project Created",
            ActivityKind::ProjectUpdated => "Project Updated",
            ActivityKind::StepStarted => "Step Started",
            ActivityKind::StepCompleted => "Step Completed",
            ActivityKind::StepBlocked => "Step Blocked",
            ActivityKind::AssetLinked => "Assets Linked",
            ActivityKind::AssetRemoved => "Assets Removed",
            ActivityKind::UserJoined => "User Joined",
            ActivityKind::UserLeft => "User Left",
            ActivityKind::CommentAdded => "Comment Added",
            ActivityKind::ApprovalRequested => "Approval Requested",
            ActivityKind::ApprovalGranted => "Approval Granted",
            ActivityKind::ApprovalDenied => "Approval Denied",
            ActivityKind::PdfExported => "Report Exported",
            ActivityKind::MilestoneReached => "Milestone Reached",
            ActivityKind::DeadlineApproaching => "Deadline Approaching",
            ActivityKind::RiskIdentified => "Risk Identified",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity priority, ordered Low < Medium < High < Critical
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Whether this priority warrants a transient toast notification
    pub fn is_urgent(&self) -> bool {
        matches!(self, Priority::High | Priority::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable activity record shown in the feed
///
/// The wire format carries the timestamp as an RFC 3339 string; serde
/// deserializes it into a structured `DateTime<Utc>` so all downstream
/// comparisons (filtering, sorting) operate on instants, not strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub timestamp: DateTime<Utc>,
    pub priority: Priority,
    /// Opaque key/value bag attached by the producer
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}
