//! Workflow data model
//!
//! Projects and their ordered workflow steps are owned by the backend; the
//! client holds a cached copy per open project. Progress is always derived
//! from the step list, never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status of a single workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in-progress",
            StepStatus::Completed => "completed",
            StepStatus::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepStatus {
    type Err = String;

    /// Parses a wire status string; unrecognized values are returned to the
    /// caller verbatim so the workflow engine can report them in its
    /// `InvalidTransition` error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(StepStatus::Pending),
            "in-progress" => Ok(StepStatus::InProgress),
            "completed" => Ok(StepStatus::Completed),
            "blocked" => Ok(StepStatus::Blocked),
            other => Err(other.to_string()),
        }
    }
}

/// Overall project status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Active,
    Completed,
    OnHold,
}

/// One stage of a project's pipeline
///
/// `step_number` defines display order only; whether it also gates execution
/// order is a workflow engine policy, not a property of the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: String,
    pub title: String,
    pub description: String,
    pub step_number: u32,
    pub status: StepStatus,
    pub owner_team: String,
    pub assignee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Cached project with its ordered step sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_date: NaiveDate,
    pub target_date: NaiveDate,
    pub status: ProjectStatus,
    #[serde(rename = "workflowSteps")]
    pub steps: Vec<WorkflowStep>,
}

impl Project {
    /// Derived completion percentage: `round(100 * completed / total)`.
    ///
    /// Recomputed on every read; an empty step list yields 0.
    pub fn progress(&self) -> u8 {
        if self.steps.is_empty() {
            return 0;
        }
        let completed = self
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count();
        ((100.0 * completed as f64 / self.steps.len() as f64).round()) as u8
    }
}
