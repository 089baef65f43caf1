//! Workflow engine
//!
//! Holds the cached per-project step sequences and exposes the only legal
//! mutation entry points: status transition, assignment, and note update.
//! Every successful transition emits one `step-update` collaboration event
//! (plus `step-completed` when the target status is completed, plus
//! `progress-update` when the derived progress value changed).
//!
//! Whether step N+1 may start before step N completes is an explicit policy,
//! not an assumption: `FreeOrder` (default) allows any order, `StrictGate`
//! rejects out-of-order advancement with a typed error.

use std::collections::HashMap;

use chrono::Utc;
use tracing::info;

use pulse_common::events::FeedEvent;
use pulse_common::workflow::{Project, StepStatus};

use crate::channel::CollabPublisher;
use crate::error::{Error, Result};

/// Step ordering policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepOrderPolicy {
    /// Steps may be mutated in any order
    #[default]
    FreeOrder,
    /// A step may only advance once every earlier step is completed
    StrictGate,
}

/// Per-project workflow state machine
pub struct WorkflowEngine {
    projects: HashMap<String, Project>,
    policy: StepOrderPolicy,
    publisher: CollabPublisher,
}

impl WorkflowEngine {
    pub fn new(policy: StepOrderPolicy, publisher: CollabPublisher) -> Self {
        Self {
            projects: HashMap::new(),
            policy,
            publisher,
        }
    }

    /// Cache (or refresh) a backend-owned project copy
    pub fn load_project(&mut self, project: Project) {
        self.projects.insert(project.id.clone(), project);
    }

    /// Drop a cached project, e.g. when its view closes
    pub fn unload_project(&mut self, project_id: &str) -> Option<Project> {
        self.projects.remove(project_id)
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.get(project_id)
    }

    /// Derived progress for a cached project; recomputed on every call
    pub fn progress(&self, project_id: &str) -> Result<u8> {
        self.projects
            .get(project_id)
            .map(Project::progress)
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))
    }

    /// Transition a step to a new status
    ///
    /// Setting `completed` also stamps `completed_date`; no other field is
    /// touched implicitly.
    pub fn transition(
        &mut self,
        project_id: &str,
        step_id: &str,
        new_status: StepStatus,
        actor: &str,
    ) -> Result<()> {
        let (progress_before, progress_after, step_title) = {
            let project = self
                .projects
                .get_mut(project_id)
                .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))?;
            let progress_before = project.progress();

            let idx = project
                .steps
                .iter()
                .position(|s| s.id == step_id)
                .ok_or_else(|| Error::StepNotFound(step_id.to_string()))?;

            if matches!(new_status, StepStatus::InProgress | StepStatus::Completed) {
                check_gate(self.policy, project, idx)?;
            }

            let step = &mut project.steps[idx];
            step.status = new_status;
            if new_status == StepStatus::Completed {
                step.completed_date = Some(Utc::now().date_naive());
            }
            let step_title = step.title.clone();

            (progress_before, project.progress(), step_title)
        };

        info!(
            "step {step_id} in {project_id} -> {new_status} by {actor} \
             (progress {progress_before}% -> {progress_after}%)"
        );

        let now = Utc::now();
        self.publisher.publish(FeedEvent::StepUpdate {
            project_id: project_id.to_string(),
            step_id: step_id.to_string(),
            user_name: actor.to_string(),
            timestamp: now,
        });
        if new_status == StepStatus::Completed {
            self.publisher.publish(FeedEvent::StepCompleted {
                project_id: project_id.to_string(),
                step_id: step_id.to_string(),
                step_title,
                user_name: actor.to_string(),
                timestamp: now,
            });
        }
        if progress_after != progress_before {
            self.publisher.publish(FeedEvent::ProgressUpdate {
                project_id: project_id.to_string(),
                progress: progress_after,
                user_name: actor.to_string(),
                timestamp: now,
            });
        }
        Ok(())
    }

    /// Transition from a wire status string; unrecognized values fail with
    /// `InvalidTransition`, never coerced to a neighboring state
    pub fn transition_str(
        &mut self,
        project_id: &str,
        step_id: &str,
        status: &str,
        actor: &str,
    ) -> Result<()> {
        let status: StepStatus = status.parse().map_err(Error::InvalidTransition)?;
        self.transition(project_id, step_id, status, actor)
    }

    /// Reassign a step; emits one `step-update`
    pub fn assign(
        &mut self,
        project_id: &str,
        step_id: &str,
        assignee: &str,
        actor: &str,
    ) -> Result<()> {
        self.mutate_step(project_id, step_id, actor, |step| {
            step.assignee = assignee.to_string();
        })
    }

    /// Replace a step's notes; emits one `step-update`
    pub fn update_notes(
        &mut self,
        project_id: &str,
        step_id: &str,
        notes: Option<String>,
        actor: &str,
    ) -> Result<()> {
        self.mutate_step(project_id, step_id, actor, |step| {
            step.notes = notes;
        })
    }

    fn mutate_step(
        &mut self,
        project_id: &str,
        step_id: &str,
        actor: &str,
        apply: impl FnOnce(&mut pulse_common::workflow::WorkflowStep),
    ) -> Result<()> {
        let project = self
            .projects
            .get_mut(project_id)
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))?;
        let step = project
            .steps
            .iter_mut()
            .find(|s| s.id == step_id)
            .ok_or_else(|| Error::StepNotFound(step_id.to_string()))?;
        apply(step);

        self.publisher.publish(FeedEvent::StepUpdate {
            project_id: project_id.to_string(),
            step_id: step_id.to_string(),
            user_name: actor.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }
}

/// StrictGate: every step numbered below the target must be completed
fn check_gate(policy: StepOrderPolicy, project: &Project, target_idx: usize) -> Result<()> {
    if policy == StepOrderPolicy::FreeOrder {
        return Ok(());
    }
    let target_number = project.steps[target_idx].step_number;
    if let Some(blocking) = project
        .steps
        .iter()
        .find(|s| s.step_number < target_number && s.status != StepStatus::Completed)
    {
        return Err(Error::StepOrderViolation {
            step_id: project.steps[target_idx].id.clone(),
            blocking_step: blocking.id.clone(),
        });
    }
    Ok(())
}
