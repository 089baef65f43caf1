//! Demo-mode sample data
//!
//! Fabricated activity records for explicitly-requested demo sessions. This
//! generator is never a fallback for a failed fetch; the fetch path surfaces
//! its typed error and the caller opts into demo data deliberately.

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use pulse_common::activity::{Activity, ActivityKind, Priority};

const USERS: &[(&str, &str, &str)] = &[
    ("1", "John Smith", "john.smith@iacdharma.com"),
    ("2", "Sarah Johnson", "sarah.j@iacdharma.com"),
    ("3", "Mike Chen", "mike.chen@iacdharma.com"),
    ("4", "Emily Davis", "emily.d@iacdharma.com"),
];

const PROJECTS: &[(&str, &str)] = &[
    ("proj-1", "E-commerce Platform Migration"),
    ("proj-2", "Data Analytics Pipeline"),
    ("proj-3", "Microservices Architecture"),
];

/// Generate `count` plausible activities spread over the last 24 hours,
/// sorted by timestamp descending
pub fn generate_activities(count: usize) -> Vec<Activity> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let mut activities = Vec::with_capacity(count);

    for i in 0..count {
        let (user_id, user_name, user_email) = *USERS
            .choose(&mut rng)
            .unwrap_or(&USERS[0]);
        let (project_id, project_name) = *PROJECTS
            .choose(&mut rng)
            .unwrap_or(&PROJECTS[0]);
        let minutes_ago = rng.gen_range(0..1440);

        let (kind, title, description, priority) = template(&mut rng, user_name, project_name);

        let step_number: u32 = rng.gen_range(1..=6);
        let asset_count: u32 = rng.gen_range(1..=10);
        let mut metadata = serde_json::Map::new();
        metadata.insert("stepNumber".to_string(), step_number.into());
        metadata.insert("assetCount".to_string(), asset_count.into());

        activities.push(Activity {
            id: format!("activity-{i}"),
            kind,
            title: title.to_string(),
            description,
            project_id: Some(project_id.to_string()),
            project_name: Some(project_name.to_string()),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            user_email: user_email.to_string(),
            timestamp: now - Duration::minutes(minutes_ago),
            priority,
            metadata,
        });
    }

    activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    activities
}

fn template(
    rng: &mut impl Rng,
    user: &str,
    project: &str,
) -> (ActivityKind, &'static str, String, Priority) {
    match rng.gen_range(0..8) {
        0 => (
            ActivityKind::ProjectCreated,
            "New Project Created",
            format!("{user} created project \"{project}\""),
            Priority::High,
        ),
        1 => (
            ActivityKind::StepCompleted,
            "Step Completed",
            format!("{user} completed \"Requirements Gathering\" in {project}"),
            Priority::Medium,
        ),
        2 => (
            ActivityKind::AssetLinked,
            "Assets Linked",
            format!("{user} linked 3 Terraform templates to {project}"),
            Priority::Low,
        ),
        3 => (
            ActivityKind::ApprovalGranted,
            "Approval Granted",
            format!("{user} approved deployment for {project}"),
            Priority::High,
        ),
        4 => (
            ActivityKind::MilestoneReached,
            "Milestone Reached",
            format!("{project} reached 50% completion"),
            Priority::High,
        ),
        5 => (
            ActivityKind::RiskIdentified,
            "Risk Identified",
            format!("Potential security vulnerability detected in {project}"),
            Priority::Critical,
        ),
        6 => (
            ActivityKind::CommentAdded,
            "Comment Added",
            format!("{user} commented on \"Design Architecture\" step"),
            Priority::Low,
        ),
        _ => (
            ActivityKind::PdfExported,
            "Report Exported",
            format!("{user} exported project report for {project}"),
            Priority::Low,
        ),
    }
}
