//! Pure filter/search engine over activity snapshots
//!
//! Stateless: re-evaluated whenever the store, filter, or search term
//! changes. Structural predicates are conjunctive; the search query is a
//! final gate, disjunctive across the text fields of records that already
//! passed every active predicate.

use chrono::{DateTime, Utc};

use pulse_common::activity::{Activity, ActivityKind, Priority};

/// Optional predicate bag; an empty list or `None` deactivates a predicate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityFilter {
    pub project_ids: Vec<String>,
    pub kinds: Vec<ActivityKind>,
    pub priorities: Vec<Priority>,
    pub user_ids: Vec<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl ActivityFilter {
    /// True when no predicate is active
    pub fn is_empty(&self) -> bool {
        self.project_ids.is_empty()
            && self.kinds.is_empty()
            && self.priorities.is_empty()
            && self.user_ids.is_empty()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }
}

/// Decide whether one record passes the filter and search query
///
/// Steps 1-6 are conjunctive rejections; a non-empty query then accepts only
/// records with a case-insensitive substring match in any of title,
/// description, user name, or project name.
pub fn matches(activity: &Activity, filter: &ActivityFilter, query: &str) -> bool {
    if !filter.project_ids.is_empty() {
        match &activity.project_id {
            Some(id) if filter.project_ids.contains(id) => {}
            _ => return false,
        }
    }

    if !filter.kinds.is_empty() && !filter.kinds.contains(&activity.kind) {
        return false;
    }

    if !filter.priorities.is_empty() && !filter.priorities.contains(&activity.priority) {
        return false;
    }

    if !filter.user_ids.is_empty() && !filter.user_ids.contains(&activity.user_id) {
        return false;
    }

    if let Some(from) = filter.date_from {
        if activity.timestamp < from {
            return false;
        }
    }

    if let Some(to) = filter.date_to {
        if activity.timestamp > to {
            return false;
        }
    }

    if !query.is_empty() {
        let query = query.to_lowercase();
        return activity.title.to_lowercase().contains(&query)
            || activity.description.to_lowercase().contains(&query)
            || activity.user_name.to_lowercase().contains(&query)
            || activity
                .project_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&query));
    }

    true
}

/// Filter a snapshot, preserving its order
pub fn apply(records: &[Activity], filter: &ActivityFilter, query: &str) -> Vec<Activity> {
    records
        .iter()
        .filter(|a| matches(a, filter, query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn activity() -> Activity {
        Activity {
            id: "activity-1".to_string(),
            kind: ActivityKind::StepCompleted,
            title: "Step Completed".to_string(),
            description: "John Smith completed \"Requirements Gathering\"".to_string(),
            project_id: Some("PRJ-001".to_string()),
            project_name: Some("E-commerce Platform Migration".to_string()),
            user_id: "1".to_string(),
            user_name: "John Smith".to_string(),
            user_email: "john.smith@example.com".to_string(),
            timestamp: Utc.timestamp_opt(1_000_000, 0).unwrap(),
            priority: Priority::Medium,
            metadata: serde_json::Map::new(),
        }
    }

    #[test]
    fn empty_filter_and_query_accepts_everything() {
        assert!(matches(&activity(), &ActivityFilter::default(), ""));
    }

    #[test]
    fn project_filter_rejects_non_members_and_absent_project() {
        let filter = ActivityFilter {
            project_ids: vec!["PRJ-002".to_string()],
            ..Default::default()
        };
        assert!(!matches(&activity(), &filter, ""));

        let mut unscoped = activity();
        unscoped.project_id = None;
        assert!(!matches(&unscoped, &filter, ""));

        let filter = ActivityFilter {
            project_ids: vec!["PRJ-001".to_string(), "PRJ-002".to_string()],
            ..Default::default()
        };
        assert!(matches(&activity(), &filter, ""));
    }

    #[test]
    fn predicates_are_conjunctive() {
        // Passes project but fails priority: rejected
        let filter = ActivityFilter {
            project_ids: vec!["PRJ-001".to_string()],
            priorities: vec![Priority::Critical],
            ..Default::default()
        };
        assert!(!matches(&activity(), &filter, ""));

        // All active predicates satisfied: accepted
        let filter = ActivityFilter {
            project_ids: vec!["PRJ-001".to_string()],
            kinds: vec![ActivityKind::StepCompleted],
            priorities: vec![Priority::Medium],
            user_ids: vec!["1".to_string()],
            ..Default::default()
        };
        assert!(matches(&activity(), &filter, ""));
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let ts = Utc.timestamp_opt(1_000_000, 0).unwrap();
        let filter = ActivityFilter {
            date_from: Some(ts),
            date_to: Some(ts),
            ..Default::default()
        };
        assert!(matches(&activity(), &filter, ""));

        let filter = ActivityFilter {
            date_from: Some(ts + chrono::Duration::seconds(1)),
            ..Default::default()
        };
        assert!(!matches(&activity(), &filter, ""));

        let filter = ActivityFilter {
            date_to: Some(ts - chrono::Duration::seconds(1)),
            ..Default::default()
        };
        assert!(!matches(&activity(), &filter, ""));
    }

    #[test]
    fn search_is_case_insensitive_and_disjunctive_across_fields() {
        let filter = ActivityFilter::default();
        assert!(matches(&activity(), &filter, "step completed")); // title
        assert!(matches(&activity(), &filter, "requirements")); // description
        assert!(matches(&activity(), &filter, "john")); // user name
        assert!(matches(&activity(), &filter, "e-COMMERCE")); // project name
        assert!(!matches(&activity(), &filter, "kubernetes"));
    }

    #[test]
    fn search_does_not_bypass_structural_filters() {
        let filter = ActivityFilter {
            priorities: vec![Priority::Critical],
            ..Default::default()
        };
        // Query matches the title, but the record fails the priority filter
        assert!(!matches(&activity(), &filter, "step completed"));
    }

    #[test]
    fn search_handles_absent_project_name() {
        let mut a = activity();
        a.project_name = None;
        assert!(!matches(&a, &ActivityFilter::default(), "e-commerce"));
        assert!(matches(&a, &ActivityFilter::default(), "john"));
    }

    #[test]
    fn apply_preserves_snapshot_order() {
        let mut a = activity();
        a.id = "first".to_string();
        let mut b = activity();
        b.id = "second".to_string();
        b.priority = Priority::Critical;
        let mut c = activity();
        c.id = "third".to_string();

        let filter = ActivityFilter::default();
        let out = apply(&[a, b, c], &filter, "");
        let ids: Vec<_> = out.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);

        let urgent = ActivityFilter {
            priorities: vec![Priority::Critical],
            ..Default::default()
        };
        let out = apply(&out, &urgent, "");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "second");
    }
}
