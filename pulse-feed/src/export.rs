//! CSV export serializer
//!
//! Serializes a filtered activity snapshot to CSV in snapshot order. Title
//! and description are quoted with embedded quotes doubled; the remaining
//! columns carry no commas by construction and go out bare. An activity
//! without a project exports `N/A` in the project column.

use chrono::{SecondsFormat, Utc};

use pulse_common::Activity;

const HEADERS: &str = "Timestamp,Type,Priority,User,Project,Title,Description";

/// Serialize activities to CSV, preserving input order
///
/// Exactly `records.len() + 1` lines, no trailing newline.
pub fn to_csv(records: &[Activity]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(HEADERS.to_string());

    for a in records {
        lines.push(format!(
            "{},{},{},{},{},{},{}",
            a.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            a.kind.as_str(),
            a.priority,
            a.user_name,
            a.project_name.as_deref().unwrap_or("N/A"),
            quote(&a.title),
            quote(&a.description),
        ));
    }

    lines.join("\n")
}

/// Dated export filename, e.g. `activity-feed-2026-08-30.csv`
pub fn export_filename() -> String {
    format!("activity-feed-{}.csv", Utc::now().format("%Y-%m-%d"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
