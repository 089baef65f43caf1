//! Historical activity fetch
//!
//! Thin HTTP client for the backend activity endpoint. Failures are typed
//! and surfaced to the caller; there is no silent fallback to fabricated
//! data (see [`crate::sample`] for the explicit demo path).

use std::time::Duration;

use tracing::debug;

use pulse_common::Activity;

use crate::error::{Error, Result};

/// Client for the backend's historical activity endpoint
#[derive(Clone)]
pub struct HistoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HistoryClient {
    /// Build a client against the configured API base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(Error::Fetch)?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch recent activities, optionally scoped to one project
    ///
    /// Network failures map to [`Error::Fetch`], non-success responses to
    /// [`Error::UnexpectedStatus`]. The caller decides what the user sees;
    /// this layer never substitutes data.
    pub async fn recent_activities(
        &self,
        project_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Activity>> {
        let url = format!("{}/workflow/activities", self.base_url);
        let mut request = self.http.get(&url).query(&[("limit", limit.to_string())]);
        if let Some(id) = project_id {
            request = request.query(&[("projectId", id)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus(status.as_u16()));
        }

        let activities: Vec<Activity> = response.json().await?;
        debug!("fetched {} historical activities", activities.len());
        Ok(activities)
    }
}
