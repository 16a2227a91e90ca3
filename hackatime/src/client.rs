use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{aggregate_projects, HackatimeURL, ProjectStats, StatsResponse};

pub struct HackatimeClient {
    base_url: HackatimeURL,
    api_key: Option<String>,
}

impl HackatimeClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: HackatimeURL::new(base_url),
            api_key,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: impl AsRef<str>,
    ) -> Result<T, HackatimeFetchError> {
        let client = reqwest::Client::new();

        let mut request = client.get(url.as_ref());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| HackatimeFetchError::ResponseError(e.to_string()))?;

        if resp.status() == 401 || resp.status() == 403 {
            return Err(HackatimeFetchError::Unauthorized);
        }
        if !resp.status().is_success() {
            return Err(HackatimeFetchError::ResponseError(format!(
                "unexpected status {}",
                resp.status()
            )));
        }

        let resp_data = resp.json::<T>().await.map_err(|e| {
            HackatimeFetchError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })?;

        Ok(resp_data)
    }

    /// Fetch per-project tracked time for one user, identified by their Slack
    /// id, counting from `start_date` (RFC 3339). Rows are aggregated to one
    /// entry per project name.
    pub async fn fetch_project_stats(
        &self,
        slack_id: &str,
        start_date: &str,
    ) -> Result<Vec<ProjectStats>, HackatimeFetchError> {
        let url = self
            .base_url
            .append_path(&format!("/users/{}/stats", slack_id))
            .with_query("features", "projects")
            .with_query("start_date", start_date);
        tracing::debug!("Fetching hackatime stats from {}", url.as_ref());

        let response: StatsResponse = self.fetch(url).await?;

        if response.data.status != "ok" {
            return Err(HackatimeFetchError::NonOkStatus(response.data.status));
        }

        Ok(aggregate_projects(response.data.projects))
    }
}

#[derive(Error, Debug)]
pub enum HackatimeFetchError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
    #[error("Hackatime reported status '{0}'")]
    NonOkStatus(String),
}
