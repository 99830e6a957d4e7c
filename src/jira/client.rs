//! Jira REST client
//!
//! A thin wrapper around `reqwest` for the two requests the exporter needs:
//! the JQL search and the per-issue changelog expansion. Authentication is
//! HTTP basic auth with username and API token.

use std::time::Duration;

use tracing::{debug, error};

use super::model::{History, IssueWithChangelog, RawIssue, SearchResponse};
use crate::domain::ExporterError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Search pages are capped by the server; larger requests are silently
/// clamped anyway, so the client never asks for more per page.
const SEARCH_PAGE_SIZE: u32 = 100;

pub struct JiraClient {
    http:      reqwest::Client,
    base_url:  String,
    username:  String,
    api_token: String,
}

impl JiraClient {
    /// Create a client for one Jira cloud instance.
    pub fn new(domain: &str, username: &str, api_token: &str) -> Result<Self, ExporterError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ExporterError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: domain.trim_end_matches('/').to_string(),
            username: username.to_string(),
            api_token: api_token.to_string(),
        })
    }

    /// Run a JQL search and collect up to `max_results` issues, paging
    /// through the server responses as needed.
    pub async fn search_issues(
        &self,
        jql: &str,
        fields: &[String],
        max_results: u32,
    ) -> Result<Vec<RawIssue>, ExporterError> {
        let url = format!("{}/rest/api/2/search", self.base_url);
        let fields = fields.join(",");
        let mut issues: Vec<RawIssue> = Vec::new();

        loop {
            let page_size = SEARCH_PAGE_SIZE.min(max_results.saturating_sub(issues.len() as u32));
            debug!("Search request: start_at={} page_size={page_size}", issues.len());

            let start_at = issues.len().to_string();
            let max_per_page = page_size.to_string();
            let response = self
                .http
                .get(&url)
                .basic_auth(&self.username, Some(&self.api_token))
                .query(&[
                    ("jql", jql),
                    ("startAt", start_at.as_str()),
                    ("maxResults", max_per_page.as_str()),
                    ("fields", fields.as_str()),
                ])
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| {
                    error!("Jira request failed with JQL: {jql} (original message: {e})");
                    ExporterError::Network(format!("Jira request failed with JQL: {jql}"))
                })?;

            let page: SearchResponse = response.json().await?;
            let total = page.total;
            let received = page.issues.len();
            issues.extend(page.issues);

            if received == 0 || issues.len() as u32 >= max_results || issues.len() as u32 >= total {
                break;
            }
        }

        issues.truncate(max_results as usize);
        Ok(issues)
    }

    /// Fetch the changelog histories of one issue, in the order the API
    /// delivers them (most recent first).
    pub async fn changelog_histories(&self, issue_id: &str) -> Result<Vec<History>, ExporterError> {
        let url = format!("{}/rest/api/2/issue/{issue_id}", self.base_url);

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.api_token))
            .query(&[("expand", "changelog"), ("fields", "summary")])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                error!("Changelog request failed for issue {issue_id} (original message: {e})");
                ExporterError::Network(format!("changelog request failed for issue {issue_id}"))
            })?;

        let issue: IssueWithChangelog = response.json().await?;
        Ok(issue.changelog.histories)
    }
}
