//! Wire types for the Jira REST API
//!
//! Only the slices of the payloads the exporter actually consumes are
//! modeled. Issue fields stay a raw `serde_json::Value` because their shape
//! depends on the per-run field configuration.

use serde::Deserialize;

/// One page of `GET /rest/api/2/search`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "startAt")]
    pub start_at:    u32,
    #[serde(rename = "maxResults")]
    pub max_results: u32,
    pub total:       u32,
    #[serde(default)]
    pub issues:      Vec<RawIssue>,
}

/// An issue as returned by the search endpoint: its identifying attributes
/// plus the requested fields as raw JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssue {
    pub id:     String,
    pub key:    String,
    #[serde(default)]
    pub fields: serde_json::Value,
}

/// The changelog slice of `GET /rest/api/2/issue/{id}?expand=changelog`.
#[derive(Debug, Deserialize)]
pub struct IssueWithChangelog {
    #[serde(default)]
    pub changelog: Changelog,
}

#[derive(Debug, Default, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<History>,
}

/// One changelog entry: a timestamp plus the item diffs recorded at that
/// moment. Status transitions appear as items with `field == "status"`.
#[derive(Debug, Deserialize)]
pub struct History {
    pub created: String,
    #[serde(default)]
    pub items:   Vec<HistoryItem>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryItem {
    pub field:       String,
    #[serde(rename = "fromString")]
    pub from_string: Option<String>,
    #[serde(rename = "toString")]
    pub to_string:   Option<String>,
}
