//! Jira REST API boundary

pub mod client;
pub mod model;

pub use client::JiraClient;
pub use model::{History, HistoryItem, RawIssue};
