//! # Jira Issue Exporter
//!
//! A library for exporting Jira issues and their workflow timestamps to CSV.
//!
//! This crate provides functionality to:
//! - Parse exporter configurations from YAML files
//! - Fetch issues from the Jira REST API using generated JQL queries
//! - Reconstruct the date each workflow category was first entered by
//!   replaying an issue's status changelog (strict Kanban semantics:
//!   backward moves revoke later entry dates)
//! - Render configured issue fields and write them as CSV records

// Public API modules
pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod jira;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use cli::{Cli, LogLevel};
pub use config::ExporterConfig;
pub use domain::{CategoryTimestamps, ExporterError, StatusTransition, Workflow};
pub use export::IssueParser;
pub use jira::JiraClient;
