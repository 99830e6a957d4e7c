//! Issue parsing
//!
//! Turns fetched raw issues into CSV records: renders every exported field
//! to its cell value and, when a workflow is configured, replays the issue's
//! status changelog into category entry timestamps.
//!
//! The column layout is derived from the configuration alone, so every run
//! with the same configuration produces the same header regardless of which
//! issues happen to be in the result set.

use serde_json::Value;
use tracing::debug;

use super::value;
use crate::{
    config::{ExporterConfig, FieldKind},
    domain::{CategoryTimestamps, ExporterError, StatusTransition, Workflow},
    jira::{JiraClient, RawIssue},
    ui,
    utils::date,
};

/// The CSV header, in configuration order: standard fields, custom fields,
/// then one column per workflow category.
///
/// Key and ID stay unprefixed; user fields get a second `<name> ID` column;
/// the Flagged field counts as standard for naming purposes.
pub fn csv_columns(config: &ExporterConfig) -> Vec<String> {
    let mut columns = Vec::new();

    for field in config.fields().exported() {
        match field.kind {
            FieldKind::Key | FieldKind::Id => columns.push(field.name.clone()),
            FieldKind::Reporter | FieldKind::Assignee => {
                let base = format!("{}{}", config.standard_field_prefix(), field.name);
                columns.push(base.clone());
                columns.push(format!("{base} ID"));
            }
            FieldKind::Custom => columns.push(format!("{}{}", config.custom_field_prefix(), field.name)),
            _ => columns.push(format!("{}{}", config.standard_field_prefix(), field.name)),
        }
    }

    if config.has_workflow() {
        if let Some(workflow) = config.workflow() {
            for category in workflow.categories() {
                columns.push(format!("{}{category}", config.status_category_prefix()));
            }
        }
    }

    columns
}

/// Render one issue into a record aligned with [`csv_columns`].
pub fn csv_row(
    config: &ExporterConfig,
    issue: &RawIssue,
    timestamps: Option<&CategoryTimestamps>,
) -> Result<Vec<String>, ExporterError> {
    let mut row = Vec::new();
    let separator = config.decimal_separator();

    for field in config.fields().exported() {
        let raw = issue.fields.get(&field.id);
        match field.kind {
            FieldKind::Key => row.push(issue.key.clone()),
            FieldKind::Id => row.push(issue.id.clone()),
            FieldKind::Reporter | FieldKind::Assignee => {
                row.push(value::user_display_name(raw));
                row.push(value::user_account_id(raw));
            }
            FieldKind::IssueType | FieldKind::Status | FieldKind::Priority | FieldKind::Resolution => {
                row.push(value::id_name(raw));
            }
            FieldKind::Summary => row.push(value::text(raw)),
            FieldKind::Parent => row.push(value::parent_key(raw)),
            FieldKind::Created => row.push(required_date(config, issue, raw)?),
            FieldKind::Updated | FieldKind::Resolved | FieldKind::DueDate => {
                row.push(optional_date(config, raw)?);
            }
            FieldKind::Labels => row.push(value::string_array(raw)),
            FieldKind::Components | FieldKind::AffectedVersions | FieldKind::FixedVersions => {
                row.push(value::named_array(raw));
            }
            FieldKind::Flagged => row.push(value::flagged(raw)),
            FieldKind::Custom => row.push(value::custom(raw, separator)),
        }
    }

    if config.has_workflow() {
        if let Some(timestamps) = timestamps {
            for (_, entry_date) in timestamps.iter() {
                row.push(entry_date.unwrap_or("").to_string());
            }
        }
    }

    Ok(row)
}

fn required_date(config: &ExporterConfig, issue: &RawIssue, raw: Option<&Value>) -> Result<String, ExporterError> {
    let rendered = value::text(raw);
    if rendered.is_empty() {
        return Err(ExporterError::Validation(format!("issue {} has no creation date", issue.key)));
    }
    date::zoned_date(&rendered, config.time_zone())
}

fn optional_date(config: &ExporterConfig, raw: Option<&Value>) -> Result<String, ExporterError> {
    let rendered = value::text(raw);
    if rendered.is_empty() {
        return Ok(String::new());
    }
    date::zoned_date(&rendered, config.time_zone())
}

/// Fetches issues and their changelogs and assembles the export records.
pub struct IssueParser<'a> {
    config: &'a ExporterConfig,
    client: &'a JiraClient,
}

impl<'a> IssueParser<'a> {
    pub fn new(config: &'a ExporterConfig, client: &'a JiraClient) -> Self {
        Self { config, client }
    }

    /// Run the configured JQL search.
    pub async fn fetch_issues(&self) -> Result<Vec<RawIssue>, ExporterError> {
        debug!("Starting to fetch issues from Jira.");

        let mut fields = self.config.fields().fields_to_fetch();
        // The creation date feeds the workflow replay even when the Created
        // column itself is disabled.
        if self.config.has_workflow() && !fields.iter().any(|field| field == "created") {
            fields.push("created".to_string());
        }

        let issues = self
            .client
            .search_issues(self.config.jql_query(), &fields, self.config.max_results())
            .await?;

        tracing::info!("Issues successfully fetched: {}", issues.len());
        Ok(issues)
    }

    /// Parse all fetched issues into CSV records, driving the progress bar.
    pub async fn parse_issues(&self, issues: &[RawIssue]) -> Result<Vec<Vec<String>>, ExporterError> {
        debug!("Starting to parse issues.");

        let bar = ui::progress::parse_bar(issues.len() as u64);
        let mut records = Vec::with_capacity(issues.len());

        for issue in issues {
            let summary = value::text(issue.fields.get("summary"));
            bar.set_message(format!("{} ({}): {summary}", issue.key, issue.id));
            debug!("Start parsing issue {} ({}).", issue.key, issue.id);

            let timestamps = match self.config.workflow() {
                Some(workflow) if self.config.has_workflow() => Some(self.replay_changelog(issue, workflow).await?),
                _ => None,
            };

            records.push(csv_row(self.config, issue, timestamps.as_ref())?);
            bar.inc(1);
        }

        bar.finish_and_clear();
        debug!("All issues parsed.");
        Ok(records)
    }

    /// Fetch one issue's changelog and replay it into category timestamps.
    async fn replay_changelog(&self, issue: &RawIssue, workflow: &Workflow) -> Result<CategoryTimestamps, ExporterError> {
        let created = value::text(issue.fields.get("created"));
        if created.is_empty() {
            return Err(ExporterError::Validation(format!("issue {} has no creation date", issue.key)));
        }
        let creation_date = date::zoned_date(&created, self.config.time_zone())?;

        let histories = self.client.changelog_histories(&issue.id).await?;
        let mut transitions = Vec::new();

        // Histories arrive most recent first; the replay reverses them.
        for history in &histories {
            for item in &history.items {
                if item.field != "status" {
                    continue;
                }
                let from_status = item.from_string.as_deref().ok_or_else(|| {
                    ExporterError::Validation(format!("issue {} has a status transition without origin", issue.key))
                })?;
                let to_status = item.to_string.as_deref().ok_or_else(|| {
                    ExporterError::Validation(format!("issue {} has a status transition without destination", issue.key))
                })?;
                let occurred_at = date::zoned_date(&history.created, self.config.time_zone())?;
                transitions.push(StatusTransition::new(from_status, to_status, &occurred_at));
            }
        }

        workflow.category_timestamps(&creation_date, &transitions)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const CONFIG: &str = r#"
Search Criteria:
  Projects: ["PKEY"]
Standard Issue Fields:
  Summary: true
  Reporter: true
  Labels: true
  Flagged: true
  Created: true
  Resolved: true
Custom Issue Fields:
  Team: customfield_10018
Workflow:
  To Do: ["Open"]
  In Progress: ["Doing"]
  Done: ["Closed"]
Mandatory:
  Flagged Field ID: customfield_10021
  Decimal Separator: Comma
Misc:
  Custom Field Prefix: "CF "
  Status Category Prefix: "Status "
"#;

    fn sample_issue() -> RawIssue {
        RawIssue {
            id:     "10001".to_string(),
            key:    "PKEY-1".to_string(),
            fields: json!({
                "summary": "Fix the flux capacitor",
                "created": "2023-01-10T08:00:00.000+0000",
                "resolutiondate": null,
                "reporter": {"accountId": "abc123", "displayName": "Jane Doe"},
                "labels": ["backend", "urgent"],
                "customfield_10021": null,
                "customfield_10018": {"value": "Avengers"}
            }),
        }
    }

    #[test]
    fn columns_follow_catalog_order_and_prefixes() {
        let config = ExporterConfig::from_yaml(CONFIG).unwrap();

        let columns = csv_columns(&config);
        assert_eq!(
            columns,
            vec![
                "Key",
                "ID",
                "Summary",
                "Reporter",
                "Reporter ID",
                "Flagged",
                "Created",
                "Resolved",
                "Labels",
                "CF Team",
                "Status To Do",
                "Status In Progress",
                "Status Done",
            ]
        );
    }

    #[test]
    fn rows_align_with_the_header() {
        let config = ExporterConfig::from_yaml(CONFIG).unwrap();
        let issue = sample_issue();

        let workflow = config.workflow().unwrap();
        let timestamps = workflow
            .category_timestamps("2023-01-10", &[StatusTransition::new("Open", "Doing", "2023-01-15")])
            .unwrap();

        let row = csv_row(&config, &issue, Some(&timestamps)).unwrap();
        assert_eq!(row.len(), csv_columns(&config).len());
        assert_eq!(
            row,
            vec![
                "PKEY-1",
                "10001",
                "Fix the flux capacitor",
                "Jane Doe",
                "abc123",
                "false",
                "2023-01-10",
                "",
                "'backend'|'urgent'",
                "Avengers",
                "2023-01-10",
                "2023-01-15",
                "",
            ]
        );
    }

    #[test]
    fn missing_creation_date_is_a_hard_error() {
        let config = ExporterConfig::from_yaml(CONFIG).unwrap();
        let issue = RawIssue { id: "1".into(), key: "PKEY-2".into(), fields: json!({"summary": "No created field"}) };

        assert!(matches!(csv_row(&config, &issue, None), Err(ExporterError::Validation(_))));
    }

    #[test]
    fn unparseable_field_date_is_a_hard_error() {
        let config = ExporterConfig::from_yaml(CONFIG).unwrap();
        let mut issue = sample_issue();
        issue.fields["resolutiondate"] = json!("not a date");

        assert!(matches!(csv_row(&config, &issue, None), Err(ExporterError::InvalidTimestamp(_))));
    }
}
