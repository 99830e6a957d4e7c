//! Exporter configuration
//!
//! Everything one export run needs is declared in a single YAML file:
//! connection details, the search criteria the JQL query is generated from,
//! field toggles, the workflow definition and output formatting options.
//!
//! # Example YAML structure
//! ```yaml
//! Connection:
//!   Domain: "https://acme.atlassian.net"
//!   Username: "jane@acme.example"
//!   API Token: "…"
//! Search Criteria:
//!   Projects: ["PKEY"]
//!   Issue Types: ["Story", "Bug"]
//!   Max Results: 200
//! Standard Issue Fields:
//!   Summary: true
//!   Labels: true
//! Custom Issue Fields:
//!   Team: customfield_10018
//! Workflow:
//!   To Do: ["Open", "Reopened"]
//!   In Progress: ["In Development", "Code Review"]
//!   Done: ["Resolved", "Closed"]
//! Mandatory:
//!   Flagged Field ID: customfield_10021
//!   Decimal Separator: Point
//! Misc:
//!   Status Category Prefix: "Status "
//!   Time Zone: "Europe/Berlin"
//! ```

pub mod fields;

use std::{collections::BTreeMap, fs, path::Path};

use chrono::NaiveDate;
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::{
    domain::{ExporterError, Workflow},
    utils::date,
};

pub use fields::{FieldCatalog, FieldKind, IssueField};

const DEFAULT_MAX_RESULTS: u32 = 100;

/// Decimal separator used when rendering numeric field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalSeparator {
    Point,
    Comma,
}

#[derive(Debug, Deserialize)]
struct RawConnection {
    #[serde(rename = "Domain")]
    domain:    Option<String>,
    #[serde(rename = "Username")]
    username:  Option<String>,
    #[serde(rename = "API Token")]
    api_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSearchCriteria {
    #[serde(rename = "Projects")]
    projects:              Option<Vec<String>>,
    #[serde(rename = "Issue Types")]
    issue_types:           Option<Vec<String>>,
    #[serde(rename = "Filter")]
    filter:                Option<serde_yaml::Value>,
    #[serde(rename = "Max Results")]
    max_results:           Option<u32>,
    #[serde(rename = "Exclude Created Date")]
    exclude_created_date:  Option<String>,
    #[serde(rename = "Exclude Resolved Date")]
    exclude_resolved_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMandatory {
    #[serde(rename = "Flagged Field ID")]
    flagged_field_id:  Option<String>,
    #[serde(rename = "Decimal Separator")]
    decimal_separator: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawMisc {
    #[serde(rename = "Standard Field Prefix")]
    standard_field_prefix:  Option<String>,
    #[serde(rename = "Custom Field Prefix")]
    custom_field_prefix:    Option<String>,
    #[serde(rename = "Status Category Prefix")]
    status_category_prefix: Option<String>,
    #[serde(rename = "Time Zone")]
    time_zone:              Option<String>,
}

/// The raw YAML document. Mappings whose key order matters (workflow
/// categories, custom field columns) are kept as `serde_yaml::Mapping`,
/// which preserves document order.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(rename = "Connection")]
    connection:      Option<RawConnection>,
    #[serde(rename = "Search Criteria")]
    search_criteria: Option<RawSearchCriteria>,
    #[serde(rename = "Standard Issue Fields")]
    standard_fields: Option<BTreeMap<String, bool>>,
    #[serde(rename = "Custom Issue Fields")]
    custom_fields:   Option<serde_yaml::Mapping>,
    #[serde(rename = "Workflow")]
    workflow:        Option<serde_yaml::Mapping>,
    #[serde(rename = "Mandatory")]
    mandatory:       Option<RawMandatory>,
    #[serde(rename = "Misc")]
    misc:            Option<RawMisc>,
}

/// Validated configuration of one export run.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    domain:    String,
    username:  String,
    api_token: String,

    jql_query:   String,
    max_results: u32,

    fields:   FieldCatalog,
    workflow: Option<Workflow>,

    decimal_separator:      DecimalSeparator,
    standard_field_prefix:  String,
    custom_field_prefix:    String,
    status_category_prefix: String,
    time_zone:              Tz,
}

impl ExporterConfig {
    /// Load and validate a configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ExporterError> {
        debug!("Start loading YAML configuration file.");
        let content = fs::read_to_string(path)
            .map_err(|e| ExporterError::FileSystem(format!("failed to read config file '{}': {e}", path.display())))?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ExporterError> {
        let raw: RawConfig = serde_yaml::from_str(content)?;

        let search_criteria = raw
            .search_criteria
            .ok_or_else(|| ExporterError::Configuration("no search criteria defined in YAML config file".into()))?;
        let mandatory = raw
            .mandatory
            .ok_or_else(|| ExporterError::Configuration("mandatory configuration properties are missing in YAML file".into()))?;

        let mut config = Self {
            domain:                 String::new(),
            username:               String::new(),
            api_token:              String::new(),
            jql_query:              String::new(),
            max_results:            search_criteria.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            fields:                 FieldCatalog::standard(),
            workflow:               None,
            decimal_separator:      DecimalSeparator::Comma,
            standard_field_prefix:  String::new(),
            custom_field_prefix:    String::new(),
            status_category_prefix: String::new(),
            time_zone:              Tz::UTC,
        };

        // Connection details are optional here; missing ones are prompted
        // for interactively before the first request.
        if let Some(connection) = raw.connection {
            if let Some(domain) = connection.domain {
                config.set_domain(&domain)?;
            }
            if let Some(username) = connection.username {
                config.set_username(&username);
            }
            if let Some(api_token) = connection.api_token {
                config.set_api_token(&api_token);
            }
        }

        config.jql_query = build_jql(&search_criteria)?;
        debug!("JQL query generated: {}", config.jql_query);
        debug!("YAML attribute 'Search Criteria > Max Results' has been set to '{}'.", config.max_results);

        config.decimal_separator = match mandatory.decimal_separator.as_deref() {
            Some("Point") => DecimalSeparator::Point,
            Some("Comma") => DecimalSeparator::Comma,
            Some(other) => {
                return Err(ExporterError::Configuration(format!(
                    "please check the value '{other}' for the attribute Mandatory > Decimal Separator"
                )));
            }
            None => {
                return Err(ExporterError::Configuration(
                    "mandatory attribute 'Decimal Separator' is missing in YAML config file".into(),
                ));
            }
        };

        let flagged_id = mandatory.flagged_field_id.ok_or_else(|| {
            ExporterError::Configuration("mandatory attribute 'Flagged Field ID' is missing in YAML config file".into())
        })?;
        config.fields.set_flagged_id(&flagged_id);
        debug!("ID for issue field 'Flagged': {flagged_id}");

        if let Some(standard_fields) = raw.standard_fields {
            for (name, enabled) in standard_fields {
                config.fields.set_export(&name, enabled)?;
            }
        }

        if let Some(custom_fields) = raw.custom_fields {
            for (name, id) in custom_fields {
                let name = yaml_string(&name, "Custom Issue Fields key")?;
                let id = yaml_string(&id, "Custom Issue Fields value")?;
                config.fields.add_custom(&name, &id)?;
            }
        }

        let misc = raw.misc.unwrap_or_default();
        config.standard_field_prefix = misc.standard_field_prefix.unwrap_or_default();
        config.custom_field_prefix = misc.custom_field_prefix.unwrap_or_default();
        config.status_category_prefix = misc.status_category_prefix.unwrap_or_default();
        config.time_zone = date::parse_time_zone(misc.time_zone.as_deref().unwrap_or(""))?;

        if let Some(workflow) = raw.workflow {
            config.workflow = Some(build_workflow(&workflow)?);
        }

        debug!("YAML configuration file successfully loaded.");
        Ok(config)
    }

    /// Set the Jira domain, enforcing the cloud URL pattern.
    pub fn set_domain(&mut self, value: &str) -> Result<(), ExporterError> {
        let pattern = Regex::new(r"^https://[^/]+\.atlassian\.net$")
            .map_err(|e| ExporterError::Configuration(e.to_string()))?;
        if !pattern.is_match(value) {
            return Err(ExporterError::Configuration(format!(
                "the given domain '{value}' does not fit the pattern 'https://[YOUR-NAME].atlassian.net', \
                 please check the YAML configuration file"
            )));
        }
        self.domain = value.to_string();
        debug!("YAML attribute 'Connection > Domain' has been set to '{value}'.");
        Ok(())
    }

    pub fn set_username(&mut self, value: &str) {
        self.username = value.to_string();
        debug!("YAML attribute 'Connection > Username' has been set to '{value}'.");
    }

    /// The token itself is deliberately kept out of the log file.
    pub fn set_api_token(&mut self, value: &str) {
        self.api_token = value.to_string();
        debug!("YAML attribute 'Connection > API Token' has been set.");
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn jql_query(&self) -> &str {
        &self.jql_query
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn fields(&self) -> &FieldCatalog {
        &self.fields
    }

    pub fn workflow(&self) -> Option<&Workflow> {
        self.workflow.as_ref()
    }

    /// Whether workflow timestamp columns are requested for this run. A
    /// missing or empty `Workflow` section means tracking is disabled, not
    /// an error; the parser skips the changelog replay entirely.
    pub fn has_workflow(&self) -> bool {
        self.workflow
            .as_ref()
            .is_some_and(|workflow| workflow.category_count() > 0 && workflow.status_count() > 0)
    }

    pub fn decimal_separator(&self) -> DecimalSeparator {
        self.decimal_separator
    }

    pub fn standard_field_prefix(&self) -> &str {
        &self.standard_field_prefix
    }

    pub fn custom_field_prefix(&self) -> &str {
        &self.custom_field_prefix
    }

    pub fn status_category_prefix(&self) -> &str {
        &self.status_category_prefix
    }

    pub fn time_zone(&self) -> &Tz {
        &self.time_zone
    }
}

/// Generate the JQL query from the search criteria section. A named filter
/// wins over everything else; otherwise at least one project is required.
fn build_jql(criteria: &RawSearchCriteria) -> Result<String, ExporterError> {
    if let Some(filter) = &criteria.filter {
        let filter = match filter {
            serde_yaml::Value::String(s) => s.clone(),
            serde_yaml::Value::Number(n) => n.to_string(),
            _ => {
                return Err(ExporterError::Configuration(
                    "attribute 'Search Criteria > Filter' must be a filter name or id".into(),
                ));
            }
        };
        return Ok(format!("filter = '{filter}'"));
    }

    let projects = criteria.projects.as_deref().unwrap_or(&[]);
    if projects.is_empty() {
        return Err(ExporterError::Configuration(
            "couldn't build JQL query, no project key or filter defined in YAML configuration file".into(),
        ));
    }

    let mut jql = jql_list_of_values("project", projects);

    if let Some(issue_types) = criteria.issue_types.as_deref() {
        if !issue_types.is_empty() {
            jql.push_str(" AND ");
            jql.push_str(&jql_list_of_values("issuetype", issue_types));
        }
    }

    if let Some(created) = &criteria.exclude_created_date {
        check_date(created)?;
        jql.push_str(&format!(" AND created >= '{created}'"));
    }
    if let Some(resolved) = &criteria.exclude_resolved_date {
        check_date(resolved)?;
        jql.push_str(&format!(" AND (resolved IS EMPTY OR resolved >= '{resolved}')"));
    }

    jql.push_str(" ORDER BY issuekey ASC");
    Ok(jql)
}

/// Render a JQL membership clause like `issuetype IN(Story, Bug)`.
fn jql_list_of_values(issue_field: &str, values: &[String]) -> String {
    format!("{issue_field} IN({})", values.join(", "))
}

fn check_date(value: &str) -> Result<(), ExporterError> {
    NaiveDate::parse_from_str(value, date::DATE_PATTERN).map_err(|_| {
        ExporterError::Configuration(format!("date '{value}' in YAML configuration file does not follow YYYY-MM-DD"))
    })?;
    Ok(())
}

/// Build the domain workflow from the ordered YAML mapping.
fn build_workflow(mapping: &serde_yaml::Mapping) -> Result<Workflow, ExporterError> {
    let mut pairs: Vec<(String, Vec<String>)> = Vec::with_capacity(mapping.len());

    for (category, statuses) in mapping {
        let category = yaml_string(category, "Workflow category")?;
        let statuses = match statuses {
            serde_yaml::Value::Sequence(sequence) => sequence
                .iter()
                .map(|status| yaml_string(status, "Workflow status"))
                .collect::<Result<Vec<_>, _>>()?,
            serde_yaml::Value::Null => Vec::new(),
            _ => {
                return Err(ExporterError::Configuration(format!(
                    "workflow category '{category}' must map to a list of statuses"
                )));
            }
        };
        pairs.push((category, statuses));
    }

    Workflow::new(&pairs)
}

fn yaml_string(value: &serde_yaml::Value, what: &str) -> Result<String, ExporterError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ExporterError::Configuration(format!("{what} must be a string")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"
Connection:
  Domain: "https://acme.atlassian.net"
  Username: "jane@acme.example"
  API Token: "token-123"
Search Criteria:
  Projects: ["PKEY", "OPS"]
  Issue Types: ["Story", "Bug"]
  Max Results: 250
  Exclude Created Date: "2023-01-01"
Standard Issue Fields:
  Summary: true
  Labels: true
  Flagged: true
Custom Issue Fields:
  Team: customfield_10018
  Quarter: customfield_10019
Workflow:
  To Do: ["Open", "Reopened"]
  In Progress: ["In Development", "Code Review"]
  Done: ["Resolved", "Closed"]
Mandatory:
  Flagged Field ID: customfield_10021
  Decimal Separator: Point
Misc:
  Standard Field Prefix: ""
  Custom Field Prefix: "CF "
  Status Category Prefix: "Status "
  Time Zone: "Europe/Berlin"
"#;

    #[test]
    fn full_config_parses() {
        let config = ExporterConfig::from_yaml(FULL_CONFIG).unwrap();

        assert_eq!(config.domain(), "https://acme.atlassian.net");
        assert_eq!(config.username(), "jane@acme.example");
        assert_eq!(config.max_results(), 250);
        assert_eq!(config.decimal_separator(), DecimalSeparator::Point);
        assert_eq!(config.custom_field_prefix(), "CF ");
        assert_eq!(config.status_category_prefix(), "Status ");
        assert_eq!(config.time_zone(), &chrono_tz::Europe::Berlin);
        assert_eq!(
            config.jql_query(),
            "project IN(PKEY, OPS) AND issuetype IN(Story, Bug) AND created >= '2023-01-01' ORDER BY issuekey ASC"
        );
    }

    #[test]
    fn workflow_section_preserves_category_order() {
        let config = ExporterConfig::from_yaml(FULL_CONFIG).unwrap();
        let workflow = config.workflow().unwrap();

        assert!(config.has_workflow());
        assert_eq!(workflow.categories(), &["To Do", "In Progress", "Done"]);
        assert_eq!(workflow.category_of("Code Review").unwrap(), "In Progress");
    }

    #[test]
    fn missing_workflow_disables_tracking() {
        let yaml = r#"
Search Criteria:
  Projects: ["PKEY"]
Mandatory:
  Flagged Field ID: customfield_10021
  Decimal Separator: Comma
"#;
        let config = ExporterConfig::from_yaml(yaml).unwrap();

        assert!(!config.has_workflow());
        assert!(config.workflow().is_none());
        assert_eq!(config.jql_query(), "project IN(PKEY) ORDER BY issuekey ASC");
        assert_eq!(config.max_results(), 100);
    }

    #[test]
    fn named_filter_wins_over_projects() {
        let yaml = r#"
Search Criteria:
  Projects: ["PKEY"]
  Filter: 10042
Mandatory:
  Flagged Field ID: customfield_10021
  Decimal Separator: Comma
"#;
        let config = ExporterConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.jql_query(), "filter = '10042'");
    }

    #[test]
    fn missing_sections_are_hard_errors() {
        let no_search = "Mandatory:\n  Flagged Field ID: customfield_1\n  Decimal Separator: Point\n";
        assert!(matches!(ExporterConfig::from_yaml(no_search), Err(ExporterError::Configuration(_))));

        let no_mandatory = "Search Criteria:\n  Projects: [\"PKEY\"]\n";
        assert!(matches!(ExporterConfig::from_yaml(no_mandatory), Err(ExporterError::Configuration(_))));
    }

    #[test]
    fn domain_pattern_is_enforced() {
        let yaml = r#"
Connection:
  Domain: "http://acme.example.com"
Search Criteria:
  Projects: ["PKEY"]
Mandatory:
  Flagged Field ID: customfield_10021
  Decimal Separator: Comma
"#;
        assert!(matches!(ExporterConfig::from_yaml(yaml), Err(ExporterError::Configuration(_))));
    }

    #[test]
    fn invalid_exclude_date_is_rejected() {
        let yaml = r#"
Search Criteria:
  Projects: ["PKEY"]
  Exclude Created Date: "01.02.2023"
Mandatory:
  Flagged Field ID: customfield_10021
  Decimal Separator: Comma
"#;
        assert!(matches!(ExporterConfig::from_yaml(yaml), Err(ExporterError::Configuration(_))));
    }

    #[test]
    fn projects_or_filter_are_required() {
        let yaml = r#"
Search Criteria:
  Max Results: 10
Mandatory:
  Flagged Field ID: customfield_10021
  Decimal Separator: Comma
"#;
        assert!(matches!(ExporterConfig::from_yaml(yaml), Err(ExporterError::Configuration(_))));
    }
}
