//! Issue field catalog
//!
//! The exporter knows a fixed set of standard Jira fields plus any custom
//! fields declared in the YAML configuration. Each field carries two flags:
//! whether it is requested from the API at all and whether it becomes a CSV
//! column. The catalog keeps declaration order, which later drives the
//! column layout of the output file.

use regex::Regex;
use tracing::debug;

use crate::domain::ExporterError;

/// What a field is and how its raw JSON value has to be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Key,
    Id,
    IssueType,
    Summary,
    Parent,
    Reporter,
    Assignee,
    Status,
    Priority,
    Flagged,
    Resolution,
    Created,
    DueDate,
    Updated,
    Resolved,
    Labels,
    Components,
    AffectedVersions,
    FixedVersions,
    Custom,
}

impl FieldKind {
    /// The display name used in the YAML configuration and as CSV column base.
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldKind::Key => "Key",
            FieldKind::Id => "ID",
            FieldKind::IssueType => "Type",
            FieldKind::Summary => "Summary",
            FieldKind::Parent => "Parent",
            FieldKind::Reporter => "Reporter",
            FieldKind::Assignee => "Assignee",
            FieldKind::Status => "Status",
            FieldKind::Priority => "Priority",
            FieldKind::Flagged => "Flagged",
            FieldKind::Resolution => "Resolution",
            FieldKind::Created => "Created",
            FieldKind::DueDate => "Due Date",
            FieldKind::Updated => "Updated",
            FieldKind::Resolved => "Resolved",
            FieldKind::Labels => "Labels",
            FieldKind::Components => "Components",
            FieldKind::AffectedVersions => "Affected Versions",
            FieldKind::FixedVersions => "Fixed Versions",
            FieldKind::Custom => "Custom",
        }
    }

    /// The REST API field key requested in search queries.
    fn api_id(&self) -> &'static str {
        match self {
            FieldKind::Key => "key",
            FieldKind::Id => "id",
            FieldKind::IssueType => "issuetype",
            FieldKind::Summary => "summary",
            FieldKind::Parent => "parent",
            FieldKind::Reporter => "reporter",
            FieldKind::Assignee => "assignee",
            FieldKind::Status => "status",
            FieldKind::Priority => "priority",
            FieldKind::Resolution => "resolution",
            FieldKind::Created => "created",
            FieldKind::DueDate => "duedate",
            FieldKind::Updated => "updated",
            FieldKind::Resolved => "resolutiondate",
            FieldKind::Labels => "labels",
            FieldKind::Components => "components",
            FieldKind::AffectedVersions => "versions",
            FieldKind::FixedVersions => "fixVersions",
            // Flagged and custom fields get their customfield id from the
            // configuration.
            FieldKind::Flagged | FieldKind::Custom => "",
        }
    }
}

/// One fetchable/exportable issue field.
#[derive(Debug, Clone)]
pub struct IssueField {
    /// Display name, also the YAML key and CSV column base name
    pub name:   String,
    /// REST API field id (`summary`, `customfield_10018`, ...)
    pub id:     String,
    pub kind:   FieldKind,
    /// Request the field from the API
    pub fetch:  bool,
    /// Write the field to the CSV output
    pub export: bool,
}

/// All standard field kinds in catalog (and therefore CSV column) order.
const STANDARD_KINDS: [FieldKind; 19] = [
    FieldKind::Key,
    FieldKind::Id,
    FieldKind::IssueType,
    FieldKind::Summary,
    FieldKind::Parent,
    FieldKind::Reporter,
    FieldKind::Assignee,
    FieldKind::Status,
    FieldKind::Priority,
    FieldKind::Flagged,
    FieldKind::Resolution,
    FieldKind::Created,
    FieldKind::DueDate,
    FieldKind::Updated,
    FieldKind::Resolved,
    FieldKind::Labels,
    FieldKind::Components,
    FieldKind::AffectedVersions,
    FieldKind::FixedVersions,
];

/// Ordered collection of all fields known to one export run.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    fields: Vec<IssueField>,
}

impl FieldCatalog {
    /// The catalog of standard fields with their default flags: key and id
    /// always go out, summary and status are always fetched, everything else
    /// is opt-in via the YAML configuration.
    pub fn standard() -> Self {
        let fields = STANDARD_KINDS
            .iter()
            .map(|kind| {
                let always = matches!(kind, FieldKind::Key | FieldKind::Id);
                let always_fetch = matches!(kind, FieldKind::Summary | FieldKind::Status);
                IssueField {
                    name:   kind.display_name().to_string(),
                    id:     kind.api_id().to_string(),
                    kind:   *kind,
                    fetch:  always || always_fetch,
                    export: always,
                }
            })
            .collect();

        Self { fields }
    }

    /// Apply one `Standard Issue Fields` toggle from the YAML configuration.
    ///
    /// Key and ID cannot be disabled; Summary and Status stay fetched even
    /// when not exported (they feed logging and the progress display).
    pub fn set_export(&mut self, name: &str, enabled: bool) -> Result<(), ExporterError> {
        let field = self
            .fields
            .iter_mut()
            .find(|field| field.kind != FieldKind::Custom && field.name == name)
            .ok_or_else(|| {
                ExporterError::Configuration(format!(
                    "unknown standard issue field '{name}' defined in YAML configuration file"
                ))
            })?;

        match field.kind {
            FieldKind::Key | FieldKind::Id => {
                field.fetch = true;
                field.export = true;
            }
            FieldKind::Summary | FieldKind::Status => {
                field.fetch = true;
                field.export = enabled;
            }
            _ => {
                field.fetch = enabled;
                field.export = enabled;
            }
        }

        Ok(())
    }

    /// Register a custom field (`name -> customfield_NNNNN`).
    pub fn add_custom(&mut self, name: &str, id: &str) -> Result<(), ExporterError> {
        let id_pattern = Regex::new(r"^customfield_\d+$").map_err(|e| ExporterError::Configuration(e.to_string()))?;
        if !id_pattern.is_match(id) {
            return Err(ExporterError::Configuration(format!(
                "custom field '{name}' has id '{id}' which does not follow the pattern 'customfield_XXXXX'"
            )));
        }
        if self.fields.iter().any(|field| field.name == name) {
            return Err(ExporterError::Configuration(format!(
                "custom field with redundant name '{name}', check your YAML configuration file"
            )));
        }

        debug!("Added custom field '{name}' with id '{id}'.");
        self.fields.push(IssueField {
            name:   name.to_string(),
            id:     id.to_string(),
            kind:   FieldKind::Custom,
            fetch:  true,
            export: true,
        });

        Ok(())
    }

    /// Set the tenant-specific customfield id of the locked Flagged field.
    pub fn set_flagged_id(&mut self, id: &str) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.kind == FieldKind::Flagged) {
            field.id = id.to_string();
        }
    }

    /// All fields in catalog order.
    pub fn all(&self) -> &[IssueField] {
        &self.fields
    }

    /// Fields that become CSV columns, in catalog order.
    pub fn exported(&self) -> impl Iterator<Item = &IssueField> {
        self.fields.iter().filter(|field| field.export)
    }

    /// REST field ids for the search request. Key and id are issue
    /// attributes and always part of the response, so they are not
    /// requested explicitly.
    pub fn fields_to_fetch(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|field| field.fetch && !matches!(field.kind, FieldKind::Key | FieldKind::Id))
            .filter(|field| !field.id.is_empty())
            .map(|field| field.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_and_id_are_always_exported() {
        let catalog = FieldCatalog::standard();
        let exported: Vec<&str> = catalog.exported().map(|f| f.name.as_str()).collect();

        assert_eq!(exported, vec!["Key", "ID"]);
    }

    #[test]
    fn toggles_follow_the_field_rules() {
        let mut catalog = FieldCatalog::standard();
        catalog.set_export("Key", false).unwrap();
        catalog.set_export("Summary", false).unwrap();
        catalog.set_export("Labels", true).unwrap();

        let key = catalog.all().iter().find(|f| f.kind == FieldKind::Key).unwrap();
        assert!(key.export, "key cannot be disabled");

        let summary = catalog.all().iter().find(|f| f.kind == FieldKind::Summary).unwrap();
        assert!(summary.fetch && !summary.export, "summary stays fetched even when not exported");

        let labels = catalog.all().iter().find(|f| f.kind == FieldKind::Labels).unwrap();
        assert!(labels.fetch && labels.export);
    }

    #[test]
    fn unknown_standard_field_is_rejected() {
        let mut catalog = FieldCatalog::standard();
        assert!(matches!(catalog.set_export("Story Points", true), Err(ExporterError::Configuration(_))));
    }

    #[test]
    fn custom_fields_validate_id_and_name() {
        let mut catalog = FieldCatalog::standard();
        catalog.add_custom("Team", "customfield_10018").unwrap();

        assert!(matches!(catalog.add_custom("Team", "customfield_10019"), Err(ExporterError::Configuration(_))));
        assert!(matches!(catalog.add_custom("Squad", "cf10019"), Err(ExporterError::Configuration(_))));
    }

    #[test]
    fn fetch_list_skips_attributes_and_unset_flagged() {
        let mut catalog = FieldCatalog::standard();
        catalog.set_export("Labels", true).unwrap();

        let fetch = catalog.fields_to_fetch();
        assert!(fetch.contains(&"summary".to_string()));
        assert!(fetch.contains(&"labels".to_string()));
        assert!(!fetch.contains(&"key".to_string()));
        assert!(!fetch.iter().any(String::is_empty));

        catalog.set_flagged_id("customfield_10021");
        catalog.set_export("Flagged", true).unwrap();
        assert!(catalog.fields_to_fetch().contains(&"customfield_10021".to_string()));
    }
}
