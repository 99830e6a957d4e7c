use thiserror::Error;

/// Common error types for the exporter
#[derive(Error, Debug, Clone)]
pub enum ExporterError {
    /// A transition references a status missing from the workflow definition
    #[error("status '{0}' is not defined inside the YAML configuration file")]
    UnknownStatus(String),

    /// A category index resolved that does not exist in the ordered category list
    #[error("category '{0}' is not defined inside the YAML configuration file")]
    UnknownCategory(String),

    /// A transition or field timestamp that cannot be parsed
    #[error("unable to parse timestamp '{0}'")]
    InvalidTimestamp(String),

    /// Configuration file related errors
    #[error("{0}")]
    Configuration(String),

    /// Validation errors
    #[error("{0}")]
    Validation(String),

    /// Jira request errors
    #[error("{0}")]
    Network(String),

    /// Serialization/deserialization errors
    #[error("{0}")]
    Serialization(String),

    /// File system related errors
    #[error("{0}")]
    FileSystem(String),

    /// CSV output errors
    #[error("{0}")]
    Export(String),
}

/// Convert from std::io::Error
impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::FileSystem(err.to_string())
    }
}

/// Convert from serde_yaml::Error
impl From<serde_yaml::Error> for ExporterError {
    fn from(err: serde_yaml::Error) -> Self {
        ExporterError::Serialization(err.to_string())
    }
}

/// Convert from serde_json::Error
impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        ExporterError::Serialization(err.to_string())
    }
}

/// Convert from reqwest::Error
impl From<reqwest::Error> for ExporterError {
    fn from(err: reqwest::Error) -> Self {
        ExporterError::Network(err.to_string())
    }
}

/// Convert from csv::Error
impl From<csv::Error> for ExporterError {
    fn from(err: csv::Error) -> Self {
        ExporterError::Export(err.to_string())
    }
}
