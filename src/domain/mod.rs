//! Core domain types for the exporter

pub mod error;
pub mod workflow;

pub use error::ExporterError;
pub use workflow::{CategoryTimestamps, StatusTransition, Workflow};
