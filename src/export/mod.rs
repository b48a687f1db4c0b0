//! Export module for treasure
//!
//! Writes a run summary to disk:
//! - JSON: machine-readable, with the run inputs and schema version
//! - YAML: the same document, human-readable
//! - CSV: flat rows via [`SummaryReport::export_csv`](crate::reports::SummaryReport::export_csv)

pub mod json;
pub mod yaml;

pub use json::{export_report_json, ReportExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_report_yaml;
