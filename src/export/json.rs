//! JSON export of a run summary

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{TreasureError, TreasureResult};
use crate::reports::SummaryReport;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A summary report plus the inputs that produced it
#[derive(Debug, Clone, Serialize)]
pub struct ReportExport<'a> {
    /// Schema version for compatibility checking
    pub schema_version: &'static str,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: &'static str,

    pub household_size: i32,

    pub percentile: i32,

    pub report: &'a SummaryReport,
}

impl<'a> ReportExport<'a> {
    pub fn new(report: &'a SummaryReport, household_size: i32, percentile: i32) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            household_size,
            percentile,
            report,
        }
    }
}

/// Write the export as JSON
pub fn export_report_json<W: Write>(
    export: &ReportExport<'_>,
    writer: &mut W,
    pretty: bool,
) -> TreasureResult<()> {
    let written = if pretty {
        serde_json::to_writer_pretty(&mut *writer, export)
    } else {
        serde_json::to_writer(&mut *writer, export)
    };
    written.map_err(|e| TreasureError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| TreasureError::Export(e.to_string()))?;
    Ok(())
}
