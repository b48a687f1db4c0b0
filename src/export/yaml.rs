//! YAML export of a run summary

use std::io::Write;

use crate::error::{TreasureError, TreasureResult};
use crate::export::json::ReportExport;

/// Write the export as YAML with a short comment header
pub fn export_report_yaml<W: Write>(
    export: &ReportExport<'_>,
    writer: &mut W,
) -> TreasureResult<()> {
    let export_err = |e: std::io::Error| TreasureError::Export(e.to_string());

    writeln!(writer, "# treasure summary export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, export).map_err(|e| TreasureError::Export(e.to_string()))?;

    Ok(())
}
