//! The `run` command: statements in, summary out

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use crate::config::{RulesConfig, Settings, TreasurePaths};
use crate::dataset::load_dataset;
use crate::display::format_summary;
use crate::error::{TreasureError, TreasureResult};
use crate::export::{export_report_json, export_report_yaml, ReportExport};
use crate::reports::SummaryReport;
use crate::services::{IngestService, LineCalculator};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// JSON document with the run inputs
    Json,
    /// YAML document, human-readable
    Yaml,
    /// Flat CSV rows
    Csv,
}

/// Arguments of `treasure run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Household size (defaults to the saved setting)
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    pub household_size: Option<i32>,

    /// Target percentile of income (defaults to the saved setting)
    #[arg(short, long, allow_hyphen_values = true)]
    pub percentile: Option<i32>,

    /// Directory holding the bank statement exports
    #[arg(short = 'f', long)]
    pub file_dir: PathBuf,

    /// Rules file defining processors and file nicknames
    #[arg(short, long, env = "TREASURE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Tax/demographic dataset directory
    #[arg(long, env = "TREASURE_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Also write the summary to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Format of the exported summary
    #[arg(long, value_enum, default_value = "json")]
    pub format: ExportFormat,
}

/// Handle `treasure run`
pub fn handle_run_command(
    paths: &TreasurePaths,
    settings: &Settings,
    args: RunArgs,
) -> TreasureResult<()> {
    let household_size = args.household_size.unwrap_or(settings.household_size);
    let percentile = args.percentile.unwrap_or(settings.percentile);

    let config_path = args.config.unwrap_or_else(|| paths.rules_file());
    let rules = RulesConfig::load(&config_path)?;

    let dataset_dir = args.dataset.unwrap_or_else(|| paths.dataset_dir());
    let dataset = load_dataset(&dataset_dir)?;
    let monthly_target =
        LineCalculator::new(&dataset).compute_monthly_target(household_size, percentile)?;

    let rows = IngestService::new(&rules).ingest_directory(&args.file_dir)?;
    let report = SummaryReport::generate(&rows, monthly_target);

    print!("{}", format_summary(&report, &settings.currency_symbol));

    if let Some(output) = args.output {
        let export = ReportExport::new(&report, household_size, percentile);
        write_export(&export, &output, args.format)?;
        println!("Summary exported to: {}", output.display());
    }

    Ok(())
}

fn write_export(
    export: &ReportExport<'_>,
    output: &Path,
    format: ExportFormat,
) -> TreasureResult<()> {
    let file = File::create(output).map_err(|e| {
        TreasureError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Json => export_report_json(export, &mut writer, true)?,
        ExportFormat::Yaml => export_report_yaml(export, &mut writer)?,
        ExportFormat::Csv => export.report.export_csv(&mut writer)?,
    }

    writer
        .flush()
        .map_err(|e| TreasureError::Export(e.to_string()))
}
