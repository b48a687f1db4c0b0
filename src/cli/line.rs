//! The `line` command: the budget target on its own

use std::path::PathBuf;

use clap::Args;

use crate::config::{Settings, TreasurePaths};
use crate::dataset::load_dataset;
use crate::display::format_line_breakdown;
use crate::error::TreasureResult;
use crate::services::LineCalculator;

/// Arguments of `treasure line`
#[derive(Args, Debug)]
pub struct LineArgs {
    /// Household size (defaults to the saved setting)
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    pub household_size: Option<i32>,

    /// Target percentile of income (defaults to the saved setting)
    #[arg(short, long, allow_hyphen_values = true)]
    pub percentile: Option<i32>,

    /// Tax/demographic dataset directory
    #[arg(long, env = "TREASURE_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Print the breakdown as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle `treasure line`
pub fn handle_line_command(
    paths: &TreasurePaths,
    settings: &Settings,
    args: LineArgs,
) -> TreasureResult<()> {
    let household_size = args.household_size.unwrap_or(settings.household_size);
    let percentile = args.percentile.unwrap_or(settings.percentile);

    let dataset_dir = args.dataset.unwrap_or_else(|| paths.dataset_dir());
    let dataset = load_dataset(&dataset_dir)?;
    let breakdown = LineCalculator::new(&dataset).breakdown(household_size, percentile)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        print!("{}", format_line_breakdown(&breakdown));
    }

    Ok(())
}
