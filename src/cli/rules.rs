//! CLI commands for inspecting the rules file

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::{RulesConfig, TreasurePaths};
use crate::display::{format_rule_set, format_rule_sets};
use crate::error::TreasureResult;
use crate::models::{Money, Transaction};
use crate::services::CategorizationService;

/// Arguments of `treasure rules`
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Rules file defining processors and file nicknames
    #[arg(short, long, global = true, env = "TREASURE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: RulesCommands,
}

/// Rules subcommands
#[derive(Subcommand, Debug)]
pub enum RulesCommands {
    /// Validate the rules file
    Check,

    /// List processors and their identifiers
    Show {
        /// Only show this processor
        processor: Option<String>,
    },

    /// Show how a description would be categorized
    Match {
        /// Transaction description as printed on the statement
        description: String,

        /// Processor whose rules to apply
        #[arg(long)]
        processor: String,
    },
}

/// Handle `treasure rules`
pub fn handle_rules_command(paths: &TreasurePaths, args: RulesArgs) -> TreasureResult<()> {
    let config_path = args.config.unwrap_or_else(|| paths.rules_file());
    let rules = RulesConfig::load(&config_path)?;

    match args.command {
        RulesCommands::Check => {
            let identifiers: usize = rules.rule_sets().iter().map(|rs| rs.identifier_count()).sum();
            println!("{} is valid", config_path.display());
            println!(
                "  {} processors, {} identifiers, {} file nicknames",
                rules.rule_sets().len(),
                identifiers,
                rules.nicknames().len()
            );
        }
        RulesCommands::Show { processor } => match processor {
            Some(name) => print!("{}", format_rule_set(rules.rule_set(&name)?)),
            None => print!("{}", format_rule_sets(rules.rule_sets())),
        },
        RulesCommands::Match {
            description,
            processor,
        } => {
            let rule_set = rules.rule_set(&processor)?;
            let service = CategorizationService::new(rule_set);

            let probe = Transaction::new(
                chrono::Local::now().date_naive(),
                description.as_str(),
                Money::zero(),
                rule_set.name(),
            );
            if service.is_skipped(&probe) {
                println!("Skipped: \"{}\" contains a skip substring", description);
                return Ok(());
            }

            let pair = service.resolve(&description)?;
            let matching = service.matching_identifiers(&description);
            if matching.is_empty() {
                println!("{} (no identifier matched)", pair);
            } else {
                println!("{} via {}", pair, matching.join(", "));
            }
        }
    }

    Ok(())
}
