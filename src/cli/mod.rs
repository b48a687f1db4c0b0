//! CLI command handlers
//!
//! Bridges the clap argument parsing with the service layer.

pub mod line;
pub mod rules;
pub mod run;

pub use line::{handle_line_command, LineArgs};
pub use rules::{handle_rules_command, RulesArgs, RulesCommands};
pub use run::{handle_run_command, ExportFormat, RunArgs};
