//! Display formatting for terminal output
//!
//! Tables and colored figures for the summary report, the line breakdown
//! and configured rule sets.

pub mod report;
pub mod rules;

pub use report::{format_line_breakdown, format_summary};
pub use rules::{format_rule_set, format_rule_sets};
