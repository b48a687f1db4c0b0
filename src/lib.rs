//! treasure - statement categorization and budget-target tracking
//!
//! This library reads bank statement exports, assigns every transaction a
//! (type, category) pair from operator-defined rules, and compares the
//! month's spending against "the line": an after-tax monthly budget
//! derived from household size and a target income percentile.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, settings and the rules file
//! - `dataset`: Tax and demographic figures for the line
//! - `error`: Custom error types
//! - `models`: Core data models (money, transactions, rule sets, brackets)
//! - `services`: Import, categorization and the line calculator
//! - `reports`: The per-run summary
//! - `display`: Terminal formatting
//! - `export`: JSON and YAML output
//! - `cli`: Command handlers for the binary
//! - `logging`: Tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use treasure::config::RulesConfig;
//! use treasure::dataset::load_dataset;
//! use treasure::reports::SummaryReport;
//! use treasure::services::{IngestService, LineCalculator};
//!
//! let rules = RulesConfig::load(Path::new("config.json"))?;
//! let dataset = load_dataset(Path::new("flp"))?;
//! let line = LineCalculator::new(&dataset).compute_monthly_target(2, 50)?;
//! let rows = IngestService::new(&rules).ingest_directory(Path::new("statements"))?;
//! let report = SummaryReport::generate(&rows, line);
//! ```

pub mod cli;
pub mod config;
pub mod dataset;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;

pub use error::{TreasureError, TreasureResult};
