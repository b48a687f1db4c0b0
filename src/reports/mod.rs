//! Reports module for treasure
//!
//! The per-run summary of categorized transactions against the line.

pub mod summary;

pub use summary::{CategoryBreakdown, SummaryReport, TypeSummary};
