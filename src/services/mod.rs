//! Service layer for treasure
//!
//! Statement import, categorization and the budget-target calculation.
//! Each service borrows the configuration it works from and holds no
//! state between calls.

pub mod categorize;
pub mod dispatch;
pub mod import;
pub mod ingest;
pub mod line;

pub use categorize::CategorizationService;
pub use dispatch::dispatch;
pub use import::ImportService;
pub use ingest::IngestService;
pub use line::{LineBreakdown, LineCalculator};
