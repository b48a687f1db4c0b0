//! Core data models for Treasure
//!
//! This module contains the data structures the categorization engine and
//! the budget-target calculator work with: statement rows, rule sets,
//! money amounts and tax brackets.

pub mod file_format;
pub mod money;
pub mod rule_set;
pub mod tax;
pub mod transaction;

pub use file_format::{AmountColumns, ColumnLayout, FileFormat};
pub use money::{Money, MoneyParseError};
pub use rule_set::{CategoryMap, RuleSet};
pub use tax::{BracketSchedule, FilingStatus, TaxBracket};
pub use transaction::{
    CategorizedTransaction, Transaction, TransactionType, TypeCategory, NO_CATEGORY,
};
