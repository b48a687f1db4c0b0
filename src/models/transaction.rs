//! Transaction model
//!
//! A [`Transaction`] is one normalized statement row. Once categorized it
//! becomes a [`CategorizedTransaction`] carrying a [`TransactionType`] and a
//! category name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Category name given to rows that matched no identifier
pub const NO_CATEGORY: &str = "no category";

/// The semantic type of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    Income,
    /// Ordinary spending, counted against the line
    Expense,
    /// Voluntary giving, an over-the-line item
    Giving,
    /// Matched no identifier; kept for manual review
    #[serde(rename = "no type")]
    Unclassified,
}

impl TransactionType {
    /// The types a rule set may assign
    pub const RULE_TYPES: [TransactionType; 3] = [Self::Income, Self::Expense, Self::Giving];

    /// Parse a rule type key from configuration ("income", "expense", "giving")
    pub fn parse_rule_type(s: &str) -> Option<Self> {
        match s {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            "giving" => Some(Self::Giving),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Giving => "giving",
            Self::Unclassified => "no type",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A (type, category) pair assigned by a rule set
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TypeCategory {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
}

impl TypeCategory {
    pub fn new(transaction_type: TransactionType, category: impl Into<String>) -> Self {
        Self {
            transaction_type,
            category: category.into(),
        }
    }

    /// The pair given to rows that matched nothing
    pub fn unclassified() -> Self {
        Self::new(TransactionType::Unclassified, NO_CATEGORY)
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.transaction_type, self.category)
    }
}

/// A normalized statement row
///
/// Amounts follow the income-positive convention: the statement reader
/// flips signs where a bank reports charges as positive numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Posting or transaction date
    pub date: NaiveDate,

    /// Free-text description as printed on the statement
    pub description: String,

    /// Signed amount, income positive
    pub amount: Money,

    /// Label of the account the statement belongs to
    pub source_account: String,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        source_account: impl Into<String>,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            source_account: source_account.into(),
        }
    }

    /// The description in the form identifiers are matched against
    pub fn normalized_description(&self) -> String {
        self.description.to_lowercase()
    }
}

/// A transaction with its resolved type and category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub category: String,
}

impl CategorizedTransaction {
    pub fn new(transaction: Transaction, type_category: TypeCategory) -> Self {
        Self {
            transaction,
            transaction_type: type_category.transaction_type,
            category: type_category.category,
        }
    }

    pub fn unclassified(transaction: Transaction) -> Self {
        Self::new(transaction, TypeCategory::unclassified())
    }

    pub fn is_unclassified(&self) -> bool {
        self.transaction_type == TransactionType::Unclassified
    }

    pub fn amount(&self) -> Money {
        self.transaction.amount
    }
}
