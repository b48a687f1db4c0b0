//! Statement file formats
//!
//! Each supported bank export has its own column layout. A [`FileFormat`]
//! resolves to a [`ColumnLayout`] that the statement reader uses to
//! normalize rows.

use serde::Serialize;
use std::fmt;

/// Bank export formats a processor can be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Bank of America checking export (summary block above the header)
    BoaDebit,
    /// Chase credit card export
    ChaseCredit,
    /// Citi credit card export with separate debit/credit columns
    CitiCredit,
}

impl FileFormat {
    pub const ALL: [FileFormat; 3] = [Self::BoaDebit, Self::ChaseCredit, Self::CitiCredit];

    /// Parse a format key from configuration
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "boa_debit" => Some(Self::BoaDebit),
            "chase_credit" => Some(Self::ChaseCredit),
            "citi_credit" => Some(Self::CitiCredit),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::BoaDebit => "boa_debit",
            Self::ChaseCredit => "chase_credit",
            Self::CitiCredit => "citi_credit",
        }
    }

    /// Comma-separated list of valid keys, for error messages
    pub fn valid_keys() -> String {
        Self::ALL
            .iter()
            .map(|f| f.key())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The column layout of this export
    pub fn layout(&self) -> ColumnLayout {
        match self {
            Self::BoaDebit => ColumnLayout {
                date_column: "Date",
                description_column: "Description",
                amounts: AmountColumns::Single("Amount"),
                date_format: "%m/%d/%Y",
            },
            Self::ChaseCredit => ColumnLayout {
                date_column: "Transaction Date",
                description_column: "Description",
                amounts: AmountColumns::Single("Amount"),
                date_format: "%m/%d/%Y",
            },
            Self::CitiCredit => ColumnLayout {
                date_column: "Date",
                description_column: "Description",
                amounts: AmountColumns::DebitCredit {
                    debit: "Debit",
                    credit: "Credit",
                },
                date_format: "%m/%d/%Y",
            },
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// Where the amount lives in a statement row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumns {
    /// One signed amount column
    Single(&'static str),
    /// Separate outflow (debit) and inflow (credit) columns
    DebitCredit {
        debit: &'static str,
        credit: &'static str,
    },
}

/// Header names and date format for one statement format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date_column: &'static str,
    pub description_column: &'static str,
    pub amounts: AmountColumns,
    /// Primary date format (strftime); common alternatives are also tried
    pub date_format: &'static str,
}

impl ColumnLayout {
    /// Every header the layout needs to find
    pub fn required_headers(&self) -> Vec<&'static str> {
        let mut headers = vec![self.date_column, self.description_column];
        match self.amounts {
            AmountColumns::Single(amount) => headers.push(amount),
            AmountColumns::DebitCredit { debit, credit } => {
                headers.push(debit);
                headers.push(credit);
            }
        }
        headers
    }
}
