//! Statement import
//!
//! Reads a bank export into normalized [`Transaction`]s using the column
//! layout of its [`FileFormat`]. Some exports (Bank of America checking)
//! carry a summary block above the real header, so the reader scans for
//! the first record that contains every column the layout needs.
//!
//! Records with no amount, such as running-balance lines, are ignored.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::error::{TreasureError, TreasureResult};
use crate::models::{AmountColumns, ColumnLayout, FileFormat, Money, Transaction};

/// Fallback date formats tried after the layout's own
const FALLBACK_DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d", "%m-%d-%Y", "%d-%m-%Y",
];

/// Column positions resolved from a header record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndices {
    date: usize,
    description: usize,
    amounts: AmountIndices,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountIndices {
    Single(usize),
    DebitCredit { debit: usize, credit: usize },
}

/// Service for reading statement files of one format
pub struct ImportService {
    format: FileFormat,
    layout: ColumnLayout,
}

impl ImportService {
    pub fn new(format: FileFormat) -> Self {
        Self {
            format,
            layout: format.layout(),
        }
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Read a statement file, labelling every row with `source_account`
    pub fn read_file(
        &self,
        path: &Path,
        source_account: &str,
    ) -> TreasureResult<Vec<Transaction>> {
        let file = std::fs::File::open(path).map_err(|e| {
            TreasureError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let transactions = self
            .read_from(file, source_account)
            .map_err(|e| match e {
                TreasureError::Import(msg) => {
                    TreasureError::Import(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })?;

        tracing::info!(
            file = %path.display(),
            format = %self.format,
            rows = transactions.len(),
            "Read statement"
        );
        Ok(transactions)
    }

    /// Read statement rows from any reader
    pub fn read_from<R: Read>(
        &self,
        reader: R,
        source_account: &str,
    ) -> TreasureResult<Vec<Transaction>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut columns = None;
        let mut transactions = Vec::new();

        for result in reader.records() {
            let record = result?;

            let Some(indices) = columns else {
                columns = self.locate_columns(&record);
                continue;
            };

            let line = record.position().map_or(0, |p| p.line());
            match self.parse_record(&record, indices, source_account) {
                Ok(Some(txn)) => transactions.push(txn),
                Ok(None) => {
                    tracing::debug!(line, "Ignoring statement row without an amount");
                }
                Err(msg) => {
                    return Err(TreasureError::Import(format!("line {}: {}", line, msg)));
                }
            }
        }

        if columns.is_none() {
            return Err(TreasureError::Import(format!(
                "No header row with columns {} found for format {}",
                self.layout.required_headers().join(", "),
                self.format
            )));
        }

        Ok(transactions)
    }

    /// Resolve column positions if this record is the header
    fn locate_columns(&self, record: &StringRecord) -> Option<ColumnIndices> {
        let find = |name: &str| {
            record
                .iter()
                .position(|field| field.trim().eq_ignore_ascii_case(name))
        };

        let amounts = match self.layout.amounts {
            AmountColumns::Single(amount) => AmountIndices::Single(find(amount)?),
            AmountColumns::DebitCredit { debit, credit } => AmountIndices::DebitCredit {
                debit: find(debit)?,
                credit: find(credit)?,
            },
        };

        Some(ColumnIndices {
            date: find(self.layout.date_column)?,
            description: find(self.layout.description_column)?,
            amounts,
        })
    }

    /// Parse one data record; `Ok(None)` when it carries no amount
    fn parse_record(
        &self,
        record: &StringRecord,
        indices: ColumnIndices,
        source_account: &str,
    ) -> Result<Option<Transaction>, String> {
        if record.iter().all(|field| field.trim().is_empty()) {
            return Ok(None);
        }

        let Some(amount) = self.parse_amount_from_record(record, indices.amounts)? else {
            return Ok(None);
        };

        let date_str = field(record, indices.date).ok_or("Missing date column")?;
        let date = self.parse_date(date_str)?;

        let description = field(record, indices.description).unwrap_or_default();

        Ok(Some(Transaction::new(date, description, amount, source_account)))
    }

    /// Signed amount of a record, income positive
    fn parse_amount_from_record(
        &self,
        record: &StringRecord,
        amounts: AmountIndices,
    ) -> Result<Option<Money>, String> {
        match amounts {
            AmountIndices::Single(col) => match field(record, col) {
                Some(s) if !s.is_empty() => parse_amount_string(s).map(Some),
                _ => Ok(None),
            },
            AmountIndices::DebitCredit { debit, credit } => {
                let debit = field(record, debit).filter(|s| !s.is_empty());
                let credit = field(record, credit).filter(|s| !s.is_empty());
                if debit.is_none() && credit.is_none() {
                    return Ok(None);
                }

                let outflow = match debit {
                    Some(s) => -parse_amount_string(s)?.abs(),
                    None => Money::zero(),
                };
                let inflow = match credit {
                    Some(s) => parse_amount_string(s)?.abs(),
                    None => Money::zero(),
                };
                Ok(Some(outflow + inflow))
            }
        }
    }

    /// Parse a date, trying the layout's format first
    fn parse_date(&self, s: &str) -> Result<NaiveDate, String> {
        std::iter::once(self.layout.date_format)
            .chain(FALLBACK_DATE_FORMATS)
            .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
            .ok_or_else(|| format!("Could not parse date: '{}'", s))
    }
}

fn field(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim)
}

fn parse_amount_string(s: &str) -> Result<Money, String> {
    Money::parse_statement_amount(s).map_err(|e| format!("Could not parse amount '{}': {}", s, e))
}
