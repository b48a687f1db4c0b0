//! Summary Report
//!
//! Totals and per-category breakdowns for income, expenses and giving,
//! compared against the monthly line. Expense and giving amounts are
//! stored negative and reported as positive totals. Giving sits above the
//! line: it is excluded from the line-minus-expenses comparison.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::error::{TreasureError, TreasureResult};
use crate::models::{CategorizedTransaction, Money, Transaction, TransactionType};

/// One category within a type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    /// Sign-adjusted total (positive for all three types)
    pub total: Money,
    pub transaction_count: usize,
    /// Share of the type's total
    pub percentage: f64,
}

/// Totals for one transaction type
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeSummary {
    pub total: Money,
    /// Sorted by category name
    pub categories: Vec<CategoryBreakdown>,
}

impl TypeSummary {
    fn from_rows<'a>(rows: impl Iterator<Item = &'a CategorizedTransaction>, flip: bool) -> Self {
        let mut by_category: BTreeMap<&str, (Money, usize)> = BTreeMap::new();
        for row in rows {
            let amount = if flip { -row.amount() } else { row.amount() };
            let entry = by_category
                .entry(row.category.as_str())
                .or_insert((Money::zero(), 0));
            entry.0 += amount;
            entry.1 += 1;
        }

        let total: Money = by_category.values().map(|(amount, _)| *amount).sum();

        let categories = by_category
            .into_iter()
            .map(|(category, (amount, count))| CategoryBreakdown {
                category: category.to_string(),
                total: amount,
                transaction_count: count,
                percentage: if total.is_zero() {
                    0.0
                } else {
                    (amount.cents() as f64 / total.cents() as f64) * 100.0
                },
            })
            .collect();

        Self { total, categories }
    }

    /// The breakdown for a category, if any row carried it
    pub fn category(&self, name: &str) -> Option<&CategoryBreakdown> {
        self.categories.iter().find(|c| c.category == name)
    }
}

/// Result of one run, built once from the full categorized set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub income: TypeSummary,
    pub expense: TypeSummary,
    pub giving: TypeSummary,
    /// Income minus expenses minus giving
    pub net_cash_flow: Money,
    /// The monthly line
    pub monthly_target: f64,
    /// Line minus expenses; giving is not counted against the line
    pub target_minus_expenses: f64,
    /// Rows no identifier matched, in input order
    pub unclassified: Vec<Transaction>,
    pub transaction_count: usize,
}

impl SummaryReport {
    /// Aggregate categorized rows against a monthly target
    pub fn generate(rows: &[CategorizedTransaction], monthly_target: f64) -> Self {
        let of_type =
            |t: TransactionType| rows.iter().filter(move |row| row.transaction_type == t);

        let income = TypeSummary::from_rows(of_type(TransactionType::Income), false);
        let expense = TypeSummary::from_rows(of_type(TransactionType::Expense), true);
        let giving = TypeSummary::from_rows(of_type(TransactionType::Giving), true);

        let unclassified: Vec<Transaction> = of_type(TransactionType::Unclassified)
            .map(|row| row.transaction.clone())
            .collect();

        let net_cash_flow = income.total - expense.total - giving.total;
        let target_minus_expenses = monthly_target - expense.total.as_f64();

        Self {
            income,
            expense,
            giving,
            net_cash_flow,
            monthly_target,
            target_minus_expenses,
            unclassified,
            transaction_count: rows.len(),
        }
    }

    /// Summary for a classified type
    pub fn summary(&self, transaction_type: TransactionType) -> Option<&TypeSummary> {
        match transaction_type {
            TransactionType::Income => Some(&self.income),
            TransactionType::Expense => Some(&self.expense),
            TransactionType::Giving => Some(&self.giving),
            TransactionType::Unclassified => None,
        }
    }

    /// Export the report to CSV format
    ///
    /// One row per category, then the totals, then every unclassified row.
    pub fn export_csv<W: Write>(&self, writer: W) -> TreasureResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| TreasureError::Export(e.to_string());

        csv.write_record(["Section", "Type", "Category", "Date", "Description", "Amount", "Count"])
            .map_err(export_err)?;

        for transaction_type in TransactionType::RULE_TYPES {
            let Some(summary) = self.summary(transaction_type) else {
                continue;
            };
            for category in &summary.categories {
                csv.write_record([
                    "category",
                    transaction_type.as_str(),
                    category.category.as_str(),
                    "",
                    "",
                    &format!("{:.2}", category.total.as_f64()),
                    &category.transaction_count.to_string(),
                ])
                .map_err(export_err)?;
            }
            csv.write_record([
                "total",
                transaction_type.as_str(),
                "",
                "",
                "",
                &format!("{:.2}", summary.total.as_f64()),
                "",
            ])
            .map_err(export_err)?;
        }

        let figures = [
            ("net_cash_flow", self.net_cash_flow.as_f64()),
            ("monthly_target", self.monthly_target),
            ("target_minus_expenses", self.target_minus_expenses),
        ];
        for (label, value) in figures {
            csv.write_record([label, "", "", "", "", &format!("{:.2}", value), ""])
                .map_err(export_err)?;
        }

        for txn in &self.unclassified {
            csv.write_record([
                "unclassified",
                TransactionType::Unclassified.as_str(),
                txn.source_account.as_str(),
                &txn.date.to_string(),
                txn.description.as_str(),
                &format!("{:.2}", txn.amount.as_f64()),
                "",
            ])
            .map_err(export_err)?;
        }

        csv.flush()
            .map_err(|e| TreasureError::Export(e.to_string()))?;
        Ok(())
    }
}
