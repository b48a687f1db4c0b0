//! Terminal rendering of the summary report and the line breakdown

use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Money, TransactionType};
use crate::reports::{SummaryReport, TypeSummary};
use crate::services::LineBreakdown;

/// Width of the separator lines between sections
pub const SEPARATOR_WIDTH: usize = 50;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "%")]
    percentage: String,
}

#[derive(Tabled)]
struct UnclassifiedRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Green section separator
pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH).green().to_string()
}

/// A signed figure in red when negative, green otherwise
pub fn format_delta(value: f64) -> String {
    let text = format!("{:.2}", value);
    if value < 0.0 {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

fn category_table(summary: &TypeSummary, symbol: &str) -> String {
    if summary.categories.is_empty() {
        return "  (none)".to_string();
    }

    let rows = summary.categories.iter().map(|c| CategoryRow {
        category: c.category.clone(),
        amount: c.total.format_with_symbol(symbol),
        count: c.transaction_count,
        percentage: format_percentage(c.percentage),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

fn unclassified_table(report: &SummaryReport, symbol: &str) -> String {
    let rows = report.unclassified.iter().map(|txn| UnclassifiedRow {
        date: txn.date.to_string(),
        account: txn.source_account.clone(),
        description: txn.description.clone(),
        amount: txn.amount.format_with_symbol(symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

fn money(amount: Money, symbol: &str) -> String {
    amount.format_with_symbol(symbol)
}

/// Format the summary report for terminal display
pub fn format_summary(report: &SummaryReport, symbol: &str) -> String {
    let mut output = String::new();
    let sep = separator();

    output.push_str(&format!("{}\n", sep));
    output.push_str(&format!(
        "You have stored {} as treasure this month\n",
        money(report.giving.total, symbol).yellow()
    ));
    output.push_str(&format!("{}\n", sep));
    output.push_str(&format!("In: {}\n", money(report.income.total, symbol)));
    output.push_str(&format!("Expenses: {}\n", money(report.expense.total, symbol)));
    output.push_str(&format!("Giving: {}\n", money(report.giving.total, symbol)));
    output.push_str(&format!(
        "In - Out: {}\n",
        format_delta(report.net_cash_flow.as_f64())
    ));
    output.push_str(&format!("{}\n", sep));
    output.push_str(&format!(
        "Your line is {}\n",
        format!("{:.2}", report.monthly_target).on_blue()
    ));
    output.push_str(&format!(
        "Line - Expenses: {}\n",
        format_delta(report.target_minus_expenses)
    ));

    for transaction_type in TransactionType::RULE_TYPES {
        let Some(summary) = report.summary(transaction_type) else {
            continue;
        };
        let title = match transaction_type {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expenses",
            _ => "Giving",
        };
        output.push_str(&format!("{}\n", sep));
        output.push_str(&format!("{} by category:\n", title));
        output.push_str(&category_table(summary, symbol));
        output.push('\n');
    }

    output.push_str(&format!("{}\n", sep));
    if report.unclassified.is_empty() {
        output.push_str("Every transaction matched an identifier.\n");
    } else {
        output.push_str(
            "Transactions that did not match any identifiers. \
             Please update the config or the row to make them match an identifier:\n",
        );
        output.push_str(&unclassified_table(report, symbol));
        output.push('\n');
    }

    output
}

/// Format the stages of a line computation
pub fn format_line_breakdown(breakdown: &LineBreakdown) -> String {
    let mut output = String::new();
    let sep = separator();

    output.push_str(&format!(
        "Household of {} at percentile {} ({} filing)\n",
        breakdown.household_size, breakdown.percentile, breakdown.filing_status
    ));
    output.push_str(&format!("{}\n", sep));
    output.push_str(&format!(
        "{:<24} {:>14.2}\n",
        "Gross income", breakdown.scaled_gross_income
    ));
    output.push_str(&format!(
        "{:<24} {:>14.2}\n",
        "Federal taxable income", breakdown.federal_taxable_income
    ));
    output.push_str(&format!(
        "{:<24} {:>14.2}\n",
        "Federal income tax", breakdown.federal_income_tax
    ));
    output.push_str(&format!("{:<24} {:>14.2}\n", "FICA", breakdown.fica_tax));
    output.push_str(&format!("{:<24} {:>14.2}\n", "State tax", breakdown.state_tax));
    output.push_str(&format!("{}\n", sep));
    output.push_str(&format!(
        "{:<24} {:>14.2}\n",
        "Annual line", breakdown.annual_line
    ));
    output.push_str(&format!(
        "Your line is {}\n",
        format!("{:.2}", breakdown.monthly_line).on_blue()
    ));

    output
}
