//! Terminal rendering of rule sets

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::RuleSet;

#[derive(Tabled)]
struct IdentifierRow {
    #[tabled(rename = "Type")]
    transaction_type: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Identifiers")]
    identifiers: String,
}

/// Format one rule set with its identifiers grouped by (type, category)
pub fn format_rule_set(rule_set: &RuleSet) -> String {
    let mut output = String::new();

    output.push_str(&format!("Processor: {}\n", rule_set.name()));
    output.push_str(&format!("  File prefix: {}\n", rule_set.file_prefix()));
    output.push_str(&format!("  File format: {}\n", rule_set.file_format()));
    if rule_set.skip_substrings().is_empty() {
        output.push_str("  Skip: (none)\n");
    } else {
        output.push_str(&format!(
            "  Skip: {}\n",
            rule_set.skip_substrings().join(", ")
        ));
    }

    let rows: Vec<IdentifierRow> = rule_set
        .identifiers_by_category()
        .into_iter()
        .map(|(pair, identifiers)| IdentifierRow {
            transaction_type: pair.transaction_type.to_string(),
            category: pair.category.clone(),
            identifiers: identifiers.join(", "),
        })
        .collect();

    if rows.is_empty() {
        output.push_str("  No identifiers\n");
    } else {
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output
}

/// Format every rule set, one block each
pub fn format_rule_sets(rule_sets: &[RuleSet]) -> String {
    if rule_sets.is_empty() {
        return "No processors configured.\n".to_string();
    }

    rule_sets
        .iter()
        .map(format_rule_set)
        .collect::<Vec<_>>()
        .join("\n")
}
