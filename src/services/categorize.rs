//! Transaction categorization
//!
//! Applies one account's [`RuleSet`] to its statement rows. Rows whose
//! description contains a skip substring are dropped first; every other
//! row is matched by plain substring containment against the rule set's
//! identifiers.
//!
//! A description may match several identifiers. That is fine as long as
//! they all resolve to the same (type, category) pair; otherwise the run
//! stops with [`TreasureError::CategorizationConflict`].

use std::collections::BTreeSet;

use crate::error::{TreasureError, TreasureResult};
use crate::models::{CategorizedTransaction, RuleSet, Transaction, TypeCategory};

/// Service for categorizing one account's transactions
pub struct CategorizationService<'a> {
    rule_set: &'a RuleSet,
}

impl<'a> CategorizationService<'a> {
    pub fn new(rule_set: &'a RuleSet) -> Self {
        Self { rule_set }
    }

    /// Whether a row would be discarded by the skip list
    pub fn is_skipped(&self, transaction: &Transaction) -> bool {
        let description = transaction.normalized_description();
        self.rule_set
            .skip_substrings()
            .iter()
            .any(|skip| description.contains(skip.as_str()))
    }

    /// Drop rows whose description contains any skip substring
    pub fn filter_skipped(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        transactions
            .into_iter()
            .filter(|txn| {
                let skipped = self.is_skipped(txn);
                if skipped {
                    tracing::debug!(
                        processor = self.rule_set.name(),
                        description = %txn.description,
                        amount = %txn.amount,
                        "Skipping transaction"
                    );
                }
                !skipped
            })
            .collect()
    }

    /// Every identifier occurring in the description, in lexical order
    pub fn matching_identifiers(&self, description: &str) -> Vec<&'a str> {
        let description = description.to_lowercase();
        self.rule_set
            .identifiers()
            .map(|(identifier, _)| identifier)
            .filter(|identifier| description.contains(identifier))
            .collect()
    }

    /// Resolve the (type, category) pair for a description
    pub fn resolve(&self, description: &str) -> TreasureResult<TypeCategory> {
        let matching = self.matching_identifiers(description);
        if matching.is_empty() {
            tracing::info!(
                processor = self.rule_set.name(),
                "No category found for {}",
                description
            );
            return Ok(TypeCategory::unclassified());
        }

        let pairs: BTreeSet<&TypeCategory> = matching
            .iter()
            .filter_map(|identifier| self.rule_set.lookup(identifier))
            .collect();

        let mut pairs = pairs.into_iter();
        match (pairs.next(), pairs.next()) {
            (Some(pair), None) => Ok(pair.clone()),
            _ => {
                tracing::error!(
                    processor = self.rule_set.name(),
                    identifiers = ?matching,
                    "Transaction contained identifiers across multiple categories: {}",
                    description
                );
                Err(TreasureError::CategorizationConflict {
                    description: description.to_string(),
                    identifiers: matching.into_iter().map(String::from).collect(),
                })
            }
        }
    }

    /// Categorize a single row
    pub fn categorize_row(
        &self,
        transaction: Transaction,
    ) -> TreasureResult<CategorizedTransaction> {
        let pair = self.resolve(&transaction.description)?;
        Ok(CategorizedTransaction::new(transaction, pair))
    }

    /// Categorize every row, stopping at the first conflict
    pub fn categorize(
        &self,
        transactions: Vec<Transaction>,
    ) -> TreasureResult<Vec<CategorizedTransaction>> {
        transactions
            .into_iter()
            .map(|txn| self.categorize_row(txn))
            .collect()
    }

    /// Skip filter followed by categorization
    pub fn process(
        &self,
        transactions: Vec<Transaction>,
    ) -> TreasureResult<Vec<CategorizedTransaction>> {
        self.categorize(self.filter_skipped(transactions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryMap, FileFormat, Money, TransactionType, NO_CATEGORY};
    use chrono::NaiveDate;

    fn rule_set(categories: &str, skip: &[&str]) -> RuleSet {
        let map: CategoryMap = serde_json::from_str(categories).unwrap();
        RuleSet::new("Bank", "bank", FileFormat::BoaDebit, skip, &map).unwrap()
    }

    fn txn(description: &str, cents: i64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description,
            Money::from_cents(cents),
            "Checking",
        )
    }

    #[test]
    fn test_skip_then_categorize() {
        let rules = rule_set(r#"{"income": {"salary": ["acme corp"]}}"#, &["auto pay"]);
        let service = CategorizationService::new(&rules);

        let rows = vec![
            txn("ACME CORP deposit", 500000),
            txn("auto pay rent", -150000),
            txn("unmatched store", -2500),
        ];

        let kept = service.filter_skipped(rows);
        assert_eq!(kept.len(), 2);

        let categorized = service.categorize(kept).unwrap();
        assert_eq!(categorized[0].transaction_type, TransactionType::Income);
        assert_eq!(categorized[0].category, "salary");
        assert_eq!(categorized[1].transaction_type, TransactionType::Unclassified);
        assert_eq!(categorized[1].category, NO_CATEGORY);
    }

    #[test]
    fn test_skip_is_case_insensitive_substring() {
        let rules = rule_set(r#"{}"#, &["Online Transfer"]);
        let service = CategorizationService::new(&rules);

        assert!(service.is_skipped(&txn("ONLINE TRANSFER TO SAV 1234", -100)));
        assert!(service.is_skipped(&txn("xxonline transferxx", -100)));
        assert!(!service.is_skipped(&txn("online xfer", -100)));
    }

    #[test]
    fn test_multiple_identifiers_same_pair() {
        let rules = rule_set(r#"{"expense": {"groceries": ["heb", "h-e-b", "heb #"]}}"#, &[]);
        let service = CategorizationService::new(&rules);

        let row = service.categorize_row(txn("HEB #123 h-e-b", -4200)).unwrap();
        assert_eq!(row.transaction_type, TransactionType::Expense);
        assert_eq!(row.category, "groceries");
        assert_eq!(service.matching_identifiers("HEB #123 h-e-b").len(), 3);
    }

    #[test]
    fn test_conflict_across_pairs() {
        let rules = rule_set(
            r#"{"expense": {"groceries": ["heb"], "transport": ["shell"]}}"#,
            &[],
        );
        let service = CategorizationService::new(&rules);

        let err = service
            .categorize(vec![txn("ok row", -1), txn("HEB SHELL STATION", -3000)])
            .unwrap_err();

        match err {
            TreasureError::CategorizationConflict {
                description,
                identifiers,
            } => {
                assert_eq!(description, "HEB SHELL STATION");
                assert_eq!(identifiers, vec!["heb".to_string(), "shell".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_conflict_across_types() {
        let rules = rule_set(
            r#"{"income": {"refunds": ["zelle from"]}, "giving": {"friends": ["zelle"]}}"#,
            &[],
        );
        let service = CategorizationService::new(&rules);
        assert!(service.resolve("Zelle from Sam").is_err());
        assert_eq!(
            service.resolve("Zelle to Sam").unwrap(),
            TypeCategory::new(TransactionType::Giving, "friends")
        );
    }

    #[test]
    fn test_trailing_space_in_identifier_is_significant() {
        let rules = rule_set(
            r#"{"income": {"pay": ["pay "]}, "expense": {"paypal": ["paypal"]}}"#,
            &[],
        );
        let service = CategorizationService::new(&rules);

        assert_eq!(service.matching_identifiers("PAYPAL *STORE"), vec!["paypal"]);
        assert_eq!(
            service.resolve("PAYPAL *STORE").unwrap(),
            TypeCategory::new(TransactionType::Expense, "paypal")
        );
        assert_eq!(
            service.resolve("DIRECT PAY ACME").unwrap(),
            TypeCategory::new(TransactionType::Income, "pay")
        );
    }

    #[test]
    fn test_order_independent() {
        let a = rule_set(
            r#"{"expense": {"dining": ["cafe", "bistro"], "groceries": ["market"]}}"#,
            &[],
        );
        let b = rule_set(
            r#"{"expense": {"groceries": ["market"], "dining": ["bistro", "cafe"]}}"#,
            &[],
        );

        for description in ["Corner Cafe", "Farmers Market", "Bistro Cafe", "Nothing"] {
            let left = CategorizationService::new(&a).resolve(description).unwrap();
            let right = CategorizationService::new(&b).resolve(description).unwrap();
            assert_eq!(left, right);
            assert_eq!(
                CategorizationService::new(&a).resolve(description).unwrap(),
                left
            );
        }
    }

    #[test]
    fn test_process_keeps_amounts() {
        let rules = rule_set(r#"{"giving": {"church": ["grace"]}}"#, &["auto pay"]);
        let service = CategorizationService::new(&rules);

        let rows = service
            .process(vec![txn("Grace Fellowship", -10000), txn("AUTO PAY card", -5)])
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount(), Money::from_cents(-10000));
        assert_eq!(rows[0].transaction.source_account, "Checking");
    }
}
