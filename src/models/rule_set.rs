//! Category rule sets
//!
//! A rule set belongs to one monitored account. It maps lowercase
//! identifier substrings to a (type, category) pair and lists substrings
//! whose transactions are discarded before categorization.
//!
//! Construction is the only place the uniqueness invariant is checked: an
//! identifier claimed by two different (type, category) pairs is rejected
//! here, so a built [`RuleSet`] can never hold an ambiguous identifier.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{TreasureError, TreasureResult};

use super::file_format::FileFormat;
use super::transaction::{TransactionType, TypeCategory};

/// Identifiers as written in configuration: type key -> category -> identifiers
pub type CategoryMap = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Rules for categorizing one account's statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    name: String,
    file_prefix: String,
    file_format: FileFormat,
    skip_substrings: Vec<String>,
    identifiers: BTreeMap<String, TypeCategory>,
}

impl RuleSet {
    /// Build a rule set from the configuration shape of its categories
    ///
    /// Type keys must be one of "income", "expense" or "giving".
    /// Identifiers and skip substrings are lowercased.
    pub fn new<I, S>(
        name: impl Into<String>,
        file_prefix: impl Into<String>,
        file_format: FileFormat,
        skip_substrings: I,
        categories: &CategoryMap,
    ) -> TreasureResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        let mut pairs = Vec::new();

        for (type_key, by_category) in categories {
            let transaction_type = TransactionType::parse_rule_type(type_key).ok_or_else(|| {
                TreasureError::Config(format!(
                    "Processor: {} - Unrecognized transaction type '{}'. Valid types: income, expense, giving",
                    name, type_key
                ))
            })?;

            for (category, identifiers) in by_category {
                for identifier in identifiers {
                    pairs.push((
                        identifier.clone(),
                        TypeCategory::new(transaction_type, category.clone()),
                    ));
                }
            }
        }

        Self::from_identifiers(name, file_prefix, file_format, skip_substrings, pairs)
    }

    /// Build a rule set from (identifier, pair) entries
    ///
    /// Fails if any identifier, after lowercasing, is claimed by more than
    /// one distinct (type, category) pair. Every offending identifier is
    /// logged and listed in the error. Repeating an identifier under the
    /// same pair is harmless.
    pub fn from_identifiers<I, S, P>(
        name: impl Into<String>,
        file_prefix: impl Into<String>,
        file_format: FileFormat,
        skip_substrings: I,
        pairs: P,
    ) -> TreasureResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        P: IntoIterator<Item = (String, TypeCategory)>,
    {
        let name = name.into();

        let mut claims: BTreeMap<String, BTreeSet<TypeCategory>> = BTreeMap::new();
        for (identifier, pair) in pairs {
            let identifier = normalize(&identifier);
            if identifier.is_empty() {
                return Err(TreasureError::Config(format!(
                    "Processor: {} - Identifiers cannot be empty (category '{}')",
                    name, pair.category
                )));
            }
            claims.entry(identifier).or_default().insert(pair);
        }

        let conflicts: Vec<String> = claims
            .iter()
            .filter(|(_, pairs)| pairs.len() > 1)
            .map(|(identifier, pairs)| {
                let found_in: Vec<String> = pairs.iter().map(|p| p.to_string()).collect();
                tracing::error!(
                    processor = %name,
                    "{} is found in the following (type, category) pairs: {}",
                    identifier,
                    found_in.join(", ")
                );
                identifier.clone()
            })
            .collect();

        if !conflicts.is_empty() {
            return Err(TreasureError::IdentifierConflict {
                rule_set: name,
                identifiers: conflicts,
            });
        }

        let identifiers = claims
            .into_iter()
            .filter_map(|(identifier, pairs)| pairs.into_iter().next().map(|p| (identifier, p)))
            .collect();

        let mut skip = Vec::new();
        for substring in skip_substrings {
            let substring = normalize(substring.as_ref());
            if substring.is_empty() {
                return Err(TreasureError::Config(format!(
                    "Processor: {} - Skip substrings cannot be empty",
                    name
                )));
            }
            if !skip.contains(&substring) {
                skip.push(substring);
            }
        }

        Ok(Self {
            name,
            file_prefix: file_prefix.into(),
            file_format,
            skip_substrings: skip,
            identifiers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Statement file names starting with this prefix belong to this rule set
    pub fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    pub fn file_format(&self) -> FileFormat {
        self.file_format
    }

    /// Lowercase substrings marking transactions to discard
    pub fn skip_substrings(&self) -> &[String] {
        &self.skip_substrings
    }

    /// All identifiers with their pair, in lexical order
    pub fn identifiers(&self) -> impl Iterator<Item = (&str, &TypeCategory)> {
        self.identifiers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The pair an identifier maps to
    pub fn lookup(&self, identifier: &str) -> Option<&TypeCategory> {
        self.identifiers.get(identifier)
    }

    pub fn identifier_count(&self) -> usize {
        self.identifiers.len()
    }

    /// Identifiers grouped back by pair, for display
    pub fn identifiers_by_category(&self) -> BTreeMap<&TypeCategory, Vec<&str>> {
        let mut grouped: BTreeMap<&TypeCategory, Vec<&str>> = BTreeMap::new();
        for (identifier, pair) in &self.identifiers {
            grouped.entry(pair).or_default().push(identifier);
        }
        grouped
    }
}

fn normalize(s: &str) -> String {
    s.to_lowercase()
}
