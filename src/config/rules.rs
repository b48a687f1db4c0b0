//! Rules configuration
//!
//! The rules file names the statement files and defines one processor per
//! monitored account. Loading validates everything up front: a config that
//! loads cleanly can be applied to any number of statements without a
//! configuration error surfacing halfway through.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TreasureError, TreasureResult};
use crate::models::{CategoryMap, FileFormat, RuleSet};

/// One processor as written in the rules file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    pub name: String,
    pub file_prefix: String,
    pub file_format: String,
    #[serde(default)]
    pub skip_transactions: Vec<String>,
    #[serde(default)]
    pub categories: CategoryMap,
}

/// The rules file as written on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesFile {
    #[serde(default)]
    pub file_nicknames: BTreeMap<String, String>,
    #[serde(default)]
    pub processors: Vec<ProcessorConfig>,
}

impl RulesFile {
    /// Parse a rules file, YAML when the extension says so, JSON otherwise
    pub fn read(path: &Path) -> TreasureResult<Self> {
        if !path.exists() {
            return Err(TreasureError::Config(format!(
                "Rules file not found: {}",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| TreasureError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

        if is_yaml(path) {
            serde_yaml::from_str(&contents).map_err(|e| {
                TreasureError::Config(format!("Failed to parse {}: {}", path.display(), e))
            })
        } else {
            serde_json::from_str(&contents).map_err(|e| {
                TreasureError::Config(format!("Failed to parse {}: {}", path.display(), e))
            })
        }
    }

    /// Validate and build the rule sets
    pub fn into_config(self) -> TreasureResult<RulesConfig> {
        ensure_unique_names(&self.processors)?;

        let rule_sets = self
            .processors
            .iter()
            .map(build_rule_set)
            .collect::<TreasureResult<Vec<_>>>()?;

        Ok(RulesConfig {
            nicknames: self.file_nicknames,
            rule_sets,
        })
    }
}

/// Validated rule sets plus the statement file nicknames
#[derive(Debug, Clone, PartialEq)]
pub struct RulesConfig {
    nicknames: BTreeMap<String, String>,
    rule_sets: Vec<RuleSet>,
}

impl RulesConfig {
    /// Read and validate a rules file
    pub fn load(path: &Path) -> TreasureResult<Self> {
        let config = RulesFile::read(path)?.into_config()?;
        tracing::debug!(
            path = %path.display(),
            processors = config.rule_sets.len(),
            nicknames = config.nicknames.len(),
            "Loaded rules"
        );
        Ok(config)
    }

    pub fn rule_sets(&self) -> &[RuleSet] {
        &self.rule_sets
    }

    /// Find a rule set by name (case-insensitive)
    pub fn rule_set(&self, name: &str) -> TreasureResult<&RuleSet> {
        self.rule_sets
            .iter()
            .find(|rs| rs.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| TreasureError::processor_not_found(name))
    }

    /// The account label for a statement file name
    pub fn nickname(&self, filename: &str) -> TreasureResult<&str> {
        self.nicknames
            .get(filename)
            .map(String::as_str)
            .ok_or_else(|| TreasureError::nickname_not_found(filename))
    }

    pub fn nicknames(&self) -> &BTreeMap<String, String> {
        &self.nicknames
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

fn ensure_unique_names(processors: &[ProcessorConfig]) -> TreasureResult<()> {
    let mut seen = BTreeSet::new();
    let duplicates: BTreeSet<&str> = processors
        .iter()
        .filter(|p| !seen.insert(p.name.to_lowercase()))
        .map(|p| p.name.as_str())
        .collect();

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(TreasureError::Config(format!(
            "Processor names must be unique. Duplicates: {}",
            duplicates.into_iter().collect::<Vec<_>>().join(", ")
        )))
    }
}

fn build_rule_set(processor: &ProcessorConfig) -> TreasureResult<RuleSet> {
    let file_format = FileFormat::parse(&processor.file_format).ok_or_else(|| {
        TreasureError::Config(format!(
            "Processor: {} - Unrecognized file format '{}'. Valid formats: {}",
            processor.name,
            processor.file_format,
            FileFormat::valid_keys()
        ))
    })?;

    RuleSet::new(
        processor.name.clone(),
        processor.file_prefix.clone(),
        file_format,
        &processor.skip_transactions,
        &processor.categories,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionType, TypeCategory};
    use tempfile::TempDir;

    const CONFIG: &str = r#"{
        "file_nicknames": {
            "bank1_debit_jan.csv": "Checking",
            "card_jan.csv": "Sapphire"
        },
        "processors": [
            {
                "name": "Bank1 Debit",
                "file_prefix": "bank1_debit",
                "file_format": "boa_debit",
                "skip_transactions": ["Auto Pay"],
                "categories": {
                    "income": {"salary": ["ACME CORP"]},
                    "giving": {"church": ["grace fellowship"]}
                }
            },
            {
                "name": "Card",
                "file_prefix": "card",
                "file_format": "chase_credit",
                "skip_transactions": [],
                "categories": {"expense": {"groceries": ["heb"]}}
            }
        ]
    }"#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "config.json", CONFIG);

        let config = RulesConfig::load(&path).unwrap();
        assert_eq!(config.rule_sets().len(), 2);
        assert_eq!(config.nickname("card_jan.csv").unwrap(), "Sapphire");

        let bank = config.rule_set("bank1 debit").unwrap();
        assert_eq!(bank.file_format(), FileFormat::BoaDebit);
        assert_eq!(bank.skip_substrings(), &["auto pay".to_string()]);
        assert_eq!(
            bank.lookup("acme corp"),
            Some(&TypeCategory::new(TransactionType::Income, "salary"))
        );
    }

    #[test]
    fn test_load_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "rules.yaml",
            r#"
file_nicknames:
  card_jan.csv: Sapphire
processors:
  - name: Card
    file_prefix: card
    file_format: chase_credit
    categories:
      expense:
        groceries: [heb, costco]
"#,
        );

        let config = RulesConfig::load(&path).unwrap();
        let card = config.rule_set("Card").unwrap();
        assert_eq!(card.identifier_count(), 2);
        assert!(card.skip_substrings().is_empty());
    }

    #[test]
    fn test_duplicate_processor_names() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "config.json",
            r#"{"processors": [
                {"name": "Card", "file_prefix": "a", "file_format": "chase_credit"},
                {"name": "Card", "file_prefix": "b", "file_format": "citi_credit"}
            ]}"#,
        );

        let err = RulesConfig::load(&path).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Card"));
    }

    #[test]
    fn test_processor_names_differing_in_case_are_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "config.json",
            r#"{"processors": [
                {"name": "Bank", "file_prefix": "a", "file_format": "boa_debit"},
                {"name": "bank", "file_prefix": "b", "file_format": "boa_debit"}
            ]}"#,
        );

        let err = RulesConfig::load(&path).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Duplicates: bank"));
    }

    #[test]
    fn test_unknown_file_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "config.json",
            r#"{"processors": [
                {"name": "Chase Debit", "file_prefix": "a", "file_format": "chase_debit"}
            ]}"#,
        );

        let err = RulesConfig::load(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("chase_debit"));
        assert!(message.contains("boa_debit"));
    }

    #[test]
    fn test_identifier_conflict_fails_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "config.json",
            r#"{"processors": [{
                "name": "Card", "file_prefix": "card", "file_format": "chase_credit",
                "categories": {"expense": {"groceries": ["heb"], "dining": ["HEB"]}}
            }]}"#,
        );

        let err = RulesConfig::load(&path).unwrap_err();
        assert!(matches!(err, TreasureError::IdentifierConflict { .. }));
    }

    #[test]
    fn test_missing_nickname() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "config.json", CONFIG);
        let config = RulesConfig::load(&path).unwrap();

        assert!(config.nickname("other.csv").unwrap_err().is_not_found());
        assert!(config.rule_set("Nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = RulesConfig::load(&temp_dir.path().join("config.json")).unwrap_err();
        assert!(err.is_config());
    }
}
