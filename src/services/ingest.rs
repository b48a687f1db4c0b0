//! Statement directory ingestion
//!
//! Turns a directory of bank exports into one fully materialized list of
//! categorized transactions: each file is dispatched to its rule set,
//! labelled with its nickname, read, filtered and categorized. Files are
//! processed in name order so repeated runs produce identical output.

use std::path::{Path, PathBuf};

use super::categorize::CategorizationService;
use super::dispatch::dispatch;
use super::import::ImportService;
use crate::config::RulesConfig;
use crate::error::{TreasureError, TreasureResult};
use crate::models::CategorizedTransaction;

/// Service for running a statement directory through the rules
pub struct IngestService<'a> {
    config: &'a RulesConfig,
}

impl<'a> IngestService<'a> {
    pub fn new(config: &'a RulesConfig) -> Self {
        Self { config }
    }

    /// Process every statement file in `dir`
    pub fn ingest_directory(&self, dir: &Path) -> TreasureResult<Vec<CategorizedTransaction>> {
        let files = statement_files(dir)?;
        tracing::info!(dir = %dir.display(), files = files.len(), "Opening folder");

        let mut all = Vec::new();
        for path in files {
            all.extend(self.ingest_file(&path)?);
        }
        Ok(all)
    }

    /// Process a single statement file
    pub fn ingest_file(&self, path: &Path) -> TreasureResult<Vec<CategorizedTransaction>> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                TreasureError::Import(format!("Invalid statement file name: {}", path.display()))
            })?;

        let rule_set = dispatch(filename, self.config.rule_sets())?;
        let nickname = self.config.nickname(filename)?;

        let transactions = ImportService::new(rule_set.file_format()).read_file(path, nickname)?;
        CategorizationService::new(rule_set).process(transactions)
    }
}

/// Regular, non-hidden files in `dir`, sorted by name
fn statement_files(dir: &Path) -> TreasureResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        TreasureError::Io(format!("Failed to read directory {}: {}", dir.display(), e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(true, |n| n.starts_with('.'));
        if path.is_file() && !hidden {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
