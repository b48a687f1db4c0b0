//! User settings for treasure
//!
//! Defaults for the household and display options, so `run` and `line`
//! can be invoked without repeating them.

use serde::{Deserialize, Serialize};

use super::paths::TreasurePaths;
use crate::error::TreasureError;

/// User settings for treasure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Household size used when `-n` is omitted
    #[serde(default = "default_household_size")]
    pub household_size: i32,

    /// Target income percentile used when `-p` is omitted
    #[serde(default = "default_percentile")]
    pub percentile: i32,

    /// Currency symbol for terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Colored terminal output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_household_size() -> i32 {
    1
}

fn default_percentile() -> i32 {
    50
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_color() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            household_size: default_household_size(),
            percentile: default_percentile(),
            currency_symbol: default_currency(),
            color: default_color(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    pub fn load_or_create(paths: &TreasurePaths) -> Result<Self, TreasureError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                TreasureError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TreasureError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Not persisted until the caller saves
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TreasurePaths) -> Result<(), TreasureError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            TreasureError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            TreasureError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
