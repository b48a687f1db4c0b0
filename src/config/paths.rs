//! Path management for treasure
//!
//! ## Path Resolution Order
//!
//! 1. `TREASURE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/treasure` or `~/.config/treasure`
//! 3. Windows: `%APPDATA%\treasure`

use std::path::PathBuf;

use crate::error::TreasureError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "TREASURE_DATA_DIR";

/// Manages all paths used by treasure
#[derive(Debug, Clone)]
pub struct TreasurePaths {
    base_dir: PathBuf,
}

impl TreasurePaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, TreasureError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create TreasurePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/treasure/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    /// Get the path to the default rules file
    pub fn rules_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the default dataset directory (~/.config/treasure/flp/)
    pub fn dataset_dir(&self) -> PathBuf {
        self.base_dir.join("flp")
    }

    /// Ensure the base and dataset directories exist
    pub fn ensure_directories(&self) -> Result<(), TreasureError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TreasureError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.dataset_dir()).map_err(|e| {
            TreasureError::Io(format!("Failed to create dataset directory: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, TreasureError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                TreasureError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("treasure"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, TreasureError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| TreasureError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("treasure"))
}
