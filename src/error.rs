//! Error types for Treasure
//!
//! Every failure is fatal to the current run: configuration problems are
//! reported before any statement is read, and categorization conflicts stop
//! the whole report rather than skipping the offending row.

use thiserror::Error;

/// The main error type for Treasure operations
#[derive(Error, Debug)]
pub enum TreasureError {
    /// Configuration errors (rules file, settings, unknown formats)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Identifiers claimed by more than one (type, category) pair
    #[error(
        "Configuration error: processor '{rule_set}' maps identifiers to more than one (type, category) pair: {}",
        .identifiers.join(", ")
    )]
    IdentifierConflict {
        rule_set: String,
        identifiers: Vec<String>,
    },

    /// A single description matched identifiers from different categories
    #[error(
        "Transaction '{description}' contained identifiers across multiple categories: {}",
        .identifiers.join(", ")
    )]
    CategorizationConflict {
        description: String,
        identifiers: Vec<String>,
    },

    /// Invalid arguments to the budget-target calculator
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No rule set, or more than one, matches a statement file
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Malformed tax/demographic dataset
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Statement import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl TreasureError {
    /// Create a "not found" error for statement file nicknames
    pub fn nickname_not_found(filename: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Nickname for file",
            identifier: filename.into(),
        }
    }

    /// Create a "not found" error for processors
    pub fn processor_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Processor",
            identifier: name.into(),
        }
    }

    /// Create a "not found" error for percentiles missing from the dataset
    pub fn percentile_not_found(percentile: i32) -> Self {
        Self::NotFound {
            entity_type: "Income percentile",
            identifier: percentile.to_string(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error comes from configuration validation
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::IdentifierConflict { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for TreasureError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TreasureError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for TreasureError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<csv::Error> for TreasureError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for Treasure operations
pub type TreasureResult<T> = Result<T, TreasureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TreasureError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = TreasureError::nickname_not_found("bank1_debit1234.csv");
        assert_eq!(
            err.to_string(),
            "Nickname for file not found: bank1_debit1234.csv"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_categorization_conflict_display() {
        let err = TreasureError::CategorizationConflict {
            description: "AMAZON PRIME VIDEO".into(),
            identifiers: vec!["amazon".into(), "prime video".into()],
        };
        assert_eq!(
            err.to_string(),
            "Transaction 'AMAZON PRIME VIDEO' contained identifiers across multiple categories: amazon, prime video"
        );
    }

    #[test]
    fn test_identifier_conflict_is_config() {
        let err = TreasureError::IdentifierConflict {
            rule_set: "Chase".into(),
            identifiers: vec!["heb".into()],
        };
        assert!(err.is_config());
        assert!(err.to_string().contains("'Chase'"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TreasureError = io_err.into();
        assert!(matches!(err, TreasureError::Io(_)));
    }
}
