//! Configuration module for treasure
//!
//! - XDG-compliant path resolution
//! - User settings persistence
//! - The rules file defining processors and file nicknames

pub mod paths;
pub mod rules;
pub mod settings;

pub use paths::TreasurePaths;
pub use rules::{ProcessorConfig, RulesConfig, RulesFile};
pub use settings::Settings;
