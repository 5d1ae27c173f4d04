//! Configuration module for household-cli
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Logging setup

pub mod logging;
pub mod paths;
pub mod settings;

pub use logging::LoggingSettings;
pub use paths::HouseholdPaths;
pub use settings::Settings;
