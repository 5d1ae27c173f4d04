//! Path management for household-cli
//!
//! Provides XDG-compliant path resolution for configuration, data, and the
//! audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `HOUSEHOLD_CLI_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/household-cli` or `~/.config/household-cli`
//! 3. Windows: `%APPDATA%\household-cli`

use std::path::PathBuf;

use crate::error::HouseholdError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "HOUSEHOLD_CLI_DATA_DIR";

/// Manages all paths used by household-cli
#[derive(Debug, Clone)]
pub struct HouseholdPaths {
    base_dir: PathBuf,
}

impl HouseholdPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if neither the override nor a home directory can be
    /// determined.
    pub fn new() -> Result<Self, HouseholdError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to residents.json
    pub fn residents_file(&self) -> PathBuf {
        self.data_dir().join("residents.json")
    }

    /// Get the path to bills.json
    pub fn bills_file(&self) -> PathBuf {
        self.data_dir().join("bills.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), HouseholdError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| HouseholdError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| HouseholdError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if household-cli has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, HouseholdError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                HouseholdError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("household-cli"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, HouseholdError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| HouseholdError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("household-cli"))
}
