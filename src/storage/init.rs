//! Storage initialization
//!
//! Handles first-run setup: directories and empty data files.

use crate::config::paths::HouseholdPaths;
use crate::error::HouseholdError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh household
///
/// Existing data files are left untouched, so running it twice is harmless.
pub fn initialize_storage(paths: &HouseholdPaths) -> Result<(), HouseholdError> {
    paths.ensure_directories()?;

    if !paths.residents_file().exists() {
        write_json_atomic(paths.residents_file(), &serde_json::json!({ "residents": [] }))?;
    }

    if !paths.bills_file().exists() {
        write_json_atomic(paths.bills_file(), &serde_json::json!({ "bills": [] }))?;
    }

    tracing::info!(base_dir = %paths.base_dir().display(), "Initialized household storage");
    Ok(())
}
