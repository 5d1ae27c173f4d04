//! Export module for household-cli
//!
//! Provides data export in multiple formats:
//! - CSV: one row per bill share (spreadsheet-compatible)
//! - JSON: machine-readable full household snapshot
//! - YAML: human-readable full household snapshot

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_residents_csv, export_shares_csv};
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;

use crate::error::HouseholdError;

pub(crate) fn export_error(err: impl std::fmt::Display) -> HouseholdError {
    HouseholdError::Export(err.to_string())
}
