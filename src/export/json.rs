//! JSON Export functionality
//!
//! Exports the complete household to JSON with schema versioning.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::export_error;
use crate::error::HouseholdResult;
use crate::models::{Bill, Money, Resident};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full household export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub residents: Vec<Resident>,

    pub bills: Vec<Bill>,

    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub resident_count: usize,
    pub bill_count: usize,
    /// Sum of all unpaid shares
    pub outstanding: Money,
    pub earliest_due: Option<String>,
    pub latest_due: Option<String>,
}

impl FullExport {
    /// Snapshot everything in storage
    pub fn from_storage(storage: &Storage) -> HouseholdResult<Self> {
        let residents = storage.residents.get_all()?;
        let bills = storage.bills.get_all()?;

        let metadata = ExportMetadata {
            resident_count: residents.len(),
            bill_count: bills.len(),
            outstanding: bills.iter().map(Bill::outstanding).sum(),
            earliest_due: bills.iter().map(|b| b.due_date).min().map(|d| d.to_string()),
            latest_due: bills.iter().map(|b| b.due_date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            residents,
            bills,
            metadata,
        })
    }

    /// Check schema version, bill integrity and resident references
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let resident_ids: HashSet<_> = self.residents.iter().map(|r| r.id).collect();

        for bill in &self.bills {
            bill.validate()
                .map_err(|e| format!("Bill {} is invalid: {}", bill.id, e))?;

            if !resident_ids.contains(&bill.responsible_id) {
                return Err(format!(
                    "Bill {} references unknown resident {}",
                    bill.id, bill.responsible_id
                ));
            }
            if let Some(share) = bill
                .shares
                .iter()
                .find(|s| !resident_ids.contains(&s.resident_id))
            {
                return Err(format!(
                    "Bill {} has a share for unknown resident {}",
                    bill.id, share.resident_id
                ));
            }
        }

        Ok(())
    }
}

/// Export the full household to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> HouseholdResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(export_error)
}
