//! Storage layer for household-cli
//!
//! Provides JSON file storage with atomic writes and an append-only audit
//! log of every change.

pub mod bills;
pub mod file_io;
pub mod init;
pub mod residents;

pub use bills::BillRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use residents::ResidentRepository;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::HouseholdPaths;
use crate::error::HouseholdError;

pub(crate) fn lock_error(err: impl std::fmt::Display) -> HouseholdError {
    HouseholdError::Storage(format!("Failed to acquire lock: {}", err))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: HouseholdPaths,
    pub residents: ResidentRepository,
    pub bills: BillRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: HouseholdPaths) -> Result<Self, HouseholdError> {
        paths.ensure_directories()?;

        Ok(Self {
            residents: ResidentRepository::new(paths.residents_file()),
            bills: BillRepository::new(paths.bills_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &HouseholdPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), HouseholdError> {
        self.residents.load()?;
        self.bills.load()?;
        tracing::debug!(
            residents = self.residents.count()?,
            bills = self.bills.count()?,
            "Loaded household data"
        );
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record the creation of an entity in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), HouseholdError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update, with a field-level diff, in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), HouseholdError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a deletion in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), HouseholdError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
