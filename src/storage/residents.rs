//! Resident repository for JSON storage
//!
//! Manages loading and saving residents to residents.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::HouseholdError;
use crate::models::{Resident, ResidentId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ResidentData {
    residents: Vec<Resident>,
}

/// Repository for resident persistence
pub struct ResidentRepository {
    path: PathBuf,
    data: RwLock<HashMap<ResidentId, Resident>>,
}

impl ResidentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load residents from disk
    pub fn load(&self) -> Result<(), HouseholdError> {
        let file_data: ResidentData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(lock_error)?;

        data.clear();
        for resident in file_data.residents {
            data.insert(resident.id, resident);
        }

        Ok(())
    }

    /// Save residents to disk, sorted by name
    pub fn save(&self) -> Result<(), HouseholdError> {
        let residents = self.get_all()?;
        write_json_atomic(&self.path, &ResidentData { residents })
    }

    pub fn get(&self, id: ResidentId) -> Result<Option<Resident>, HouseholdError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All residents, sorted by name
    pub fn get_all(&self) -> Result<Vec<Resident>, HouseholdError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut residents: Vec<_> = data.values().cloned().collect();
        residents.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(residents)
    }

    /// Find a resident by name (case-insensitive)
    pub fn find_by_name(&self, name: &str) -> Result<Option<Resident>, HouseholdError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.values().find(|r| r.has_name(name)).cloned())
    }

    /// Find a resident by short or full id
    pub fn find_by_id_str(&self, identifier: &str) -> Result<Option<Resident>, HouseholdError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.values().find(|r| r.id.matches(identifier)).cloned())
    }

    /// Insert or update a resident
    pub fn upsert(&self, resident: Resident) -> Result<(), HouseholdError> {
        let mut data = self.data.write().map_err(lock_error)?;
        data.insert(resident.id, resident);
        Ok(())
    }

    /// Remove a resident, returning it if it existed
    pub fn delete(&self, id: ResidentId) -> Result<Option<Resident>, HouseholdError> {
        let mut data = self.data.write().map_err(lock_error)?;
        Ok(data.remove(&id))
    }

    pub fn count(&self) -> Result<usize, HouseholdError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}
