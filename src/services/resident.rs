//! Resident service
//!
//! Business logic for residents: creation with duplicate checks, lookup by
//! name or id, edits, and removal guarded by bill references.

use chrono::Utc;

use crate::audit::EntityType;
use crate::error::{HouseholdError, HouseholdResult};
use crate::models::{Resident, ResidentId};
use crate::storage::Storage;

/// Service for resident management
pub struct ResidentService<'a> {
    storage: &'a Storage,
}

/// Optional field changes for [`ResidentService::update`]
///
/// An empty string clears `email` or `pix_key`.
#[derive(Debug, Clone, Default)]
pub struct ResidentChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub pix_key: Option<String>,
}

impl ResidentChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.pix_key.is_none()
    }
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl<'a> ResidentService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a resident to the household
    pub fn create(
        &self,
        name: &str,
        email: Option<&str>,
        pix_key: Option<&str>,
    ) -> HouseholdResult<Resident> {
        let name = name.trim();
        if self.storage.residents.find_by_name(name)?.is_some() {
            return Err(HouseholdError::Duplicate {
                entity_type: "Resident",
                identifier: name.to_string(),
            });
        }

        let mut resident = Resident::new(name);
        resident.email = email.and_then(optional_text);
        resident.pix_key = pix_key.and_then(optional_text);
        resident
            .validate()
            .map_err(|e| HouseholdError::Validation(e.to_string()))?;

        self.storage.residents.upsert(resident.clone())?;
        self.storage.residents.save()?;

        self.storage.log_create(
            EntityType::Resident,
            resident.id.to_string(),
            Some(resident.name.clone()),
            &resident,
        )?;
        tracing::info!(resident = %resident.id, name = %resident.name, "Created resident");

        Ok(resident)
    }

    pub fn get(&self, id: ResidentId) -> HouseholdResult<Option<Resident>> {
        self.storage.residents.get(id)
    }

    /// Find a resident by name, then by full or short id
    pub fn find(&self, identifier: &str) -> HouseholdResult<Option<Resident>> {
        if let Some(resident) = self.storage.residents.find_by_name(identifier)? {
            return Ok(Some(resident));
        }
        if let Ok(id) = identifier.parse::<ResidentId>() {
            if let Some(resident) = self.storage.residents.get(id)? {
                return Ok(Some(resident));
            }
        }
        self.storage.residents.find_by_id_str(identifier)
    }

    /// Like [`find`](Self::find), but a missing resident is an error
    pub fn resolve(&self, identifier: &str) -> HouseholdResult<Resident> {
        self.find(identifier)?
            .ok_or_else(|| HouseholdError::resident_not_found(identifier))
    }

    /// List residents, optionally including those who moved out
    pub fn list(&self, include_inactive: bool) -> HouseholdResult<Vec<Resident>> {
        let mut residents = self.storage.residents.get_all()?;
        if !include_inactive {
            residents.retain(|r| r.active);
        }
        Ok(residents)
    }

    /// Apply field changes to a resident
    pub fn update(&self, id: ResidentId, changes: ResidentChanges) -> HouseholdResult<Resident> {
        let mut resident = self
            .get(id)?
            .ok_or_else(|| HouseholdError::resident_not_found(id.to_string()))?;
        let before = resident.clone();

        if let Some(name) = changes.name {
            let name = name.trim();
            if let Some(other) = self.storage.residents.find_by_name(name)? {
                if other.id != id {
                    return Err(HouseholdError::Duplicate {
                        entity_type: "Resident",
                        identifier: name.to_string(),
                    });
                }
            }
            resident.name = name.to_string();
        }
        if let Some(email) = changes.email {
            resident.email = optional_text(&email);
        }
        if let Some(pix_key) = changes.pix_key {
            resident.pix_key = optional_text(&pix_key);
        }

        resident
            .validate()
            .map_err(|e| HouseholdError::Validation(e.to_string()))?;
        resident.updated_at = Utc::now();

        self.save_update(&before, resident)
    }

    /// Mark a resident as moved out; they stay on existing bills
    pub fn deactivate(&self, id: ResidentId) -> HouseholdResult<Resident> {
        self.set_active(id, false)
    }

    pub fn activate(&self, id: ResidentId) -> HouseholdResult<Resident> {
        self.set_active(id, true)
    }

    fn set_active(&self, id: ResidentId, active: bool) -> HouseholdResult<Resident> {
        let mut resident = self
            .get(id)?
            .ok_or_else(|| HouseholdError::resident_not_found(id.to_string()))?;
        let before = resident.clone();

        if active {
            resident.activate();
        } else {
            resident.deactivate();
        }

        self.save_update(&before, resident)
    }

    fn save_update(&self, before: &Resident, resident: Resident) -> HouseholdResult<Resident> {
        self.storage.residents.upsert(resident.clone())?;
        self.storage.residents.save()?;

        self.storage.log_update(
            EntityType::Resident,
            resident.id.to_string(),
            Some(resident.name.clone()),
            before,
            &resident,
        )?;
        tracing::info!(resident = %resident.id, "Updated resident");

        Ok(resident)
    }

    /// Delete a resident who appears on no bill
    pub fn remove(&self, id: ResidentId) -> HouseholdResult<Resident> {
        let resident = self
            .get(id)?
            .ok_or_else(|| HouseholdError::resident_not_found(id.to_string()))?;

        let bills = self.storage.bills.get_by_resident(id)?;
        if !bills.is_empty() {
            return Err(HouseholdError::InUse(format!(
                "Resident '{}' appears on {} bill(s); deactivate them instead",
                resident.name,
                bills.len()
            )));
        }

        self.storage.residents.delete(id)?;
        self.storage.residents.save()?;

        self.storage.log_delete(
            EntityType::Resident,
            resident.id.to_string(),
            Some(resident.name.clone()),
            &resident,
        )?;
        tracing::info!(resident = %resident.id, "Removed resident");

        Ok(resident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HouseholdPaths;
    use crate::models::{Bill, Money, PaymentMethod, Share, SplitMode};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = HouseholdPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_resident() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ResidentService::new(&storage);

        let resident = service
            .create("Ana", Some("ana@example.com"), Some("  "))
            .unwrap();
        assert_eq!(resident.name, "Ana");
        assert_eq!(resident.email.as_deref(), Some("ana@example.com"));
        assert!(resident.pix_key.is_none());

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ResidentService::new(&storage);

        service.create("Ana", None, None).unwrap();
        let err = service.create("ana", None, None).unwrap_err();
        assert!(matches!(err, HouseholdError::Duplicate { .. }));
    }

    #[test]
    fn test_empty_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ResidentService::new(&storage);

        let err = service.create("   ", None, None).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_find_by_name_and_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ResidentService::new(&storage);
        let bruno = service.create("Bruno", None, None).unwrap();

        assert_eq!(service.find("bruno").unwrap().unwrap().id, bruno.id);
        assert_eq!(service.find(&bruno.id.to_string()).unwrap().unwrap().id, bruno.id);
        assert_eq!(
            service.find(&bruno.id.as_uuid().to_string()).unwrap().unwrap().id,
            bruno.id
        );
        assert!(service.resolve("Nobody").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_fields() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ResidentService::new(&storage);
        let carla = service.create("Carla", Some("c@example.com"), None).unwrap();
        service.create("Davi", None, None).unwrap();

        let updated = service
            .update(
                carla.id,
                ResidentChanges {
                    name: Some("Carla M.".into()),
                    email: Some(String::new()),
                    pix_key: Some("carla-pix".into()),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Carla M.");
        assert!(updated.email.is_none());
        assert_eq!(updated.pix_key.as_deref(), Some("carla-pix"));

        let err = service
            .update(
                carla.id,
                ResidentChanges {
                    name: Some("davi".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, HouseholdError::Duplicate { .. }));
    }

    #[test]
    fn test_deactivate_hides_from_list() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ResidentService::new(&storage);
        let eva = service.create("Eva", None, None).unwrap();
        service.create("Fabio", None, None).unwrap();

        service.deactivate(eva.id).unwrap();
        assert_eq!(service.list(false).unwrap().len(), 1);
        assert_eq!(service.list(true).unwrap().len(), 2);

        service.activate(eva.id).unwrap();
        assert_eq!(service.list(false).unwrap().len(), 2);
    }

    #[test]
    fn test_remove_blocked_by_bill() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ResidentService::new(&storage);
        let gabi = service.create("Gabi", None, None).unwrap();
        let hugo = service.create("Hugo", None, None).unwrap();

        storage
            .bills
            .upsert(Bill::new(
                "Gas",
                Money::from_cents(5000),
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                gabi.id,
                PaymentMethod::Pix,
                SplitMode::Equal,
                vec![Share::new(gabi.id, Money::from_cents(5000))],
            ))
            .unwrap();

        let err = service.remove(gabi.id).unwrap_err();
        assert!(matches!(err, HouseholdError::InUse(_)));

        service.remove(hugo.id).unwrap();
        assert!(service.get(hugo.id).unwrap().is_none());
    }
}
