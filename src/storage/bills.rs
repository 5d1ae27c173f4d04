//! Bill repository for JSON storage
//!
//! Manages loading and saving bills, with their shares, to bills.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::HouseholdError;
use crate::models::{Bill, BillId, ResidentId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BillData {
    bills: Vec<Bill>,
}

/// Repository for bill persistence
pub struct BillRepository {
    path: PathBuf,
    data: RwLock<HashMap<BillId, Bill>>,
}

impl BillRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load bills from disk
    pub fn load(&self) -> Result<(), HouseholdError> {
        let file_data: BillData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(lock_error)?;

        data.clear();
        for bill in file_data.bills {
            if let Err(e) = bill.validate() {
                tracing::warn!(bill = %bill.id, error = %e, "Stored bill failed validation");
            }
            data.insert(bill.id, bill);
        }

        Ok(())
    }

    /// Save bills to disk
    pub fn save(&self) -> Result<(), HouseholdError> {
        let bills = self.get_all()?;
        write_json_atomic(&self.path, &BillData { bills })
    }

    pub fn get(&self, id: BillId) -> Result<Option<Bill>, HouseholdError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All bills, soonest due first
    pub fn get_all(&self) -> Result<Vec<Bill>, HouseholdError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut bills: Vec<_> = data.values().cloned().collect();
        bills.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(bills)
    }

    /// Bills a resident owes a share of or is responsible for
    pub fn get_by_resident(&self, resident_id: ResidentId) -> Result<Vec<Bill>, HouseholdError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|b| b.involves(resident_id))
            .collect())
    }

    /// Find a bill by short or full id
    pub fn find_by_id_str(&self, identifier: &str) -> Result<Option<Bill>, HouseholdError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.values().find(|b| b.id.matches(identifier)).cloned())
    }

    /// Insert or update a bill
    pub fn upsert(&self, bill: Bill) -> Result<(), HouseholdError> {
        let mut data = self.data.write().map_err(lock_error)?;
        data.insert(bill.id, bill);
        Ok(())
    }

    /// Remove a bill, returning it if it existed
    pub fn delete(&self, id: BillId) -> Result<Option<Bill>, HouseholdError> {
        let mut data = self.data.write().map_err(lock_error)?;
        Ok(data.remove(&id))
    }

    pub fn count(&self) -> Result<usize, HouseholdError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentMethod, Share, SplitMode};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn bill_due(day: u32, payer: ResidentId) -> Bill {
        Bill::new(
            format!("Bill {}", day),
            Money::from_cents(1000),
            NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            payer,
            PaymentMethod::Pix,
            SplitMode::Equal,
            vec![Share::new(payer, Money::from_cents(1000))],
        )
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bills.json");
        let repo = BillRepository::new(path.clone());
        let ana = ResidentId::new();

        repo.upsert(bill_due(20, ana)).unwrap();
        repo.upsert(bill_due(5, ana)).unwrap();
        repo.save().unwrap();

        let repo2 = BillRepository::new(path);
        repo2.load().unwrap();
        let descriptions: Vec<_> = repo2
            .get_all()
            .unwrap()
            .iter()
            .map(|b| b.description.clone())
            .collect();
        assert_eq!(descriptions, vec!["Bill 5", "Bill 20"]);
    }

    #[test]
    fn test_get_by_resident() {
        let temp_dir = TempDir::new().unwrap();
        let repo = BillRepository::new(temp_dir.path().join("bills.json"));
        let ana = ResidentId::new();
        let bruno = ResidentId::new();

        repo.upsert(bill_due(1, ana)).unwrap();
        repo.upsert(bill_due(2, bruno)).unwrap();

        assert_eq!(repo.get_by_resident(ana).unwrap().len(), 1);
        assert!(repo.get_by_resident(ResidentId::new()).unwrap().is_empty());
    }

    #[test]
    fn test_find_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let repo = BillRepository::new(temp_dir.path().join("bills.json"));
        let bill = bill_due(3, ResidentId::new());
        let id = bill.id;
        repo.upsert(bill).unwrap();

        assert!(repo.find_by_id_str(&id.to_string()).unwrap().is_some());
        assert!(repo.delete(id).unwrap().is_some());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
