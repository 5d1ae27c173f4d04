//! Bill service
//!
//! Persists committed bill drafts, tracks share payments and summarizes
//! what each resident owes and is owed.

use std::collections::HashMap;

use crate::audit::EntityType;
use crate::error::{HouseholdError, HouseholdResult};
use crate::models::{Bill, BillId, Money, Resident, ResidentId};
use crate::storage::Storage;

use super::draft::BillDraft;

/// Service for bill management
pub struct BillService<'a> {
    storage: &'a Storage,
}

/// Filter options for listing bills
#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    /// Only bills this resident takes part in or is responsible for
    pub resident_id: Option<ResidentId>,
    /// Only bills with at least one unpaid share
    pub unpaid_only: bool,
    /// Maximum number of bills to return
    pub limit: Option<usize>,
}

impl BillFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resident(mut self, resident_id: ResidentId) -> Self {
        self.resident_id = Some(resident_id);
        self
    }

    pub fn unpaid(mut self) -> Self {
        self.unpaid_only = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Outstanding amounts for one resident across unpaid shares
///
/// A responsible resident's own share is never counted as a debt to themselves.
#[derive(Debug, Clone)]
pub struct ResidentBalance {
    pub resident: Resident,
    /// Unpaid shares on bills someone else is responsible for
    pub owes: Money,
    /// Unpaid shares of others on bills this resident is responsible for
    pub owed: Money,
}

impl ResidentBalance {
    /// Positive when the resident is owed more than they owe
    pub fn net(&self) -> Money {
        self.owed - self.owes
    }

    pub fn is_settled(&self) -> bool {
        self.owes.is_zero() && self.owed.is_zero()
    }
}

impl<'a> BillService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Commit a new-bill draft and persist the result
    pub fn create(&self, draft: &mut BillDraft) -> HouseholdResult<Bill> {
        if draft.is_edit() {
            return Err(HouseholdError::Validation(
                "Draft edits an existing bill; use update instead".into(),
            ));
        }
        self.check_residents(draft, None)?;

        let bill = draft.commit()?;

        self.storage.bills.upsert(bill.clone())?;
        self.storage.bills.save()?;

        self.storage.log_create(
            EntityType::Bill,
            bill.id.to_string(),
            Some(bill.description.clone()),
            &bill,
        )?;
        tracing::info!(
            bill = %bill.id,
            total = %bill.total,
            shares = bill.shares.len(),
            "Created bill"
        );

        Ok(bill)
    }

    /// Commit an edit-session draft over the stored bill
    pub fn update(&self, id: BillId, draft: &mut BillDraft) -> HouseholdResult<Bill> {
        let before = self
            .get(id)?
            .ok_or_else(|| HouseholdError::bill_not_found(id.to_string()))?;
        if !draft.is_edit() {
            return Err(HouseholdError::Validation(
                "Draft does not edit an existing bill".into(),
            ));
        }
        self.check_residents(draft, Some(&before))?;

        let bill = draft.commit()?;
        if bill.id != id {
            return Err(HouseholdError::Validation(format!(
                "Draft edits bill {}, not {}",
                bill.id, id
            )));
        }

        self.storage.bills.upsert(bill.clone())?;
        self.storage.bills.save()?;

        self.storage.log_update(
            EntityType::Bill,
            bill.id.to_string(),
            Some(bill.description.clone()),
            &before,
            &bill,
        )?;
        tracing::info!(bill = %bill.id, total = %bill.total, "Updated bill");

        Ok(bill)
    }

    /// Every referenced resident must exist; new references must be active.
    /// Residents already on an edited bill may stay after moving out.
    fn check_residents(&self, draft: &BillDraft, existing: Option<&Bill>) -> HouseholdResult<()> {
        let referenced = draft.responsible().into_iter().chain(draft.participants().iter().copied());

        for resident_id in referenced {
            let resident = self
                .storage
                .residents
                .get(resident_id)?
                .ok_or_else(|| HouseholdError::resident_not_found(resident_id.to_string()))?;

            let grandfathered = existing.is_some_and(|bill| bill.involves(resident_id));
            if !resident.active && !grandfathered {
                return Err(HouseholdError::Validation(format!(
                    "Resident '{}' is inactive",
                    resident.name
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: BillId) -> HouseholdResult<Option<Bill>> {
        self.storage.bills.get(id)
    }

    /// Find a bill by full or short id
    pub fn find(&self, identifier: &str) -> HouseholdResult<Option<Bill>> {
        if let Ok(id) = identifier.parse::<BillId>() {
            if let Some(bill) = self.storage.bills.get(id)? {
                return Ok(Some(bill));
            }
        }
        self.storage.bills.find_by_id_str(identifier)
    }

    /// Like [`find`](Self::find), but a missing bill is an error
    pub fn resolve(&self, identifier: &str) -> HouseholdResult<Bill> {
        self.find(identifier)?
            .ok_or_else(|| HouseholdError::bill_not_found(identifier))
    }

    /// List bills ordered by due date
    pub fn list(&self, filter: BillFilter) -> HouseholdResult<Vec<Bill>> {
        let mut bills = match filter.resident_id {
            Some(resident_id) => self.storage.bills.get_by_resident(resident_id)?,
            None => self.storage.bills.get_all()?,
        };

        if filter.unpaid_only {
            bills.retain(|b| !b.is_settled());
        }
        if let Some(limit) = filter.limit {
            bills.truncate(limit);
        }

        Ok(bills)
    }

    /// Record that a resident paid their share
    pub fn mark_paid(&self, id: BillId, resident_id: ResidentId) -> HouseholdResult<Bill> {
        self.set_paid(id, resident_id, true)
    }

    pub fn mark_unpaid(&self, id: BillId, resident_id: ResidentId) -> HouseholdResult<Bill> {
        self.set_paid(id, resident_id, false)
    }

    fn set_paid(&self, id: BillId, resident_id: ResidentId, paid: bool) -> HouseholdResult<Bill> {
        let mut bill = self
            .get(id)?
            .ok_or_else(|| HouseholdError::bill_not_found(id.to_string()))?;
        let before = bill.clone();

        if !bill.set_paid(resident_id, paid) {
            return Err(HouseholdError::NotFound {
                entity_type: "Share",
                identifier: format!("{} on {}", resident_id, id),
            });
        }

        self.storage.bills.upsert(bill.clone())?;
        self.storage.bills.save()?;

        self.storage.log_update(
            EntityType::Bill,
            bill.id.to_string(),
            Some(bill.description.clone()),
            &before,
            &bill,
        )?;
        tracing::info!(bill = %bill.id, resident = %resident_id, paid, "Updated share payment");

        Ok(bill)
    }

    pub fn delete(&self, id: BillId) -> HouseholdResult<Bill> {
        let bill = self
            .storage
            .bills
            .delete(id)?
            .ok_or_else(|| HouseholdError::bill_not_found(id.to_string()))?;
        self.storage.bills.save()?;

        self.storage.log_delete(
            EntityType::Bill,
            bill.id.to_string(),
            Some(bill.description.clone()),
            &bill,
        )?;
        tracing::info!(bill = %bill.id, "Deleted bill");

        Ok(bill)
    }

    /// Per-resident balances across all unpaid shares
    ///
    /// Residents with nothing outstanding are included so the summary lists
    /// the whole household; inactive residents only appear while they still
    /// have something to settle.
    pub fn balances(&self) -> HouseholdResult<Vec<ResidentBalance>> {
        let mut owes: HashMap<ResidentId, Money> = HashMap::new();
        let mut owed: HashMap<ResidentId, Money> = HashMap::new();

        for bill in self.storage.bills.get_all()? {
            for share in bill.shares.iter().filter(|s| !s.paid) {
                if share.resident_id == bill.responsible_id {
                    continue;
                }
                *owes.entry(share.resident_id).or_default() += share.amount;
                *owed.entry(bill.responsible_id).or_default() += share.amount;
            }
        }

        let balances = self
            .storage
            .residents
            .get_all()?
            .into_iter()
            .map(|resident| ResidentBalance {
                owes: owes.get(&resident.id).copied().unwrap_or_default(),
                owed: owed.get(&resident.id).copied().unwrap_or_default(),
                resident,
            })
            .filter(|b| b.resident.active || !b.is_settled())
            .collect();

        Ok(balances)
    }

    pub fn count(&self) -> HouseholdResult<usize> {
        self.storage.bills.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HouseholdPaths;
    use crate::services::ResidentService;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = HouseholdPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn household(storage: &Storage) -> (ResidentId, ResidentId, ResidentId) {
        let residents = ResidentService::new(storage);
        let ana = residents.create("Ana", None, None).unwrap().id;
        let bruno = residents.create("Bruno", None, None).unwrap().id;
        let carla = residents.create("Carla", None, None).unwrap().id;
        (ana, bruno, carla)
    }

    fn internet_draft(responsible: ResidentId, participants: &[ResidentId]) -> BillDraft {
        let mut draft = BillDraft::new();
        draft
            .set_description("Internet")
            .set_total("100.00")
            .set_due_date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
            .set_responsible(responsible)
            .set_participants(participants);
        draft
    }

    #[test]
    fn test_create_equal_bill() {
        let (_temp_dir, storage) = create_test_storage();
        let (ana, bruno, carla) = household(&storage);
        let service = BillService::new(&storage);

        let bill = service
            .create(&mut internet_draft(ana, &[ana, bruno, carla]))
            .unwrap();

        let amounts: Vec<i64> = bill.shares.iter().map(|s| s.amount.cents()).collect();
        assert_eq!(amounts, vec![3333, 3333, 3334]);
        assert_eq!(service.count().unwrap(), 1);
        assert!(service.get(bill.id).unwrap().is_some());
    }

    #[test]
    fn test_create_rejects_invalid_draft() {
        let (_temp_dir, storage) = create_test_storage();
        let (ana, bruno, _) = household(&storage);
        let service = BillService::new(&storage);

        let mut draft = internet_draft(ana, &[ana, bruno]);
        draft.set_description("  ");

        let err = service.create(&mut draft).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_create_rejects_unknown_and_inactive_residents() {
        let (_temp_dir, storage) = create_test_storage();
        let (ana, bruno, _) = household(&storage);
        let service = BillService::new(&storage);

        let stranger = ResidentId::new();
        let err = service
            .create(&mut internet_draft(ana, &[ana, stranger]))
            .unwrap_err();
        assert!(err.is_not_found());

        ResidentService::new(&storage).deactivate(bruno).unwrap();
        let err = service
            .create(&mut internet_draft(ana, &[ana, bruno]))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_update_switches_to_custom_split() {
        let (_temp_dir, storage) = create_test_storage();
        let (ana, bruno, _) = household(&storage);
        let service = BillService::new(&storage);

        let bill = service.create(&mut internet_draft(ana, &[ana, bruno])).unwrap();

        let mut draft = BillDraft::edit(&bill);
        draft
            .use_custom_split()
            .set_custom_amount(ana, "70")
            .set_custom_amount(bruno, "20");
        let updated = service.update(bill.id, &mut draft).unwrap();

        assert_eq!(updated.id, bill.id);
        assert_eq!(updated.created_at, bill.created_at);
        let amounts: Vec<i64> = updated.shares.iter().map(|s| s.amount.cents()).collect();
        assert_eq!(amounts, vec![7000, 3000]);

        let entries = storage.audit().read_all().unwrap();
        assert!(entries.last().unwrap().diff_summary.is_some());
    }

    #[test]
    fn test_update_keeps_inactive_participant() {
        let (_temp_dir, storage) = create_test_storage();
        let (ana, bruno, _) = household(&storage);
        let service = BillService::new(&storage);

        let bill = service.create(&mut internet_draft(ana, &[ana, bruno])).unwrap();
        ResidentService::new(&storage).deactivate(bruno).unwrap();

        let mut draft = BillDraft::edit(&bill);
        draft.set_total("120");
        let updated = service.update(bill.id, &mut draft).unwrap();
        assert_eq!(updated.total, Money::from_cents(12000));
    }

    #[test]
    fn test_mark_paid_and_unpaid() {
        let (_temp_dir, storage) = create_test_storage();
        let (ana, bruno, carla) = household(&storage);
        let service = BillService::new(&storage);

        let bill = service.create(&mut internet_draft(ana, &[ana, bruno])).unwrap();

        let paid = service.mark_paid(bill.id, bruno).unwrap();
        assert!(paid.share_for(bruno).unwrap().paid);
        assert!(paid.share_for(bruno).unwrap().paid_at.is_some());

        let unpaid = service.mark_unpaid(bill.id, bruno).unwrap();
        assert!(!unpaid.share_for(bruno).unwrap().paid);

        let err = service.mark_paid(bill.id, carla).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let (ana, bruno, carla) = household(&storage);
        let service = BillService::new(&storage);

        let internet = service.create(&mut internet_draft(ana, &[ana, bruno])).unwrap();
        let mut water = internet_draft(carla, &[carla]);
        water.set_description("Water");
        service.create(&mut water).unwrap();

        service.mark_paid(internet.id, ana).unwrap();
        service.mark_paid(internet.id, bruno).unwrap();

        assert_eq!(service.list(BillFilter::new()).unwrap().len(), 2);
        assert_eq!(service.list(BillFilter::new().unpaid()).unwrap().len(), 1);
        assert_eq!(service.list(BillFilter::new().resident(bruno)).unwrap().len(), 1);
        assert_eq!(service.list(BillFilter::new().limit(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_balances() {
        let (_temp_dir, storage) = create_test_storage();
        let (ana, bruno, carla) = household(&storage);
        let service = BillService::new(&storage);

        let bill = service
            .create(&mut internet_draft(ana, &[ana, bruno, carla]))
            .unwrap();
        service.mark_paid(bill.id, carla).unwrap();

        let balances = service.balances().unwrap();
        let by_id = |id: ResidentId| balances.iter().find(|b| b.resident.id == id).unwrap();

        assert_eq!(by_id(ana).owes, Money::zero());
        assert_eq!(by_id(ana).owed, Money::from_cents(3333));
        assert_eq!(by_id(bruno).owes, Money::from_cents(3333));
        assert_eq!(by_id(bruno).net(), Money::from_cents(-3333));
        assert!(by_id(carla).is_settled());
    }

    #[test]
    fn test_balances_at_amount_limit() {
        let (_temp_dir, storage) = create_test_storage();
        let (ana, bruno, _) = household(&storage);
        let service = BillService::new(&storage);

        for _ in 0..2 {
            let mut draft = internet_draft(ana, &[ana, bruno]);
            draft.set_total("10000000000000");
            service.create(&mut draft).unwrap();
        }

        let balances = service.balances().unwrap();
        let by_id = |id: ResidentId| balances.iter().find(|b| b.resident.id == id).unwrap();
        assert_eq!(by_id(ana).owed, Money::MAX_AMOUNT);
        assert_eq!(by_id(bruno).owes, Money::MAX_AMOUNT);
    }

    #[test]
    fn test_balances_with_corrupt_stored_totals() {
        let (_temp_dir, storage) = create_test_storage();
        let (ana, bruno, _) = household(&storage);
        let service = BillService::new(&storage);

        let huge = Money::from_cents(i64::MAX - 1);
        for description in ["Edited by hand", "Also edited"] {
            storage
                .bills
                .upsert(Bill::new(
                    description,
                    huge,
                    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                    ana,
                    crate::models::PaymentMethod::Pix,
                    crate::models::SplitMode::Equal,
                    vec![crate::models::Share::new(bruno, huge)],
                ))
                .unwrap();
        }

        let balances = service.balances().unwrap();
        let by_id = |id: ResidentId| balances.iter().find(|b| b.resident.id == id).unwrap();
        assert_eq!(by_id(ana).owed, Money::from_cents(i64::MAX));
        assert_eq!(by_id(bruno).owes, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_delete_bill() {
        let (_temp_dir, storage) = create_test_storage();
        let (ana, bruno, _) = household(&storage);
        let service = BillService::new(&storage);

        let bill = service.create(&mut internet_draft(ana, &[ana, bruno])).unwrap();
        service.delete(bill.id).unwrap();

        assert_eq!(service.count().unwrap(), 0);
        assert!(service.delete(bill.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_by_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let (ana, bruno, _) = household(&storage);
        let service = BillService::new(&storage);

        let bill = service.create(&mut internet_draft(ana, &[ana, bruno])).unwrap();
        assert_eq!(service.resolve(&bill.id.to_string()).unwrap().id, bill.id);
        assert!(service.resolve("bill-00000000").unwrap_err().is_not_found());
    }
}
