//! Bill drafts
//!
//! A draft is one add-or-edit session for a bill. It holds the raw form
//! input, validates it, and only then runs the split arithmetic to produce a
//! complete [`Bill`]. Validation failures leave the draft untouched so the
//! user can correct the input and submit again.
//!
//! ```text
//! Idle --(all fields valid)--> Ready --commit()--> Committed
//!   ^                            |
//!   +------(field cleared)-------+
//! ```

use chrono::{Local, NaiveDate, Utc};

use crate::models::{Bill, Money, PaymentMethod, ResidentId, Share, SplitMode};
use crate::split::{allocate_equal, reconcile_input};

/// How the draft's total will be divided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitInput {
    /// Shares computed from the total on every change
    Equal,
    /// Raw per-resident amounts as typed, reconciled only on commit
    Custom(Vec<(ResidentId, String)>),
}

impl SplitInput {
    pub fn mode(&self) -> SplitMode {
        match self {
            Self::Equal => SplitMode::Equal,
            Self::Custom(_) => SplitMode::Custom,
        }
    }
}

/// Where a draft is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    /// Some required field is missing or invalid
    Idle,
    /// Every validation passes; `commit` will succeed
    Ready,
    /// The bill has been built; the draft can't be used again
    Committed,
}

/// Reasons a draft can't be committed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillValidationError {
    #[error("This bill has already been saved")]
    AlreadyCommitted,
    #[error("Description must not be blank")]
    BlankDescription,
    #[error("Total must be greater than zero")]
    NonPositiveTotal,
    #[error("Choose the resident responsible for the bill")]
    NoResponsible,
    #[error("Select at least one resident to split the bill with")]
    NoParticipants,
    #[error("{0}")]
    Inconsistent(String),
}

/// An in-progress bill creation or edit
#[derive(Debug, Clone)]
pub struct BillDraft {
    description: String,
    total_input: String,
    due_date: NaiveDate,
    responsible: Option<ResidentId>,
    payment_method: PaymentMethod,
    participants: Vec<ResidentId>,
    split: SplitInput,
    editing: Option<Bill>,
    committed: bool,
}

impl Default for BillDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl BillDraft {
    /// Start an empty draft due today
    pub fn new() -> Self {
        Self {
            description: String::new(),
            total_input: String::new(),
            due_date: Local::now().date_naive(),
            responsible: None,
            payment_method: PaymentMethod::default(),
            participants: Vec::new(),
            split: SplitInput::Equal,
            editing: None,
            committed: false,
        }
    }

    /// Start an edit session prefilled from an existing bill
    pub fn edit(bill: &Bill) -> Self {
        let split = match bill.split_mode {
            SplitMode::Equal => SplitInput::Equal,
            SplitMode::Custom => SplitInput::Custom(
                bill.shares
                    .iter()
                    .map(|s| (s.resident_id, s.amount.to_string()))
                    .collect(),
            ),
        };

        Self {
            description: bill.description.clone(),
            total_input: bill.total.to_string(),
            due_date: bill.due_date,
            responsible: Some(bill.responsible_id),
            payment_method: bill.payment_method,
            participants: bill.shares.iter().map(|s| s.resident_id).collect(),
            split,
            editing: Some(bill.clone()),
            committed: false,
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Set the total as typed; parsed leniently
    pub fn set_total(&mut self, total: impl Into<String>) -> &mut Self {
        self.total_input = total.into();
        self
    }

    pub fn set_due_date(&mut self, due_date: NaiveDate) -> &mut Self {
        self.due_date = due_date;
        self
    }

    pub fn set_responsible(&mut self, resident_id: ResidentId) -> &mut Self {
        self.responsible = Some(resident_id);
        self
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) -> &mut Self {
        self.payment_method = method;
        self
    }

    /// Replace the participant selection; order is kept, duplicates dropped
    pub fn set_participants(&mut self, residents: &[ResidentId]) -> &mut Self {
        self.participants.clear();
        for id in residents {
            if !self.participants.contains(id) {
                self.participants.push(*id);
            }
        }
        self
    }

    /// Add a resident to the split, or remove them if already selected
    pub fn toggle_participant(&mut self, resident_id: ResidentId) -> &mut Self {
        if let Some(pos) = self.participants.iter().position(|id| *id == resident_id) {
            self.participants.remove(pos);
        } else {
            self.participants.push(resident_id);
        }
        self
    }

    /// Switch to an even split
    pub fn use_equal_split(&mut self) -> &mut Self {
        self.split = SplitInput::Equal;
        self
    }

    /// Switch to per-resident amounts, starting from the current preview
    pub fn use_custom_split(&mut self) -> &mut Self {
        if matches!(self.split, SplitInput::Equal) {
            let seeded = self
                .preview()
                .into_iter()
                .map(|(id, amount)| (id, amount.to_string()))
                .collect();
            self.split = SplitInput::Custom(seeded);
        }
        self
    }

    /// Type a resident's amount, switching to a custom split if needed
    pub fn set_custom_amount(&mut self, resident_id: ResidentId, amount: impl Into<String>) -> &mut Self {
        self.use_custom_split();
        let amount = amount.into();
        if let SplitInput::Custom(entries) = &mut self.split {
            match entries.iter_mut().find(|(id, _)| *id == resident_id) {
                Some(entry) => entry.1 = amount,
                None => entries.push((resident_id, amount)),
            }
        }
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Total as it will be recorded
    pub fn total(&self) -> Money {
        Money::parse_lenient(&self.total_input)
    }

    pub fn responsible(&self) -> Option<ResidentId> {
        self.responsible
    }

    pub fn participants(&self) -> &[ResidentId] {
        &self.participants
    }

    pub fn split(&self) -> &SplitInput {
        &self.split
    }

    /// Whether this draft edits an existing bill
    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    pub fn state(&self) -> DraftState {
        if self.committed {
            DraftState::Committed
        } else if self.validate().is_ok() {
            DraftState::Ready
        } else {
            DraftState::Idle
        }
    }

    /// Shares as they stand right now
    ///
    /// An equal split is recomputed from the current total and selection; a
    /// custom split shows the typed amounts without reconciliation.
    pub fn preview(&self) -> Vec<(ResidentId, Money)> {
        match &self.split {
            SplitInput::Equal => allocate_equal(self.total(), &self.participants),
            SplitInput::Custom(_) => self
                .custom_entries()
                .into_iter()
                .map(|(id, raw)| (id, Money::parse_lenient(raw)))
                .collect(),
        }
    }

    /// Check the form input, reporting the first problem found
    pub fn validate(&self) -> Result<(), BillValidationError> {
        if self.committed {
            return Err(BillValidationError::AlreadyCommitted);
        }
        if self.description.trim().is_empty() {
            return Err(BillValidationError::BlankDescription);
        }
        if !self.total().is_positive() {
            return Err(BillValidationError::NonPositiveTotal);
        }
        if self.responsible.is_none() {
            return Err(BillValidationError::NoResponsible);
        }
        if self.participants.is_empty() {
            return Err(BillValidationError::NoParticipants);
        }
        Ok(())
    }

    /// Build the bill and close the session
    pub fn commit(&mut self) -> Result<Bill, BillValidationError> {
        self.validate()?;

        let total = self.total();
        let responsible = self.responsible.ok_or(BillValidationError::NoResponsible)?;
        let computed = match &self.split {
            SplitInput::Equal => allocate_equal(total, &self.participants),
            SplitInput::Custom(_) => reconcile_input(total, &self.custom_entries()),
        };

        let bill = match &self.editing {
            Some(original) => {
                let mut bill = original.clone();
                bill.description = self.description.trim().to_string();
                bill.total = total;
                bill.due_date = self.due_date;
                bill.responsible_id = responsible;
                bill.payment_method = self.payment_method;
                bill.split_mode = self.split.mode();
                bill.shares = carry_over_payments(original, computed);
                bill.updated_at = Utc::now();
                bill
            }
            None => Bill::new(
                self.description.trim(),
                total,
                self.due_date,
                responsible,
                self.payment_method,
                self.split.mode(),
                computed
                    .into_iter()
                    .map(|(id, amount)| Share::new(id, amount))
                    .collect(),
            ),
        };

        bill.validate()
            .map_err(|e| BillValidationError::Inconsistent(e.to_string()))?;

        self.committed = true;
        Ok(bill)
    }

    /// Custom amounts in participant order; unselected residents are ignored
    /// and selected residents without an amount count as zero
    fn custom_entries(&self) -> Vec<(ResidentId, &str)> {
        let SplitInput::Custom(entries) = &self.split else {
            return Vec::new();
        };
        self.participants
            .iter()
            .map(|id| {
                let raw = entries
                    .iter()
                    .find(|(entry_id, _)| entry_id == id)
                    .map(|(_, raw)| raw.as_str())
                    .unwrap_or("");
                (*id, raw)
            })
            .collect()
    }
}

/// Keep a share's paid status when the same resident owes the same amount
fn carry_over_payments(original: &Bill, computed: Vec<(ResidentId, Money)>) -> Vec<Share> {
    computed
        .into_iter()
        .map(|(id, amount)| match original.share_for(id) {
            Some(prev) if prev.amount == amount => Share {
                amount,
                ..prev.clone()
            },
            _ => Share::new(id, amount),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residents(n: usize) -> Vec<ResidentId> {
        (0..n).map(|_| ResidentId::new()).collect()
    }

    fn ready_draft(people: &[ResidentId]) -> BillDraft {
        let mut draft = BillDraft::new();
        draft
            .set_description("Electricity")
            .set_total("100,00")
            .set_responsible(people[0])
            .set_participants(people);
        draft
    }

    fn amounts(bill: &Bill) -> Vec<i64> {
        bill.shares.iter().map(|s| s.amount.cents()).collect()
    }

    #[test]
    fn test_new_draft_is_idle() {
        let draft = BillDraft::new();
        assert_eq!(draft.state(), DraftState::Idle);
        assert_eq!(draft.validate(), Err(BillValidationError::BlankDescription));
    }

    #[test]
    fn test_validation_order() {
        let people = residents(2);
        let mut draft = BillDraft::new();

        draft.set_description("   ");
        assert_eq!(draft.validate(), Err(BillValidationError::BlankDescription));

        draft.set_description("Water");
        assert_eq!(draft.validate(), Err(BillValidationError::NonPositiveTotal));

        draft.set_total("abc");
        assert_eq!(draft.validate(), Err(BillValidationError::NonPositiveTotal));

        draft.set_total("-5");
        assert_eq!(draft.validate(), Err(BillValidationError::NonPositiveTotal));

        draft.set_total("80");
        assert_eq!(draft.validate(), Err(BillValidationError::NoResponsible));

        draft.set_responsible(people[0]);
        assert_eq!(draft.validate(), Err(BillValidationError::NoParticipants));

        draft.set_participants(&people);
        assert_eq!(draft.state(), DraftState::Ready);
    }

    #[test]
    fn test_equal_commit() {
        let people = residents(3);
        let mut draft = ready_draft(&people);

        let bill = draft.commit().unwrap();
        assert_eq!(bill.total, Money::from_cents(10000));
        assert_eq!(bill.split_mode, SplitMode::Equal);
        assert_eq!(amounts(&bill), vec![3333, 3333, 3334]);
        assert_eq!(bill.shares[2].resident_id, people[2]);
        assert_eq!(draft.state(), DraftState::Committed);
    }

    #[test]
    fn test_commit_twice_fails() {
        let people = residents(2);
        let mut draft = ready_draft(&people);
        draft.commit().unwrap();
        assert_eq!(draft.commit().unwrap_err(), BillValidationError::AlreadyCommitted);
    }

    #[test]
    fn test_failed_commit_keeps_input() {
        let people = residents(2);
        let mut draft = ready_draft(&people);
        draft.set_description("");

        assert_eq!(draft.commit().unwrap_err(), BillValidationError::BlankDescription);
        assert_eq!(draft.state(), DraftState::Idle);
        assert_eq!(draft.participants(), people.as_slice());
        assert_eq!(draft.total(), Money::from_cents(10000));

        draft.set_description("Gas");
        assert!(draft.commit().is_ok());
    }

    #[test]
    fn test_preview_follows_changes() {
        let people = residents(3);
        let mut draft = ready_draft(&people[..2]);
        let preview: Vec<i64> = draft.preview().iter().map(|(_, m)| m.cents()).collect();
        assert_eq!(preview, vec![5000, 5000]);

        draft.toggle_participant(people[2]);
        let preview: Vec<i64> = draft.preview().iter().map(|(_, m)| m.cents()).collect();
        assert_eq!(preview, vec![3333, 3333, 3334]);

        draft.set_total("90");
        let preview: Vec<i64> = draft.preview().iter().map(|(_, m)| m.cents()).collect();
        assert_eq!(preview, vec![3000, 3000, 3000]);

        draft.toggle_participant(people[0]);
        assert_eq!(draft.participants(), &people[1..]);
    }

    #[test]
    fn test_custom_split_reconciles_on_commit() {
        let people = residents(2);
        let mut draft = ready_draft(&people);
        draft
            .set_custom_amount(people[0], "40")
            .set_custom_amount(people[1], "40");

        // preview shows what was typed
        let preview: Vec<i64> = draft.preview().iter().map(|(_, m)| m.cents()).collect();
        assert_eq!(preview, vec![4000, 4000]);

        let bill = draft.commit().unwrap();
        assert_eq!(bill.split_mode, SplitMode::Custom);
        assert_eq!(amounts(&bill), vec![4000, 6000]);
    }

    #[test]
    fn test_custom_split_seeded_from_equal() {
        let people = residents(3);
        let mut draft = ready_draft(&people);
        draft.use_custom_split();

        match draft.split() {
            SplitInput::Custom(entries) => {
                let typed: Vec<&str> = entries.iter().map(|(_, raw)| raw.as_str()).collect();
                assert_eq!(typed, vec!["33.33", "33.33", "33.34"]);
            }
            SplitInput::Equal => panic!("expected custom split"),
        }
    }

    #[test]
    fn test_custom_missing_amount_counts_as_zero() {
        let people = residents(3);
        let mut draft = ready_draft(&people);
        draft.use_custom_split();
        draft.set_custom_amount(people[0], "70");
        draft.set_participants(&people[..2]);
        draft.set_custom_amount(people[1], "");

        let bill = draft.commit().unwrap();
        assert_eq!(amounts(&bill), vec![7000, 3000]);
    }

    #[test]
    fn test_custom_overshoot_is_rejected() {
        let people = residents(2);
        let mut draft = ready_draft(&people);
        draft
            .set_custom_amount(people[0], "150")
            .set_custom_amount(people[1], "10");

        assert!(matches!(
            draft.commit(),
            Err(BillValidationError::Inconsistent(_))
        ));
        assert_ne!(draft.state(), DraftState::Committed);
    }

    #[test]
    fn test_total_beyond_limit_is_not_positive() {
        let people = residents(2);
        let mut draft = ready_draft(&people);
        draft.set_total("90000000000000000");

        assert_eq!(draft.validate(), Err(BillValidationError::NonPositiveTotal));
        assert_eq!(draft.state(), DraftState::Idle);
    }

    #[test]
    fn test_total_at_limit_commits() {
        let people = residents(2);
        let mut draft = ready_draft(&people);
        draft.set_total("10000000000000");

        let bill = draft.commit().unwrap();
        assert_eq!(bill.total, Money::MAX_AMOUNT);
        assert_eq!(bill.shares_total(), Money::MAX_AMOUNT);
    }

    #[test]
    fn test_huge_custom_amounts_never_panic() {
        let people = residents(2);

        let mut draft = ready_draft(&people);
        draft
            .set_custom_amount(people[0], "90000000000000000")
            .set_custom_amount(people[1], "90000000000000000");
        let bill = draft.commit().unwrap();
        assert_eq!(amounts(&bill), vec![0, 10000]);

        let mut draft = ready_draft(&people);
        draft
            .set_custom_amount(people[0], "10000000000000")
            .set_custom_amount(people[1], "10000000000000");
        assert!(matches!(
            draft.commit(),
            Err(BillValidationError::Inconsistent(_))
        ));

        let mut draft = ready_draft(&people);
        draft
            .set_custom_amount(people[0], "92233720368547758,07")
            .set_custom_amount(people[1], "1");
        let bill = draft.commit().unwrap();
        assert_eq!(amounts(&bill), vec![0, 10000]);
    }

    #[test]
    fn test_back_to_equal() {
        let people = residents(2);
        let mut draft = ready_draft(&people);
        draft.set_custom_amount(people[0], "10");
        draft.use_equal_split();

        let bill = draft.commit().unwrap();
        assert_eq!(amounts(&bill), vec![5000, 5000]);
    }

    #[test]
    fn test_edit_keeps_identity_and_payments() {
        let people = residents(3);
        let mut draft = ready_draft(&people[..2]);
        let mut original = draft.commit().unwrap();
        original.set_paid(people[0], true);
        original.set_paid(people[1], true);

        let mut edit = BillDraft::edit(&original);
        assert!(edit.is_edit());
        assert_eq!(edit.state(), DraftState::Ready);
        edit.set_description("Electricity (March)");

        let unchanged_amounts = edit.commit().unwrap();
        assert_eq!(unchanged_amounts.id, original.id);
        assert_eq!(unchanged_amounts.created_at, original.created_at);
        assert!(unchanged_amounts.is_settled());

        let mut edit = BillDraft::edit(&original);
        edit.toggle_participant(people[2]).set_total("150");
        let updated = edit.commit().unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(amounts(&updated), vec![5000, 5000, 5000]);
        assert!(updated.shares[0].paid);
        assert!(!updated.shares[2].paid);
    }

    #[test]
    fn test_edit_custom_bill_prefills_amounts() {
        let people = residents(2);
        let mut draft = ready_draft(&people);
        draft.set_custom_amount(people[0], "25");
        let original = draft.commit().unwrap();

        let edit = BillDraft::edit(&original);
        assert_eq!(
            edit.split(),
            &SplitInput::Custom(vec![
                (people[0], "25.00".to_string()),
                (people[1], "75.00".to_string()),
            ])
        );
    }
}
