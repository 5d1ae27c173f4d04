//! Bill model
//!
//! A shared expense with a total, a due date, a responsible resident who
//! collects payment, and the per-resident shares that make up the total.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::ids::{BillId, ResidentId};
use super::money::Money;

/// How a bill's total is divided among its participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Shares computed by dividing the total evenly
    #[default]
    Equal,
    /// Shares entered per resident and reconciled to the total
    Custom,
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "Equal"),
            Self::Custom => write!(f, "Custom"),
        }
    }
}

/// How the responsible resident expects to be paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Pix,
    Cash,
    BankTransfer,
    Boleto,
    Card,
    Other,
}

impl PaymentMethod {
    /// Parse a payment method label
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pix" => Some(Self::Pix),
            "cash" | "dinheiro" => Some(Self::Cash),
            "bank_transfer" | "transfer" | "ted" | "doc" => Some(Self::BankTransfer),
            "boleto" => Some(Self::Boleto),
            "card" | "credit" | "debit" | "cartao" => Some(Self::Card),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pix => write!(f, "PIX"),
            Self::Cash => write!(f, "Cash"),
            Self::BankTransfer => write!(f, "Bank Transfer"),
            Self::Boleto => write!(f, "Boleto"),
            Self::Card => write!(f, "Card"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// One resident's portion of a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub resident_id: ResidentId,

    /// Amount owed
    pub amount: Money,

    #[serde(default)]
    pub paid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Share {
    /// Create an unpaid share
    pub fn new(resident_id: ResidentId, amount: Money) -> Self {
        Self {
            resident_id,
            amount,
            paid: false,
            paid_at: None,
        }
    }
}

/// A shared household bill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier
    pub id: BillId,

    /// What the bill is for (e.g., "Internet - March")
    pub description: String,

    /// Total amount of the bill
    pub total: Money,

    /// When payment is due
    pub due_date: NaiveDate,

    /// Resident who collects payment from the others
    pub responsible_id: ResidentId,

    #[serde(default)]
    pub payment_method: PaymentMethod,

    #[serde(default)]
    pub split_mode: SplitMode,

    /// Shares in participant order; the last share absorbs rounding remainders
    #[serde(default)]
    pub shares: Vec<Share>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// Create a new bill from already-computed shares
    pub fn new(
        description: impl Into<String>,
        total: Money,
        due_date: NaiveDate,
        responsible_id: ResidentId,
        payment_method: PaymentMethod,
        split_mode: SplitMode,
        shares: Vec<Share>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BillId::new(),
            description: description.into().trim().to_string(),
            total,
            due_date,
            responsible_id,
            payment_method,
            split_mode,
            shares,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of all share amounts
    pub fn shares_total(&self) -> Money {
        self.shares.iter().map(|s| s.amount).sum()
    }

    /// Sum of the shares already paid
    pub fn paid_total(&self) -> Money {
        self.shares.iter().filter(|s| s.paid).map(|s| s.amount).sum()
    }

    /// Amount still owed on this bill
    pub fn outstanding(&self) -> Money {
        self.shares.iter().filter(|s| !s.paid).map(|s| s.amount).sum()
    }

    /// Check if every share has been paid
    pub fn is_settled(&self) -> bool {
        self.shares.iter().all(|s| s.paid)
    }

    /// Check if the bill is past due and not settled
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_settled() && self.due_date < today
    }

    /// Check if a resident takes part in this bill, as payer or collector
    pub fn involves(&self, resident_id: ResidentId) -> bool {
        self.responsible_id == resident_id || self.share_for(resident_id).is_some()
    }

    /// Get a resident's share
    pub fn share_for(&self, resident_id: ResidentId) -> Option<&Share> {
        self.shares.iter().find(|s| s.resident_id == resident_id)
    }

    /// Mark a resident's share paid or unpaid
    ///
    /// Returns `false` if the resident has no share on this bill.
    pub fn set_paid(&mut self, resident_id: ResidentId, paid: bool) -> bool {
        let Some(share) = self.shares.iter_mut().find(|s| s.resident_id == resident_id) else {
            return false;
        };

        let now = Utc::now();
        share.paid = paid;
        share.paid_at = paid.then_some(now);
        self.updated_at = now;
        true
    }

    /// Validate the bill
    pub fn validate(&self) -> Result<(), BillIntegrityError> {
        if self.description.trim().is_empty() {
            return Err(BillIntegrityError::BlankDescription);
        }

        if !self.total.is_positive() {
            return Err(BillIntegrityError::NonPositiveTotal(self.total));
        }

        if !self.total.is_within_limit() {
            return Err(BillIntegrityError::TotalTooLarge(self.total));
        }

        if self.shares.is_empty() {
            return Err(BillIntegrityError::NoShares);
        }

        let mut seen = HashSet::new();
        for share in &self.shares {
            if !seen.insert(share.resident_id) {
                return Err(BillIntegrityError::DuplicateResident(share.resident_id));
            }
            if share.amount.is_negative() {
                return Err(BillIntegrityError::NegativeShare(share.resident_id));
            }
        }

        let shares_total = self.shares_total();
        if shares_total != self.total {
            return Err(BillIntegrityError::SharesMismatch {
                total: self.total,
                shares_total,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Bill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.due_date.format("%Y-%m-%d"),
            self.description,
            self.total
        )
    }
}

/// Integrity errors for assembled bills
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillIntegrityError {
    #[error("Bill description cannot be empty")]
    BlankDescription,
    #[error("Bill total must be positive, got {0}")]
    NonPositiveTotal(Money),
    #[error("Bill total {0} exceeds the maximum amount")]
    TotalTooLarge(Money),
    #[error("Bill has no shares")]
    NoShares,
    #[error("Resident {0} appears more than once in the split")]
    DuplicateResident(ResidentId),
    #[error("Share for resident {0} is negative")]
    NegativeShare(ResidentId),
    #[error("Share totals ({shares_total}) do not match bill total ({total})")]
    SharesMismatch { total: Money, shares_total: Money },
}
