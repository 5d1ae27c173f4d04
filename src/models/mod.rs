//! Core data models for household-cli
//!
//! Residents, bills and their shares, and the money and id types they are
//! built from.

pub mod bill;
pub mod ids;
pub mod money;
pub mod resident;

pub use bill::{Bill, BillIntegrityError, PaymentMethod, Share, SplitMode};
pub use ids::{BillId, ResidentId};
pub use money::{Money, MoneyParseError};
pub use resident::{Resident, ResidentValidationError};
