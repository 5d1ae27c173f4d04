//! Service layer for household-cli
//!
//! The service layer provides business logic on top of the storage layer:
//! bill drafts, validation against stored residents, payments and balances.

pub mod bill;
pub mod draft;
pub mod resident;

pub use bill::{BillFilter, BillService, ResidentBalance};
pub use draft::{BillDraft, BillValidationError, DraftState, SplitInput};
pub use resident::{ResidentChanges, ResidentService};
