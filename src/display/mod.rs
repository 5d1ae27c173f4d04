//! Display formatting for terminal output
//!
//! List views render through `tabled`; detail views and the balance summary
//! are laid out by hand. Amounts carry the configured currency symbol here
//! and nowhere else.

pub mod bill;
pub mod resident;

pub use bill::{format_audit_entries, format_balances, format_bill_details, format_bill_list};
pub use resident::{format_resident_details, format_resident_list};
