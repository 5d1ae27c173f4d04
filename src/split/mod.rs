//! Expense splitting
//!
//! Pure arithmetic that divides a bill total among participants so the
//! resulting shares always sum to the total to the cent. Two entry points:
//!
//! - [`allocate_equal`]: even division, remainder to the last participant.
//! - [`reconcile`] / [`reconcile_input`]: user-entered amounts, with any
//!   discrepancy pushed onto the last entry.
//!
//! Both keep the caller's participant order and never fail. Empty input
//! yields empty output; callers reject empty selections beforehand.

mod allocate;
mod reconcile;

pub use allocate::allocate_equal;
pub use reconcile::{reconcile, reconcile_input};
