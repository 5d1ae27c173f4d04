//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod bill;
pub mod export;
pub mod resident;

pub use audit::handle_audit_command;
pub use bill::{handle_balance_command, handle_bill_command, BillCommands};
pub use export::{handle_export_command, ExportArgs, ExportFormat};
pub use resident::{handle_resident_command, ResidentCommands};
