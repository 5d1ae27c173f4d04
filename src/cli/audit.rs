//! Audit log CLI command

use crate::display::bill::format_audit_entries;
use crate::error::HouseholdResult;
use crate::storage::Storage;

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(storage: &Storage, limit: usize) -> HouseholdResult<()> {
    let entries = storage.audit().read_recent(limit)?;
    print!("{}", format_audit_entries(&entries));
    Ok(())
}
