//! Resident CLI commands
//!
//! Implements CLI commands for managing who lives in the household.

use clap::Subcommand;

use crate::display::resident::{format_resident_details, format_resident_list};
use crate::error::HouseholdResult;
use crate::services::{BillFilter, BillService, ResidentChanges, ResidentService};
use crate::storage::Storage;

/// Resident subcommands
#[derive(Subcommand)]
pub enum ResidentCommands {
    /// Add a resident
    Add {
        /// Resident name
        name: String,
        /// Contact email
        #[arg(short, long)]
        email: Option<String>,
        /// PIX key for receiving payments
        #[arg(short, long)]
        pix: Option<String>,
    },
    /// List residents
    List {
        /// Include residents who moved out
        #[arg(short, long)]
        all: bool,
    },
    /// Show resident details
    Show {
        /// Resident name or ID
        resident: String,
    },
    /// Edit a resident (pass an empty string to clear email or PIX key)
    Edit {
        /// Resident name or ID
        resident: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New email
        #[arg(short, long)]
        email: Option<String>,
        /// New PIX key
        #[arg(short, long)]
        pix: Option<String>,
    },
    /// Mark a resident as moved out
    Deactivate {
        /// Resident name or ID
        resident: String,
    },
    /// Mark a resident as living in the household again
    Activate {
        /// Resident name or ID
        resident: String,
    },
    /// Remove a resident who appears on no bill
    Remove {
        /// Resident name or ID
        resident: String,
    },
}

/// Handle a resident command
pub fn handle_resident_command(storage: &Storage, cmd: ResidentCommands) -> HouseholdResult<()> {
    let service = ResidentService::new(storage);

    match cmd {
        ResidentCommands::Add { name, email, pix } => {
            let resident = service.create(&name, email.as_deref(), pix.as_deref())?;

            println!("Added resident: {}", resident.name);
            println!("  ID: {}", resident.id);
        }

        ResidentCommands::List { all } => {
            let residents = service.list(all)?;
            print!("{}", format_resident_list(&residents));
        }

        ResidentCommands::Show { resident } => {
            let found = service.resolve(&resident)?;
            let bill_count = BillService::new(storage)
                .list(BillFilter::new().resident(found.id))?
                .len();

            print!("{}", format_resident_details(&found, bill_count));
        }

        ResidentCommands::Edit {
            resident,
            name,
            email,
            pix,
        } => {
            let found = service.resolve(&resident)?;
            let changes = ResidentChanges {
                name,
                email,
                pix_key: pix,
            };

            if changes.is_empty() {
                println!("No changes specified. Use --name, --email or --pix.");
                return Ok(());
            }

            let updated = service.update(found.id, changes)?;
            println!("Updated resident: {}", updated.name);
        }

        ResidentCommands::Deactivate { resident } => {
            let found = service.resolve(&resident)?;
            let updated = service.deactivate(found.id)?;
            println!("Deactivated resident: {}", updated.name);
        }

        ResidentCommands::Activate { resident } => {
            let found = service.resolve(&resident)?;
            let updated = service.activate(found.id)?;
            println!("Activated resident: {}", updated.name);
        }

        ResidentCommands::Remove { resident } => {
            let found = service.resolve(&resident)?;
            let removed = service.remove(found.id)?;
            println!("Removed resident: {}", removed.name);
        }
    }

    Ok(())
}
