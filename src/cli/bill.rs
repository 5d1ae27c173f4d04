//! Bill CLI commands
//!
//! Implements CLI commands for creating, editing and settling shared bills,
//! plus the household balance summary.

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::bill::{
    format_balances, format_bill_details, format_bill_list, ResidentNames,
};
use crate::error::{HouseholdError, HouseholdResult};
use crate::models::{PaymentMethod, ResidentId};
use crate::services::{BillDraft, BillFilter, BillService, ResidentService};
use crate::storage::Storage;

/// Bill subcommands
#[derive(Subcommand)]
pub enum BillCommands {
    /// Add a bill and split it between residents
    Add {
        /// What the bill is for
        description: String,
        /// Total amount (e.g., "150.00" or "R$ 1.234,56")
        total: String,
        /// Resident who collects the payments
        #[arg(short, long)]
        responsible: String,
        /// Residents sharing the bill, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        participants: Vec<String>,
        /// Due date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        due: Option<String>,
        /// Payment method (pix, cash, transfer, boleto, card, other)
        #[arg(short, long)]
        method: Option<String>,
        /// Custom amount for a participant as RESIDENT=AMOUNT; the last
        /// participant absorbs any difference from the total
        #[arg(short, long)]
        custom: Vec<String>,
    },
    /// Edit a bill; shares are recomputed
    Edit {
        /// Bill ID
        bill: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        total: Option<String>,
        #[arg(short, long)]
        responsible: Option<String>,
        /// Replace the participant list, comma separated
        #[arg(short, long, value_delimiter = ',')]
        participants: Option<Vec<String>>,
        #[arg(short, long)]
        due: Option<String>,
        #[arg(short, long)]
        method: Option<String>,
        /// Switch to an equal split
        #[arg(long, conflicts_with = "custom")]
        equal: bool,
        /// Custom amount for a participant as RESIDENT=AMOUNT
        #[arg(short, long)]
        custom: Vec<String>,
    },
    /// List bills
    List {
        /// Only bills with unpaid shares
        #[arg(short, long)]
        unpaid: bool,
        /// Only bills involving this resident
        #[arg(short, long)]
        resident: Option<String>,
    },
    /// Show bill details and shares
    Show {
        /// Bill ID
        bill: String,
    },
    /// Mark a resident's share as paid
    Pay {
        /// Bill ID
        bill: String,
        /// Resident name or ID
        resident: String,
    },
    /// Mark a resident's share as unpaid
    Unpay {
        /// Bill ID
        bill: String,
        /// Resident name or ID
        resident: String,
    },
    /// Delete a bill
    Delete {
        /// Bill ID
        bill: String,
    },
}

fn parse_due_date(input: &str) -> HouseholdResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        HouseholdError::Validation(format!(
            "Invalid due date: '{}'. Use format YYYY-MM-DD",
            input
        ))
    })
}

fn parse_method(input: &str) -> HouseholdResult<PaymentMethod> {
    PaymentMethod::parse(input).ok_or_else(|| {
        HouseholdError::Validation(format!(
            "Invalid payment method: '{}'. Valid methods: pix, cash, transfer, boleto, card, other",
            input
        ))
    })
}

fn resolve_all(residents: &ResidentService, identifiers: &[String]) -> HouseholdResult<Vec<ResidentId>> {
    identifiers
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| residents.resolve(s).map(|r| r.id))
        .collect()
}

/// Apply `RESIDENT=AMOUNT` entries to a draft already in custom mode
fn apply_custom_amounts(
    draft: &mut BillDraft,
    residents: &ResidentService,
    entries: &[String],
) -> HouseholdResult<()> {
    for entry in entries {
        let (who, amount) = entry.rsplit_once('=').ok_or_else(|| {
            HouseholdError::Validation(format!(
                "Invalid custom amount: '{}'. Use RESIDENT=AMOUNT",
                entry
            ))
        })?;
        let resident = residents.resolve(who.trim())?;

        if !draft.participants().contains(&resident.id) {
            return Err(HouseholdError::Validation(format!(
                "'{}' is not a participant of this bill",
                resident.name
            )));
        }
        draft.set_custom_amount(resident.id, amount.trim());
    }
    Ok(())
}

fn resident_names(storage: &Storage) -> HouseholdResult<ResidentNames> {
    Ok(storage
        .residents
        .get_all()?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect())
}

/// Handle a bill command
pub fn handle_bill_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BillCommands,
) -> HouseholdResult<()> {
    let service = BillService::new(storage);
    let residents = ResidentService::new(storage);
    let symbol = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();

    match cmd {
        BillCommands::Add {
            description,
            total,
            responsible,
            participants,
            due,
            method,
            custom,
        } => {
            let mut draft = BillDraft::new();
            draft
                .set_description(description)
                .set_total(total)
                .set_responsible(residents.resolve(&responsible)?.id)
                .set_participants(&resolve_all(&residents, &participants)?)
                .set_payment_method(match method {
                    Some(m) => parse_method(&m)?,
                    None => settings.default_payment_method,
                });
            if let Some(due) = due {
                draft.set_due_date(parse_due_date(&due)?);
            }
            if !custom.is_empty() {
                draft.use_custom_split();
                apply_custom_amounts(&mut draft, &residents, &custom)?;
            }

            let bill = service.create(&mut draft)?;
            println!("Created bill: {}", bill.description);
            print!(
                "{}",
                format_bill_details(&bill, &resident_names(storage)?, symbol, date_format)
            );
        }

        BillCommands::Edit {
            bill,
            description,
            total,
            responsible,
            participants,
            due,
            method,
            equal,
            custom,
        } => {
            let found = service.resolve(&bill)?;
            let mut draft = BillDraft::edit(&found);
            let mut changed = false;

            if let Some(description) = description {
                draft.set_description(description);
                changed = true;
            }
            if let Some(total) = total {
                draft.set_total(total);
                changed = true;
            }
            if let Some(responsible) = responsible {
                draft.set_responsible(residents.resolve(&responsible)?.id);
                changed = true;
            }
            if let Some(participants) = participants {
                draft.set_participants(&resolve_all(&residents, &participants)?);
                changed = true;
            }
            if let Some(due) = due {
                draft.set_due_date(parse_due_date(&due)?);
                changed = true;
            }
            if let Some(method) = method {
                draft.set_payment_method(parse_method(&method)?);
                changed = true;
            }
            if equal {
                draft.use_equal_split();
                changed = true;
            }
            if !custom.is_empty() {
                draft.use_custom_split();
                apply_custom_amounts(&mut draft, &residents, &custom)?;
                changed = true;
            }

            if !changed {
                println!("No changes specified. Run 'household bill edit --help' for options.");
                return Ok(());
            }

            let updated = service.update(found.id, &mut draft)?;
            println!("Updated bill: {}", updated.description);
            print!(
                "{}",
                format_bill_details(&updated, &resident_names(storage)?, symbol, date_format)
            );
        }

        BillCommands::List { unpaid, resident } => {
            let mut filter = BillFilter::new();
            if unpaid {
                filter = filter.unpaid();
            }
            if let Some(resident) = resident {
                filter = filter.resident(residents.resolve(&resident)?.id);
            }

            let bills = service.list(filter)?;
            print!(
                "{}",
                format_bill_list(
                    &bills,
                    &resident_names(storage)?,
                    symbol,
                    date_format,
                    Local::now().date_naive(),
                )
            );
        }

        BillCommands::Show { bill } => {
            let found = service.resolve(&bill)?;
            print!(
                "{}",
                format_bill_details(&found, &resident_names(storage)?, symbol, date_format)
            );
        }

        BillCommands::Pay { bill, resident } => {
            let found = service.resolve(&bill)?;
            let resident = residents.resolve(&resident)?;
            let updated = service.mark_paid(found.id, resident.id)?;

            println!(
                "Marked {}'s share of '{}' as paid",
                resident.name, updated.description
            );
            if updated.is_settled() {
                println!("Bill is fully settled.");
            } else {
                println!(
                    "Outstanding: {}",
                    updated.outstanding().format_with_symbol(symbol)
                );
            }
        }

        BillCommands::Unpay { bill, resident } => {
            let found = service.resolve(&bill)?;
            let resident = residents.resolve(&resident)?;
            let updated = service.mark_unpaid(found.id, resident.id)?;

            println!(
                "Marked {}'s share of '{}' as unpaid",
                resident.name, updated.description
            );
        }

        BillCommands::Delete { bill } => {
            let found = service.resolve(&bill)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted bill: {}", deleted.description);
        }
    }

    Ok(())
}

/// Print what each resident owes and is owed across unpaid shares
pub fn handle_balance_command(storage: &Storage, settings: &Settings) -> HouseholdResult<()> {
    let balances = BillService::new(storage).balances()?;
    print!("{}", format_balances(&balances, &settings.currency_symbol));
    Ok(())
}
