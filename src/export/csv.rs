//! CSV Export functionality
//!
//! Exports bill shares and the resident roster to CSV.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use super::export_error;
use crate::error::HouseholdResult;
use crate::storage::Storage;

#[derive(Serialize)]
struct ShareRow<'a> {
    #[serde(rename = "Bill ID")]
    bill_id: String,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Due Date")]
    due_date: String,
    #[serde(rename = "Total")]
    total: String,
    #[serde(rename = "Responsible")]
    responsible: &'a str,
    #[serde(rename = "Method")]
    method: String,
    #[serde(rename = "Resident")]
    resident: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Paid")]
    paid: bool,
    #[serde(rename = "Paid At")]
    paid_at: String,
}

#[derive(Serialize)]
struct ResidentRow<'a> {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "PIX Key")]
    pix_key: &'a str,
    #[serde(rename = "Active")]
    active: bool,
}

/// Export every bill share, one row per share, ordered by due date
pub fn export_shares_csv<W: Write>(storage: &Storage, writer: W) -> HouseholdResult<()> {
    let names: HashMap<_, _> = storage
        .residents
        .get_all()?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();
    let name_of = |id| names.get(&id).map(String::as_str).unwrap_or("Unknown");

    let mut csv_writer = csv::Writer::from_writer(writer);
    let bills = storage.bills.get_all()?;

    for bill in &bills {
        for share in &bill.shares {
            csv_writer
                .serialize(ShareRow {
                    bill_id: bill.id.to_string(),
                    description: &bill.description,
                    due_date: bill.due_date.to_string(),
                    total: bill.total.to_string(),
                    responsible: name_of(bill.responsible_id),
                    method: bill.payment_method.to_string(),
                    resident: name_of(share.resident_id),
                    amount: share.amount.to_string(),
                    paid: share.paid,
                    paid_at: share.paid_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
                })
                .map_err(export_error)?;
        }
    }

    csv_writer.flush().map_err(export_error)?;
    tracing::debug!(bills = bills.len(), "Exported shares to CSV");
    Ok(())
}

/// Export the resident roster, including residents who moved out
pub fn export_residents_csv<W: Write>(storage: &Storage, writer: W) -> HouseholdResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for resident in storage.residents.get_all()? {
        csv_writer
            .serialize(ResidentRow {
                id: resident.id.to_string(),
                name: &resident.name,
                email: resident.email.as_deref().unwrap_or(""),
                pix_key: resident.pix_key.as_deref().unwrap_or(""),
                active: resident.active,
            })
            .map_err(export_error)?;
    }

    csv_writer.flush().map_err(export_error)
}
