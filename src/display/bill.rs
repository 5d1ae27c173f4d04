//! Bill, balance and audit display formatting

use std::collections::HashMap;

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::audit::AuditEntry;
use crate::models::{Bill, Money, ResidentId};
use crate::services::ResidentBalance;

/// Resident names by id, for labelling shares
pub type ResidentNames = HashMap<ResidentId, String>;

fn name_of(names: &ResidentNames, id: ResidentId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}

#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Outstanding")]
    outstanding: String,
    #[tabled(rename = "Responsible")]
    responsible: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn bill_status(bill: &Bill, today: NaiveDate) -> String {
    let paid = bill.shares.iter().filter(|s| s.paid).count();
    if bill.is_settled() {
        "Settled".to_string()
    } else if bill.is_overdue(today) {
        format!("Overdue ({}/{} paid)", paid, bill.shares.len())
    } else {
        format!("{}/{} paid", paid, bill.shares.len())
    }
}

/// Format bills as a table
pub fn format_bill_list(
    bills: &[Bill],
    names: &ResidentNames,
    symbol: &str,
    date_format: &str,
    today: NaiveDate,
) -> String {
    if bills.is_empty() {
        return "No bills found.".to_string();
    }

    let rows: Vec<BillRow> = bills
        .iter()
        .map(|bill| BillRow {
            id: bill.id.to_string(),
            due: bill.due_date.format(date_format).to_string(),
            description: bill.description.clone(),
            total: bill.total.format_with_symbol(symbol),
            outstanding: bill.outstanding().format_with_symbol(symbol),
            responsible: name_of(names, bill.responsible_id),
            status: bill_status(bill, today),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Format a single bill with its shares
pub fn format_bill_details(
    bill: &Bill,
    names: &ResidentNames,
    symbol: &str,
    date_format: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Bill: {}\n", bill.description));
    output.push_str(&format!("  ID:          {}\n", bill.id));
    output.push_str(&format!(
        "  Total:       {}\n",
        bill.total.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Due:         {}\n",
        bill.due_date.format(date_format)
    ));
    output.push_str(&format!(
        "  Responsible: {}\n",
        name_of(names, bill.responsible_id)
    ));
    output.push_str(&format!("  Method:      {}\n", bill.payment_method));
    output.push_str(&format!("  Split:       {}\n", bill.split_mode));
    if let Err(e) = bill.validate() {
        output.push_str(&format!("  WARNING:     {}\n", e));
    }
    output.push('\n');

    let name_width = bill
        .shares
        .iter()
        .map(|s| name_of(names, s.resident_id).chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    output.push_str(&format!(
        "  {:<name_width$}  {:>12}  {}\n",
        "Resident", "Amount", "Paid",
    ));
    output.push_str(&format!("  {:-<name_width$}  {:->12}  {:-<4}\n", "", "", ""));

    for share in &bill.shares {
        let paid = match share.paid_at {
            Some(at) if share.paid => format!("Yes ({})", at.format("%Y-%m-%d")),
            _ if share.paid => "Yes".to_string(),
            _ => "No".to_string(),
        };
        output.push_str(&format!(
            "  {:<name_width$}  {:>12}  {}\n",
            name_of(names, share.resident_id),
            share.amount.format_with_symbol(symbol),
            paid,
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Paid:        {}\n",
        bill.paid_total().format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Outstanding: {}\n",
        bill.outstanding().format_with_symbol(symbol)
    ));

    output
}

/// Format the household balance summary
pub fn format_balances(balances: &[ResidentBalance], symbol: &str) -> String {
    if balances.is_empty() {
        return "No residents found.".to_string();
    }

    let name_width = balances
        .iter()
        .map(|b| b.resident.name.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {:>12}  {:>12}\n",
        "Resident", "Owes", "Is Owed", "Net",
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:->12}  {:->12}\n",
        "", "", "", "",
    ));

    for balance in balances {
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {:>12}  {:>12}\n",
            balance.resident.name,
            balance.owes.format_with_symbol(symbol),
            balance.owed.format_with_symbol(symbol),
            balance.net().format_with_symbol(symbol),
        ));
    }

    let outstanding: Money = balances.iter().map(|b| b.owes).sum();
    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:->12}  {:->12}\n",
        "", "", "", "",
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:>12}\n",
        "TOTAL",
        outstanding.format_with_symbol(symbol),
    ));

    output
}

/// Format audit entries, one per line with diffs indented below
pub fn format_audit_entries(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No audit entries.".to_string();
    }

    entries
        .iter()
        .map(|e| e.format_human_readable())
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}
