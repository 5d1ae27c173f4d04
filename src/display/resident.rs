//! Resident display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Resident;

#[derive(Tabled)]
struct ResidentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "PIX Key")]
    pix_key: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

impl From<&Resident> for ResidentRow {
    fn from(resident: &Resident) -> Self {
        Self {
            id: resident.id.to_string(),
            name: resident.name.clone(),
            email: resident.email.clone().unwrap_or_default(),
            pix_key: resident.pix_key.clone().unwrap_or_default(),
            status: if resident.active { "Active" } else { "Moved out" },
        }
    }
}

/// Format residents as a table
pub fn format_resident_list(residents: &[Resident]) -> String {
    if residents.is_empty() {
        return "No residents found.".to_string();
    }

    let rows: Vec<ResidentRow> = residents.iter().map(ResidentRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Format a single resident's details
pub fn format_resident_details(resident: &Resident, bill_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Resident: {}\n", resident.name));
    output.push_str(&format!("  ID:       {}\n", resident.id));
    output.push_str(&format!(
        "  Email:    {}\n",
        resident.email.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "  PIX Key:  {}\n",
        resident.pix_key.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "  Active:   {}\n",
        if resident.active { "Yes" } else { "No" }
    ));
    output.push_str(&format!("  Bills:    {}\n", bill_count));
    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        resident.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        resident.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}
