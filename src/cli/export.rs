//! CLI command for data export
//!
//! Writes to a file when `--output` is given, otherwise to stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::error::{HouseholdError, HouseholdResult};
use crate::export::{csv, json, yaml};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// CSV, one row per bill share
    Csv,
    /// JSON, full household snapshot
    Json,
    /// YAML, full household snapshot (human-readable)
    Yaml,
}

/// Export arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(value_enum)]
    pub format: ExportFormat,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Export the resident roster instead of bill shares (CSV only)
    #[arg(long)]
    pub residents: bool,
}

/// Handle the export command
pub fn handle_export_command(storage: &Storage, args: ExportArgs) -> HouseholdResult<()> {
    if args.residents && args.format != ExportFormat::Csv {
        return Err(HouseholdError::Validation(
            "--residents is only available for CSV export".into(),
        ));
    }

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                HouseholdError::Export(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    match args.format {
        ExportFormat::Csv if args.residents => csv::export_residents_csv(storage, &mut writer)?,
        ExportFormat::Csv => csv::export_shares_csv(storage, &mut writer)?,
        ExportFormat::Json => {
            json::export_full_json(storage, &mut writer, args.pretty)?;
            writeln!(writer)?;
        }
        ExportFormat::Yaml => yaml::export_full_yaml(storage, &mut writer)?,
    }
    writer.flush()?;

    if let Some(path) = &args.output {
        eprintln!("Exported {:?} to: {}", args.format, path.display());
    }

    Ok(())
}
