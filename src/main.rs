use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use household_cli::cli::{
    handle_audit_command, handle_balance_command, handle_bill_command, handle_export_command,
    handle_resident_command, BillCommands, ExportArgs, ResidentCommands,
};
use household_cli::config::paths::{HouseholdPaths, DATA_DIR_ENV};
use household_cli::config::settings::Settings;
use household_cli::storage::{init::initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "household",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based shared household bill splitting",
    long_about = "household-cli keeps track of the bills a shared home pays together: \
                  who lives there, how each bill is split, who has paid their share \
                  and who is owed what."
)]
struct Cli {
    /// Data directory (defaults to the user config directory)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resident management commands
    #[command(subcommand)]
    Resident(ResidentCommands),

    /// Bill management commands
    #[command(subcommand)]
    Bill(BillCommands),

    /// Show what each resident owes and is owed
    Balance,

    /// Export household data
    Export(ExportArgs),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => HouseholdPaths::with_base_dir(dir),
        None => HouseholdPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    settings.logging.init()?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Resident(cmd)) => handle_resident_command(&storage, cmd)?,
        Some(Commands::Bill(cmd)) => handle_bill_command(&storage, &settings, cmd)?,
        Some(Commands::Balance) => handle_balance_command(&storage, &settings)?,
        Some(Commands::Export(args)) => handle_export_command(&storage, args)?,
        Some(Commands::Audit { limit }) => handle_audit_command(&storage, limit)?,
        Some(Commands::Init) => {
            println!("Initializing household-cli at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  household resident add <name>");
            println!("  household bill add <description> <total> --responsible <name> --participants <a,b>");
        }
        Some(Commands::Config) => {
            println!("household-cli Configuration");
            println!("===========================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!(
                "Initialized:     {}",
                if paths.is_initialized() { "Yes" } else { "No" }
            );
            println!();
            println!("Settings:");
            println!("  Currency symbol:        {}", settings.currency_symbol);
            println!("  Default payment method: {}", settings.default_payment_method);
            println!("  Date format:            {}", settings.date_format);
            println!(
                "  Logging:                {} ({})",
                settings.logging.level, settings.logging.format
            );
        }
        None => {
            println!("household-cli - Shared household bill splitting");
            println!();
            println!("Run 'household --help' for usage information.");
        }
    }

    Ok(())
}
