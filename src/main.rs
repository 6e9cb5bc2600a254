use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

use debtmodel::cli::{
    handle_backup_command, handle_characteristic_command, handle_history_command,
    handle_reset_command, handle_restore_command, CharacteristicCommands,
};
use debtmodel::config::{paths::DebtPaths, settings::Settings};
use debtmodel::storage::Storage;

#[derive(Parser)]
#[command(
    name = "debtmodel",
    version,
    about = "Back up, restore and reset the technical debt model",
    long_about = "debtmodel keeps the technical debt model (the characteristic tree \
                  and the remediation cost of every rule) in sync with XML backups \
                  and with the models declared by plugins."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show configuration information
    Config,

    /// Export the debt model as XML
    Backup {
        /// Only export the rules of this language
        #[arg(short, long)]
        language: Option<String>,
        /// Write the XML to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the XML to a new file of the backups directory
        #[arg(long, conflicts_with = "output")]
        save: bool,
    },

    /// Restore the debt model from an XML backup
    Restore {
        /// Path to the XML file
        file: PathBuf,
        /// Only restore the rules of this language
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Reset the debt model to the plugin defaults
    Reset,

    /// Show the most recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Characteristic management commands
    #[command(subcommand, alias = "chc")]
    Characteristic(CharacteristicCommands),
}

fn init_tracing() {
    // Logs go to stderr so stdout stays clean for exported XML
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "debtmodel=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = DebtPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?.with_audit(settings.audit_enabled);
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing debt model at: {}", paths.base_dir().display());
            debtmodel::storage::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'debtmodel reset' to load the default debt model.");
        }
        Some(Commands::Config) => {
            println!("Debt Model Configuration");
            println!("========================");
            println!("Base directory:             {}", paths.base_dir().display());
            println!(
                "Initialized:                {}",
                !debtmodel::storage::init::needs_initialization(&paths)
            );
            println!("Data directory:             {}", paths.data_dir().display());
            println!("Backup directory:           {}", paths.backup_dir().display());
            println!("Plugins directory:          {}", paths.plugins_dir().display());
            println!(
                "Rule definitions directory: {}",
                paths.rule_definitions_dir().display()
            );
            println!();
            println!("Settings:");
            println!("  Default duration unit: {}", settings.default_duration_unit);
            println!("  Default model plugin:  {}", settings.default_plugin_key);
            println!("  Audit enabled:         {}", settings.audit_enabled);
        }
        Some(Commands::Backup {
            language,
            output,
            save,
        }) => {
            handle_backup_command(
                &storage,
                &settings,
                language.as_deref(),
                output.as_deref(),
                save,
            )?;
        }
        Some(Commands::Restore { file, language }) => {
            handle_restore_command(&storage, &settings, &file, language.as_deref())?;
        }
        Some(Commands::Reset) => {
            handle_reset_command(&storage, &settings)?;
        }
        Some(Commands::History { limit }) => {
            handle_history_command(&storage, limit)?;
        }
        Some(Commands::Characteristic(cmd)) => {
            handle_characteristic_command(&storage, cmd)?;
        }
        None => {
            println!("debtmodel - technical debt model synchronizer");
            println!();
            println!("Run 'debtmodel --help' for usage information.");
        }
    }

    Ok(())
}
