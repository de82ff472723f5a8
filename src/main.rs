//! Contactbook CLI - interactive contact manager backed by SQLite

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use contactbook::config::{self, Settings};
use contactbook::storage::ContactStore;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "contactbook")]
#[command(version)]
#[command(about = "Single-user contact book backed by SQLite")]
#[command(long_about = r#"
Contactbook keeps contacts (name, email, phone, notes) in a local SQLite file.

Run without a subcommand for the interactive menu, or script it:
  contactbook add "Ana" --email ana@x.com
  contactbook search ana
  contactbook export --output contacts.csv
  contactbook backup
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to a TOML config file (default: contactbook.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format for subcommands
    #[arg(long, value_enum, default_value = "human", global = true)]
    format: OutputMode,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (the default)
    Shell,

    /// Create a contact
    Add {
        /// Contact name (required)
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List contacts, most recent first
    List {
        /// Maximum number of contacts (default from config, else 100)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one contact
    Show {
        id: i64,
    },

    /// Case-insensitive search over name, email, phone and notes
    Search {
        term: String,
    },

    /// Change the given fields of a contact, leaving the rest untouched
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Clear an optional field (repeatable)
        #[arg(long, value_enum)]
        clear: Vec<OptionalField>,
    },

    /// Delete a contact
    Delete {
        id: i64,

        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// Export contacts to CSV
    Export {
        /// Destination file (default from config, else contacts_export.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Copy the database file
    Backup {
        /// Destination file (default: backup_<YYYYMMDD_HHMMSS>.db)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Optional columns that `update --clear` accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptionalField {
    Email,
    Phone,
    Notes,
}

/// Print the JSON envelope used by every subcommand in `--format json`
pub fn emit_success(command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    let payload = serde_json::json!({
        "status": "ok",
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file_config = config::load_config(cli.config.as_deref())?;
    let settings = Settings::resolve(file_config.as_ref(), cli.database.as_deref());
    config::ensure_db_dir(&settings.database)?;

    tracing::debug!("using database {}", settings.database.display());
    let store = ContactStore::open(&settings.database)?;
    let mode = cli.format;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => commands::run_shell(&store, &settings),
        Commands::Add { name, email, phone, notes } => {
            commands::run_add(&store, mode, name, email, phone, notes)
        }
        Commands::List { limit } => {
            commands::run_list(&store, mode, limit.unwrap_or(settings.list_limit))
        }
        Commands::Show { id } => commands::run_show(&store, mode, id),
        Commands::Search { term } => commands::run_search(&store, mode, &term),
        Commands::Update { id, name, email, phone, notes, clear } => {
            let changes = commands::build_update(name, email, phone, notes, &clear)?;
            commands::run_update(&store, mode, id, &changes)
        }
        Commands::Delete { id, yes } => commands::run_delete(&store, mode, id, yes),
        Commands::Export { output } => {
            let destination = output.unwrap_or_else(|| settings.export_file.clone());
            commands::run_export(&store, mode, &destination)
        }
        Commands::Backup { output } => commands::run_backup(&store, mode, output.as_deref()),
    }
}
