use anyhow::Result;
use chrono::Local;
use clap::{Args, CommandFactory, Parser, Subcommand};
use spendlog::cli::records::RecordChanges;
use spendlog::cli::theme::ThemeAction;
use spendlog::cli::transfer::DEFAULT_EXPORT_FILE;
use spendlog::core::log::init_logging;
use spendlog::core::record::DATE_FORMAT;
use spendlog::core::{RecordFields, TypeFilter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct AddArgs {
    /// What the money was for
    description: String,
    /// Amount; the sign is ignored, use --type for direction
    #[arg(allow_negative_numbers = true)]
    amount: String,
    /// food, transport, entertainment, shopping, bills, health, salary,
    /// freelance, investment or other
    #[arg(long)]
    category: String,
    /// income or expense
    #[arg(short = 't', long = "type", default_value = "expense")]
    kind: String,
    /// Date as YYYY-MM-DD, defaults to today
    #[arg(short, long)]
    date: Option<String>,
}

#[derive(Args)]
struct EditArgs {
    /// Id of the transaction to change
    id: u64,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    amount: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(short = 't', long = "type")]
    kind: Option<String>,
    #[arg(short, long)]
    date: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the example configuration, at --config-path if given
    Setup,
    /// Record a new income or expense
    Add(AddArgs),
    /// Change an existing transaction
    Edit(EditArgs),
    /// Delete a transaction
    Delete {
        /// Id of the transaction to delete
        id: u64,
    },
    /// Delete all transactions
    Clear {
        /// Confirm deleting everything
        #[arg(long)]
        yes: bool,
    },
    /// List transactions, newest first
    List {
        /// all, income or expense
        #[arg(short = 't', long = "type", default_value = "all")]
        filter: TypeFilter,
        /// Only show transactions whose description or category contains this text
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Display totals and top expense categories
    Summary,
    /// Replace all transactions with the contents of a JSON export
    Import {
        path: PathBuf,
    },
    /// Write all transactions to a JSON file
    Export {
        #[arg(short, long, default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },
    /// Show or change the color theme (light, dark or toggle)
    Theme {
        action: Option<ThemeAction>,
    },
    /// Add example transactions to an empty ledger
    Demo,
}

impl From<Commands> for spendlog::AppCommand {
    fn from(cmd: Commands) -> spendlog::AppCommand {
        match cmd {
            Commands::Add(args) => spendlog::AppCommand::Add(RecordFields {
                description: args.description,
                amount: args.amount,
                category: args.category,
                kind: args.kind,
                date: args
                    .date
                    .unwrap_or_else(|| Local::now().date_naive().format(DATE_FORMAT).to_string()),
            }),
            Commands::Edit(args) => spendlog::AppCommand::Edit {
                id: args.id,
                changes: RecordChanges {
                    description: args.description,
                    amount: args.amount,
                    category: args.category,
                    kind: args.kind,
                    date: args.date,
                },
            },
            Commands::Delete { id } => spendlog::AppCommand::Delete { id },
            Commands::Clear { yes } => spendlog::AppCommand::Clear { confirmed: yes },
            Commands::List { filter, search } => spendlog::AppCommand::List { filter, search },
            Commands::Summary => spendlog::AppCommand::Summary,
            Commands::Import { path } => spendlog::AppCommand::Import { path },
            Commands::Export { output } => spendlog::AppCommand::Export { path: output },
            Commands::Theme { action } => {
                spendlog::AppCommand::Theme(action.unwrap_or(ThemeAction::Show))
            }
            Commands::Demo => spendlog::AppCommand::Demo,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => {
            spendlog::cli::setup::setup(cli.config_path.as_deref()).map(|_| ())
        }
        Some(cmd) => spendlog::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
