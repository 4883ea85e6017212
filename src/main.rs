use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use hustle::StorageMode;
use hustle::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Keep ventures in memory only; nothing is saved
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for hustle::AppCommand {
    fn from(cmd: Commands) -> hustle::AppCommand {
        match cmd {
            Commands::Show => hustle::AppCommand::Show,
            Commands::List => hustle::AppCommand::List,
            Commands::Add {
                name,
                revenue,
                expenses,
            } => hustle::AppCommand::Add {
                name,
                revenue,
                expenses,
            },
            Commands::Delete { id } => hustle::AppCommand::Delete { id },
            Commands::Reset => hustle::AppCommand::Reset,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Compare the ventures against the stock, with live market data
    Show,
    /// List saved ventures without fetching market data
    List,
    /// Add a venture
    Add {
        /// Venture name
        name: String,
        /// Revenue so far; anything non-numeric counts as zero
        #[arg(short, long, default_value = "0")]
        revenue: String,
        /// Free-text expenses
        #[arg(short, long, default_value = "")]
        expenses: String,
    },
    /// Delete a venture by id
    Delete {
        id: u64,
    },
    /// Restore the default ventures
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let storage = if cli.ephemeral {
        StorageMode::Ephemeral
    } else {
        StorageMode::Disk
    };

    let result = match cli.command {
        Some(Commands::Setup) => hustle::cli::setup::setup(),
        Some(cmd) => hustle::run_command(cmd.into(), cli.config_path.as_deref(), storage).await,
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
