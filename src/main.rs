use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use smeops::core::log::init_logging;
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

impl From<Commands> for smeops::AppCommand {
    fn from(cmd: Commands) -> smeops::AppCommand {
        match cmd {
            Commands::Import { file } => smeops::AppCommand::Import { path: file },
            Commands::Plan => smeops::AppCommand::Plan,
            Commands::Tax { rate } => smeops::AppCommand::Tax {
                corporate_rate: rate,
            },
            Commands::Forecast { goal } => smeops::AppCommand::Forecast { goal },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Load accounts, opportunities, transactions and goals from a YAML or JSON file
    Import {
        /// File to import
        file: PathBuf,
    },
    /// Allocate account liquidity to investment opportunities
    Plan,
    /// Estimate corporate income tax and VAT
    Tax {
        /// Corporate tax rate override, e.g. 0.15
        #[arg(short, long)]
        rate: Option<f64>,
    },
    /// Project a savings goal
    Forecast {
        /// Goal id (defaults to the first goal)
        #[arg(short, long)]
        goal: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => smeops::cli::setup::setup_at_path(path),
            None => smeops::cli::setup::setup(),
        },
        Some(cmd) => smeops::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
