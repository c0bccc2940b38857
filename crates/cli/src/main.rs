//! Auction House CLI - Main entry point

use auctionhouse_cli::commands;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "auctionhouse")]
#[command(about = "Auction House - replay auction scenarios against mock services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario file and report the status of every step
    Run {
        /// Scenario JSON file
        scenario: PathBuf,
        /// House configuration JSON file (overrides any config in the scenario)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the house configuration as JSON
    Config {
        /// Configuration file to check and print (defaults otherwise)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            json,
        } => {
            commands::run(&scenario, config.as_deref(), json)?;
        }

        Commands::Config { file } => {
            commands::config(file.as_deref())?;
        }
    }

    Ok(())
}
