//! Tillside CLI - seeding and diagnostics for the POS backend.
//!
//! # Usage
//!
//! ```bash
//! # Check that the configured backend is reachable
//! till ping
//!
//! # Print entity counts
//! till counts
//!
//! # Load a small demo data set (customers and items)
//! till seed
//! ```
//!
//! The backend connection is configured the same way as the terminal, via
//! `POS_BACKEND_URL`, `POS_BACKEND_FLAVOR` and `POS_BACKEND_TOKEN`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "till")]
#[command(author, version, about = "Tillside CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the configured backend is reachable
    Ping,
    /// Print entity counts
    Counts,
    /// Load a small demo data set into the backend
    Seed {
        /// Skip seeding customers
        #[arg(long)]
        no_customers: bool,

        /// Skip seeding items
        #[arg(long)]
        no_items: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Ping => commands::status::ping().await?,
        Commands::Counts => commands::status::counts().await?,
        Commands::Seed {
            no_customers,
            no_items,
        } => commands::seed::demo_data(!no_customers, !no_items).await?,
    }
    Ok(())
}
