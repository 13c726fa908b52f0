//! Surf Bot CLI - Host bootstrap, database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Provision this VM: packages, Docker, volume, password, container
//! surf-cli bootstrap
//!
//! # Apply schema migrations
//! surf-cli migrate run
//!
//! # Show applied and pending migrations
//! surf-cli migrate status
//!
//! # Seed beaches from the public spot listing, or from a file
//! surf-cli seed beaches
//! surf-cli seed beaches --file beaches.yaml
//! ```
//!
//! # Commands
//!
//! - `bootstrap` - Idempotently (re)create the `surf-postgres` container
//! - `migrate` - Run or inspect database migrations
//! - `seed` - Seed the database with beaches
//!
//! Log verbosity follows `RUST_LOG`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod config;
mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "surf-cli")]
#[command(author, version, about = "Surf bot CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision this host and (re)create the database container
    Bootstrap,
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply pending migrations
    Run,
    /// List migrations and whether each has been applied
    Status,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert or refresh beaches
    Beaches {
        /// YAML file with a list of `{slug, name}` entries
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Spot listing to scrape when no file is given
        #[arg(long, default_value = commands::seed::DEFAULT_LISTING_URL)]
        url: String,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "surf_cli=info,surf_bot_provision=info,surf_bot_store=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Bootstrap => commands::bootstrap::run().await?,
        Commands::Migrate { action } => match action {
            MigrateAction::Run => commands::migrate::run().await?,
            MigrateAction::Status => commands::migrate::status().await?,
        },
        Commands::Seed { target } => match target {
            SeedTarget::Beaches { file, url } => {
                commands::seed::beaches(file.as_deref(), &url).await?;
            }
        },
    }
    Ok(())
}
