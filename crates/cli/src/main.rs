//! BBS Entertainment CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the documents and session tables
//! bbs-cli migrate
//!
//! # Load the demo catalog
//! bbs-cli seed crates/storefront/seed/catalog.yaml
//!
//! # Give a signed-up customer access to /admin
//! bbs-cli admin grant --email alice@example.com
//! bbs-cli admin revoke --email alice@example.com
//! ```
//!
//! All commands read `BBS_DATABASE_URL` (a `.env` file is honored).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bbs-cli")]
#[command(author, version, about = "BBS Entertainment CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load categories, products, users and orders from a YAML file
    Seed {
        /// Path to the seed file
        path: String,

        /// Parse and validate the file without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage the admin flag on customer profiles
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Let a customer into the admin console
    Grant {
        /// Email of the customer profile
        #[arg(short, long)]
        email: String,
    },
    /// Remove a customer's admin access
    Revoke {
        /// Email of the customer profile
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { path, dry_run } => commands::seed::catalog(&path, dry_run).await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { email } => commands::admin::set_admin(&email, true).await?,
            AdminAction::Revoke { email } => commands::admin::set_admin(&email, false).await?,
        },
    }
    Ok(())
}
