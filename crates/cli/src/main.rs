//! Sellerdesk CLI - Database migrations and account bootstrap.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sellerdesk migrate
//!
//! # Create an owner account together with its store
//! sellerdesk owner create -u alice -s "Alice's Store" -e alice@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `owner create` - Create an owner account and its store

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sellerdesk")]
#[command(author, version, about = "Sellerdesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage owner accounts
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },
}

#[derive(Subcommand)]
enum OwnerAction {
    /// Create a new owner account together with its store
    Create {
        /// Owner username
        #[arg(short, long)]
        username: String,

        /// Store display name
        #[arg(short, long)]
        store: String,

        /// Owner email address
        #[arg(short, long)]
        email: Option<String>,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,

        /// Telegram account ID
        #[arg(long)]
        telegram_id: Option<i64>,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Owner { action } => match action {
            OwnerAction::Create {
                username,
                store,
                email,
                phone,
                telegram_id,
            } => {
                commands::owner::create(
                    &username,
                    &store,
                    email.as_deref(),
                    phone.as_deref(),
                    telegram_id,
                )
                .await?;
            }
        },
    }
    Ok(())
}
