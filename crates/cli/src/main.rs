//! BoostMe CLI - Database migrations, catalog seeding, and user management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! boostme migrate
//!
//! # Load the plant, achievement, challenge, and course catalog
//! boostme seed catalog seeds/catalog.yaml
//!
//! # Same, deleting catalog rows that are no longer in the file
//! boostme seed catalog seeds/catalog.yaml --replace
//!
//! # Create a user (and their garden)
//! boostme user create -e mali@example.com -n "มะลิ" -p "correct horse"
//!
//! # Grant XP and Star Seeds
//! boostme garden grant -e mali@example.com --xp 250 --seeds 100
//! ```
//!
//! # Environment Variables
//!
//! - `BOOSTME_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "boostme")]
#[command(author, version, about = "BoostMe operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load catalog data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Adjust gardens
    Garden {
        #[command(subcommand)]
        action: GardenAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert plant types, achievements, challenge templates, and courses
    Catalog {
        /// Catalog YAML file
        file: PathBuf,

        /// Delete catalog rows missing from the file
        #[arg(long)]
        replace: bool,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user with a password and a fresh garden
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum GardenAction {
    /// Grant XP and Star Seeds, settling level ups
    Grant {
        /// Email of the garden owner
        #[arg(short, long)]
        email: String,

        /// XP to add
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i32).range(0..))]
        xp: i32,

        /// Star Seeds to add
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i32).range(0..))]
        seeds: i32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), commands::CliError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { file, replace } => {
                commands::seed::catalog(&file, replace).await?;
            }
        },
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                password,
            } => {
                commands::user::create(&email, &name, &password).await?;
            }
        },
        Commands::Garden { action } => match action {
            GardenAction::Grant { email, xp, seeds } => {
                commands::garden::grant(&email, xp, seeds).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_seed_catalog() {
        let cli =
            Cli::try_parse_from(["boostme", "seed", "catalog", "catalog.yaml", "--replace"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Seed {
                target: SeedTarget::Catalog { replace: true, .. }
            }
        ));
    }

    #[test]
    fn test_parse_grant() {
        let cli = Cli::try_parse_from([
            "boostme", "garden", "grant", "-e", "mali@example.com", "--xp", "250",
        ])
        .unwrap();
        let Commands::Garden {
            action: GardenAction::Grant { email, xp, seeds },
        } = cli.command
        else {
            panic!("expected garden grant");
        };
        assert_eq!(email, "mali@example.com");
        assert_eq!(xp, 250);
        assert_eq!(seeds, 0);
    }

    #[test]
    fn test_grant_rejects_negative() {
        assert!(
            Cli::try_parse_from(["boostme", "garden", "grant", "-e", "a@b.co", "--seeds", "-5"])
                .is_err()
        );
    }
}
