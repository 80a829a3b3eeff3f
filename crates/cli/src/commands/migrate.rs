//! Database migration command.
//!
//! ```bash
//! boostme migrate
//! ```
//!
//! Migrations live in `crates/server/migrations/` and are embedded at build
//! time. The first one also creates the `tower_sessions` schema.

use super::{CliError, connect};

/// Run every pending migration.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
