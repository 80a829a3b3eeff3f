//! Database operations for the BoostMe `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Accounts with argon2 password hashes
//! - `tower_sessions.session` - Tower-sessions storage
//! - `plant_types`, `achievements`, `challenge_templates` - Garden catalog
//! - `courses`, `lessons` - Learning catalog
//! - `user_gardens`, `user_plants` - Per-user garden state
//! - `user_achievements`, `daily_challenges` - Per-user progress
//! - `garden_activities` - Append-only activity feed
//! - `lesson_completions`, `course_completions` - Idempotency records
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p boostme-cli -- migrate
//! ```
//!
//! Queries are built at runtime with `sqlx::query_as` into `FromRow` row types,
//! so building the crate does not need a live database.

pub mod catalog;
pub mod courses;
pub mod garden;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use catalog::{CatalogRepository, SeedSummary};
pub use courses::CourseRepository;
pub use garden::{Counter, GardenRepository, GardenTx};
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique violation to `RepositoryError::Conflict`.
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
