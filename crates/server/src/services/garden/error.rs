//! Garden service error types.

use thiserror::Error;

use boostme_core::garden::GardenError;

use crate::db::RepositoryError;

/// Errors that can occur during garden operations.
#[derive(Debug, Error)]
pub enum GardenServiceError {
    /// A progression rule rejected the action.
    #[error(transparent)]
    Rule(#[from] GardenError),

    /// The plant, challenge, lesson, or plant type does not exist for this user.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
