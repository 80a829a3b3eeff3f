//! Client error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`GardenClient`](crate::GardenClient) and
/// [`GardenSession`](crate::GardenSession).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or an unreadable response body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status. `message` is the server's
    /// `error` field, shown to the user as is.
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    /// Another garden mutation is still in flight.
    #[error("another garden action is in progress")]
    Busy,

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// The HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The session cookie is missing or expired.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
