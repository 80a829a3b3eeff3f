//! User domain types.

use chrono::{DateTime, Utc};

use boostme_core::api::UserResponse;
use boostme_core::{Email, UserId};

use super::CurrentUser;

/// A BoostMe account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    /// Display name, 1-100 characters.
    pub name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn current_user(&self) -> CurrentUser {
        CurrentUser {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into_inner(),
            created_at: user.created_at,
        }
    }
}
