//! Login sessions for garden players.
//!
//! Only the signed-in user's id and display name live in the session
//! (see [`crate::models::session`]). Garden state is always read from the
//! database, so a stale session can never carry stale XP or Star Seeds.
//! Rows are kept in `tower_sessions.session`, created by the users migration.

use sqlx::PgPool;
use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ServerConfig;

/// Cookie name shared by the web app and the Rust client.
pub const SESSION_COOKIE_NAME: &str = "boostme_session";

/// A player who does not open the garden for a week has to log in again.
const IDLE_LOGOUT_AFTER: Duration = Duration::days(7);

/// Session layer for the garden API.
///
/// The cookie is HTTP-only and `SameSite=Lax`; it is marked `Secure` when
/// `BOOSTME_BASE_URL` is https.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &ServerConfig,
) -> SessionManagerLayer<PostgresStore> {
    SessionManagerLayer::new(PostgresStore::new(pool.clone()))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(IDLE_LOGOUT_AFTER))
        .with_secure(config.is_https())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_logout_is_one_week() {
        assert_eq!(IDLE_LOGOUT_AFTER.whole_seconds(), 7 * 24 * 60 * 60);
    }
}
