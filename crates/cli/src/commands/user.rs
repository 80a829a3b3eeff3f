//! User management.
//!
//! ```bash
//! boostme user create -e mali@example.com -n "มะลิ" -p "correct horse"
//! ```

use boostme_server::services::auth::AuthService;

use super::{CliError, connect};

/// Create a user with a password. Their garden is created with them.
pub async fn create(email: &str, name: &str, password: &str) -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Creating user: {}", email);
    let user = AuthService::new(&pool)
        .register(name, email, password)
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );
    Ok(())
}
