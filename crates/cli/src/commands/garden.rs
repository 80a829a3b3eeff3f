//! Garden adjustments.
//!
//! ```bash
//! boostme garden grant -e mali@example.com --xp 250 --seeds 100
//! ```

use boostme_core::garden::Reward;
use boostme_server::services::auth::AuthService;
use boostme_server::services::catalog::CatalogCache;
use boostme_server::services::garden::GardenService;

use super::{CliError, connect};

/// Grant XP and Star Seeds to one user's garden.
///
/// Goes through the same grant rule as in-app rewards, so level ups settle
/// and achievements are checked.
pub async fn grant(email: &str, xp: i32, seeds: i32) -> Result<(), CliError> {
    let pool = connect().await?;

    let user = AuthService::new(&pool).get_user_by_email(email).await?;
    let catalog = CatalogCache::new();
    let update = GardenService::new(&pool, &catalog)
        .grant(user.id, Reward::new(xp, seeds))
        .await?;

    tracing::info!("Granted {} XP and {} Star Seeds to {}", xp, seeds, email);
    tracing::info!(
        "  Garden: level {}, {}/{} XP, {} Star Seeds",
        update.garden.level,
        update.garden.xp,
        update.garden.xp_for_next_level,
        update.garden.star_seeds
    );
    if let Some(level_up) = update.level_up {
        tracing::info!("  Level up: {} -> {}", level_up.from, level_up.to);
    }
    for achievement in &update.new_achievements {
        tracing::info!("  Achievement unlocked: {}", achievement.name);
    }
    Ok(())
}
