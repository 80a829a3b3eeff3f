//! Wellness Garden progression rules.
//!
//! Everything in this module is a pure function over entities the caller
//! loaded. The current time is always passed in as `now`, so rules are
//! deterministic and the server can apply them inside a single database
//! transaction.
//!
//! # Rewards and leveling
//!
//! Every reward goes through [`grant`], which credits XP and Star Seeds and
//! settles level-ups immediately with XP carried over. Callers get an
//! optional [`LevelUp`] back to report to the user.
//!
//! # Example
//!
//! ```
//! use boostme_core::UserId;
//! use boostme_core::garden::{UserGarden, Reward, grant};
//!
//! let mut garden = UserGarden::new(UserId::new(1), 100);
//! let level_up = grant(&mut garden, Reward::new(120, 10));
//!
//! assert_eq!(garden.level, 2);
//! assert_eq!(garden.xp, 20);
//! assert_eq!(garden.star_seeds, 110);
//! assert!(level_up.is_some());
//! ```

pub mod achievements;
pub mod activity;
pub mod challenges;
mod error;
pub mod leveling;
pub mod model;
pub mod plants;
pub mod rewards;
pub mod themes;

#[cfg(test)]
pub(crate) mod test_support;

pub use achievements::{
    Achievement, AchievementCriteria, AchievementView, GardenStats, evaluate_achievements,
};
pub use activity::{ActivityDraft, GardenActivity};
pub use challenges::{
    ChallengeTemplate, ChallengeUpdate, DailyChallenge, apply_challenge_progress,
    daily_challenge_templates_for,
};
pub use error::GardenError;
pub use leveling::{grant, settle_levels, xp_for_next_level};
pub use model::{
    GardenView, GrowthStage, LevelUp, NewPlant, PlantType, PlantView, Position, Reward,
    UserGarden, UserPlant,
};
pub use plants::{
    GardenWatering, HarvestOutcome, PlantGrowth, StageChange, WateringOutcome,
    growth_per_watering, harvest, plant, refresh, water_garden, water_plant,
};
pub use rewards::{
    COURSE_COMPLETION_BONUS, STARTING_STAR_SEEDS, course_completion_bonus, lesson_reward,
};
pub use themes::{THEMES, Theme, ThemeChange, ThemeView, theme_views, unlock_theme};
