//! Achievements unlocked by lifetime garden statistics.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GardenError;
use super::model::Reward;
use crate::types::AchievementId;

/// Condition an achievement checks against [`GardenStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AchievementCriteria {
    PlantsPlanted { count: i64 },
    PlantsHarvested { count: i64 },
    Waterings { count: i64 },
    LessonsCompleted { count: i64 },
    CoursesCompleted { count: i64 },
    GardenLevel { count: i64 },
    ChallengesCompleted { count: i64 },
}

impl AchievementCriteria {
    #[must_use]
    pub const fn threshold(self) -> i64 {
        match self {
            Self::PlantsPlanted { count }
            | Self::PlantsHarvested { count }
            | Self::Waterings { count }
            | Self::LessonsCompleted { count }
            | Self::CoursesCompleted { count }
            | Self::GardenLevel { count }
            | Self::ChallengesCompleted { count } => count,
        }
    }

    #[must_use]
    pub const fn is_met(self, stats: &GardenStats) -> bool {
        let value = match self {
            Self::PlantsPlanted { .. } => stats.plants_planted,
            Self::PlantsHarvested { .. } => stats.plants_harvested,
            Self::Waterings { .. } => stats.waterings,
            Self::LessonsCompleted { .. } => stats.lessons_completed,
            Self::CoursesCompleted { .. } => stats.courses_completed,
            Self::GardenLevel { .. } => stats.garden_level,
            Self::ChallengesCompleted { .. } => stats.challenges_completed,
        };
        value >= self.threshold()
    }
}

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    pub criteria: AchievementCriteria,
    pub xp_reward: i32,
    pub star_seeds_reward: i32,
}

impl Achievement {
    #[must_use]
    pub const fn reward(&self) -> Reward {
        Reward::new(self.xp_reward, self.star_seeds_reward)
    }

    /// # Errors
    ///
    /// Returns `GardenError::InvalidCatalog` for a blank key or name, a
    /// non-positive threshold, or a negative reward.
    pub fn validate(&self) -> Result<(), GardenError> {
        if self.key.trim().is_empty() || self.name.trim().is_empty() {
            return Err(GardenError::InvalidCatalog(
                "achievement needs a key and a name".to_owned(),
            ));
        }
        if self.criteria.threshold() <= 0 {
            return Err(GardenError::InvalidCatalog(format!(
                "achievement {} threshold must be positive",
                self.key
            )));
        }
        if self.xp_reward < 0 || self.star_seeds_reward < 0 {
            return Err(GardenError::InvalidCatalog(format!(
                "achievement {} has a negative reward",
                self.key
            )));
        }
        Ok(())
    }
}

/// Achievement as listed to a user, with their unlock time if earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementView {
    #[serde(flatten)]
    pub achievement: Achievement,
    pub earned_at: Option<DateTime<Utc>>,
}

/// Lifetime counters for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenStats {
    pub plants_planted: i64,
    pub plants_harvested: i64,
    pub active_plants: i64,
    pub waterings: i64,
    pub lessons_completed: i64,
    pub courses_completed: i64,
    pub challenges_completed: i64,
    pub achievements_earned: i64,
    pub garden_level: i64,
}

/// Achievements whose criteria `stats` meets and that are not in `earned`.
#[must_use]
pub fn evaluate_achievements<'a>(
    catalog: &'a [Achievement],
    earned: &HashSet<AchievementId>,
    stats: &GardenStats,
) -> Vec<&'a Achievement> {
    catalog
        .iter()
        .filter(|a| !earned.contains(&a.id) && a.criteria.is_met(stats))
        .collect()
}
