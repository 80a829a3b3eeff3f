//! Garden entities.
//!
//! Stored fields live on [`UserGarden`] and [`UserPlant`]. Values that depend
//! on the clock (`needs_watering`, decayed health) or on other fields
//! (`xp_for_next_level`, `can_harvest`) are derived on demand and exposed to
//! clients through [`GardenView`] and [`PlantView`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GardenError;
use super::leveling::xp_for_next_level;
use super::plants::{GARDEN_WATER_INTERVAL_HOURS, HEALTH_DECAY_PER_HOUR, MAX_HEALTH};
use crate::types::{PlantCategory, PlantId, PlantTypeId, Rarity, UserId};

/// XP and Star Seeds handed out together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub xp: i32,
    pub star_seeds: i32,
}

impl Reward {
    /// A reward of nothing.
    pub const NONE: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(xp: i32, star_seeds: i32) -> Self {
        Self { xp, star_seeds }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.xp == 0 && self.star_seeds == 0
    }
}

impl std::ops::Add for Reward {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            xp: self.xp.saturating_add(rhs.xp),
            star_seeds: self.star_seeds.saturating_add(rhs.star_seeds),
        }
    }
}

impl std::ops::AddAssign for Reward {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Garden level changed as a result of a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub from: i32,
    pub to: i32,
}

/// A user's garden: level, XP progress, and currency.
///
/// `xp` is progress inside the current level, not a lifetime total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGarden {
    pub user_id: UserId,
    pub level: i32,
    pub xp: i32,
    pub star_seeds: i32,
    pub theme: Option<String>,
    pub unlocked_themes: Vec<String>,
    pub last_watered_at: Option<DateTime<Utc>>,
}

impl UserGarden {
    /// A fresh level-1 garden.
    #[must_use]
    pub const fn new(user_id: UserId, starting_star_seeds: i32) -> Self {
        Self {
            user_id,
            level: 1,
            xp: 0,
            star_seeds: starting_star_seeds,
            theme: None,
            unlocked_themes: Vec::new(),
            last_watered_at: None,
        }
    }

    #[must_use]
    pub const fn xp_for_next_level(&self) -> i32 {
        xp_for_next_level(self.level)
    }

    #[must_use]
    pub const fn can_level_up(&self) -> bool {
        self.xp >= self.xp_for_next_level()
    }

    /// The garden-wide watering is due once a day.
    #[must_use]
    pub fn needs_watering(&self, now: DateTime<Utc>) -> bool {
        self.next_garden_water_at().is_none_or(|due| now >= due)
    }

    /// When the garden-wide watering becomes available again.
    #[must_use]
    pub fn next_garden_water_at(&self) -> Option<DateTime<Utc>> {
        self.last_watered_at
            .map(|at| at + chrono::Duration::hours(GARDEN_WATER_INTERVAL_HOURS))
    }

    /// Debit Star Seeds.
    ///
    /// # Errors
    ///
    /// Returns `GardenError::InsufficientStarSeeds` if the balance is too low.
    /// The balance is left untouched on error.
    pub const fn spend(&mut self, cost: i32) -> Result<(), GardenError> {
        if self.star_seeds < cost {
            return Err(GardenError::InsufficientStarSeeds {
                required: cost,
                available: self.star_seeds,
            });
        }
        self.star_seeds -= cost;
        Ok(())
    }

    /// Client-facing projection with derived fields.
    #[must_use]
    pub fn view(&self, now: DateTime<Utc>) -> GardenView {
        GardenView {
            level: self.level,
            xp: self.xp,
            xp_for_next_level: self.xp_for_next_level(),
            can_level_up: self.can_level_up(),
            star_seeds: self.star_seeds,
            theme: self.theme.clone(),
            unlocked_themes: self.unlocked_themes.clone(),
            needs_watering: self.needs_watering(now),
            last_watered_at: self.last_watered_at,
        }
    }
}

/// Garden as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenView {
    pub level: i32,
    pub xp: i32,
    pub xp_for_next_level: i32,
    pub can_level_up: bool,
    pub star_seeds: i32,
    pub theme: Option<String>,
    #[serde(default)]
    pub unlocked_themes: Vec<String>,
    pub needs_watering: bool,
    pub last_watered_at: Option<DateTime<Utc>>,
}

/// One lifecycle phase of a plant type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthStage {
    pub name: String,
    pub duration_hours: i32,
}

/// Catalog entry describing a kind of plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantType {
    pub id: PlantTypeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: PlantCategory,
    pub rarity: Rarity,
    pub base_xp_reward: i32,
    pub star_seeds_reward: i32,
    pub unlock_level: i32,
    /// Stage index to stage definition. Indexes are dense and start at 0.
    pub growth_stages: BTreeMap<i32, GrowthStage>,
}

impl PlantType {
    /// Index of the final growth stage.
    #[must_use]
    pub fn max_stage(&self) -> i32 {
        self.growth_stages.keys().next_back().copied().unwrap_or(0)
    }

    #[must_use]
    pub fn stage(&self, index: i32) -> Option<&GrowthStage> {
        self.growth_stages.get(&index)
    }

    #[must_use]
    pub const fn planting_cost(&self) -> i32 {
        self.rarity.planting_cost()
    }

    /// Check the catalog invariants the growth rules rely on.
    ///
    /// # Errors
    ///
    /// Returns `GardenError::InvalidCatalog` if the name is blank, there are no
    /// growth stages, stage indexes are not `0..n`, a stage has a non-positive
    /// duration, or any reward or the unlock level is out of range.
    pub fn validate(&self) -> Result<(), GardenError> {
        let invalid = |msg: String| Err(GardenError::InvalidCatalog(msg));

        if self.name.trim().is_empty() {
            return invalid("plant type name is empty".to_owned());
        }
        if self.growth_stages.is_empty() {
            return invalid(format!("{} has no growth stages", self.name));
        }
        for (expected, (index, stage)) in (0..).zip(&self.growth_stages) {
            if *index != expected {
                return invalid(format!(
                    "{} growth stages must be numbered 0..n, found {index} where {expected} was expected",
                    self.name
                ));
            }
            if stage.duration_hours <= 0 {
                return invalid(format!(
                    "{} stage {index} has non-positive duration",
                    self.name
                ));
            }
        }
        if self.base_xp_reward < 0 || self.star_seeds_reward < 0 {
            return invalid(format!("{} has a negative reward", self.name));
        }
        if self.unlock_level < 1 {
            return invalid(format!("{} unlock level must be at least 1", self.name));
        }
        Ok(())
    }
}

/// Grid cell in the garden layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// A plant owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPlant {
    pub id: PlantId,
    pub user_id: UserId,
    pub plant_type_id: PlantTypeId,
    pub stage: i32,
    /// Health as of the last watering. See [`UserPlant::current_health`].
    pub health: i32,
    pub growth_progress: i32,
    pub is_fully_grown: bool,
    pub position: Option<Position>,
    pub times_watered: i32,
    pub planted_at: DateTime<Utc>,
    pub last_watered_at: Option<DateTime<Utc>>,
    pub next_water_at: DateTime<Utc>,
}

impl UserPlant {
    #[must_use]
    pub const fn can_harvest(&self) -> bool {
        self.is_fully_grown
    }

    #[must_use]
    pub fn needs_watering(&self, now: DateTime<Utc>) -> bool {
        !self.is_fully_grown && now >= self.next_water_at
    }

    /// Health after decay for every full hour past `next_water_at`.
    #[must_use]
    pub fn current_health(&self, now: DateTime<Utc>) -> i32 {
        if self.is_fully_grown || now <= self.next_water_at {
            return self.health;
        }
        let overdue_hours = i32::try_from((now - self.next_water_at).num_hours()).unwrap_or(i32::MAX);
        self.health
            .saturating_sub(overdue_hours.saturating_mul(HEALTH_DECAY_PER_HOUR))
            .clamp(0, MAX_HEALTH)
    }

    /// Client-facing projection with derived fields.
    #[must_use]
    pub fn view(&self, now: DateTime<Utc>) -> PlantView {
        PlantView {
            id: self.id,
            plant_type_id: self.plant_type_id,
            stage: self.stage,
            health: self.current_health(now),
            growth_progress: self.growth_progress,
            needs_watering: self.needs_watering(now),
            is_fully_grown: self.is_fully_grown,
            can_harvest: self.can_harvest(),
            position: self.position,
            times_watered: self.times_watered,
            planted_at: self.planted_at,
            last_watered_at: self.last_watered_at,
            next_water_at: self.next_water_at,
        }
    }
}

/// Plant as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantView {
    pub id: PlantId,
    pub plant_type_id: PlantTypeId,
    pub stage: i32,
    pub health: i32,
    pub growth_progress: i32,
    pub needs_watering: bool,
    pub is_fully_grown: bool,
    pub can_harvest: bool,
    pub position: Option<Position>,
    pub times_watered: i32,
    pub planted_at: DateTime<Utc>,
    pub last_watered_at: Option<DateTime<Utc>>,
    pub next_water_at: DateTime<Utc>,
}

/// A plant that passed the planting rules but has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlant {
    pub plant_type_id: PlantTypeId,
    pub stage: i32,
    pub health: i32,
    pub growth_progress: i32,
    pub position: Option<Position>,
    pub planted_at: DateTime<Utc>,
    pub next_water_at: DateTime<Utc>,
    /// Star Seeds debited from the garden.
    pub cost: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::garden::test_support::{plant_type, user_plant};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_garden_view() {
        let garden = UserGarden::new(UserId::new(1), 100);
        let view = garden.view(at(0));
        assert_eq!(view.level, 1);
        assert_eq!(view.xp_for_next_level, 100);
        assert!(!view.can_level_up);
        assert!(view.needs_watering);
    }

    #[test]
    fn test_spend_leaves_balance_on_error() {
        let mut garden = UserGarden::new(UserId::new(1), 99);
        assert_eq!(
            garden.spend(100),
            Err(GardenError::InsufficientStarSeeds {
                required: 100,
                available: 99
            })
        );
        assert_eq!(garden.star_seeds, 99);
        garden.spend(99).unwrap();
        assert_eq!(garden.star_seeds, 0);
    }

    #[test]
    fn test_garden_needs_watering_after_interval() {
        let mut garden = UserGarden::new(UserId::new(1), 0);
        garden.last_watered_at = Some(at(1));
        assert!(!garden.needs_watering(at(23)));
        assert!(garden.needs_watering(at(1) + chrono::Duration::hours(24)));
    }

    #[test]
    fn test_max_stage() {
        assert_eq!(plant_type(Rarity::Common, &[24, 48, 72]).max_stage(), 2);
    }

    #[test]
    fn test_validate_rejects_gaps_and_zero_durations() {
        let mut ty = plant_type(Rarity::Common, &[24, 48]);
        assert!(ty.validate().is_ok());

        let stage = ty.growth_stages.remove(&1).unwrap();
        ty.growth_stages.insert(2, stage);
        assert!(matches!(ty.validate(), Err(GardenError::InvalidCatalog(_))));

        let mut ty = plant_type(Rarity::Common, &[24, 0]);
        assert!(matches!(ty.validate(), Err(GardenError::InvalidCatalog(_))));

        ty.growth_stages.clear();
        assert!(matches!(ty.validate(), Err(GardenError::InvalidCatalog(_))));
    }

    #[test]
    fn test_health_decays_per_overdue_hour() {
        let mut plant = user_plant(0, 0, at(0));
        plant.next_water_at = at(2);
        assert_eq!(plant.current_health(at(2)), 100);
        assert_eq!(plant.current_health(at(5)), 85);
        assert_eq!(plant.current_health(at(2) + chrono::Duration::days(2)), 0);
    }

    #[test]
    fn test_plant_view_derives_flags() {
        let mut plant = user_plant(2, 100, at(0));
        plant.is_fully_grown = true;
        let view = plant.view(at(10));
        assert!(view.can_harvest);
        assert!(!view.needs_watering);
    }
}
