//! Plant lifecycle: planting, watering, growth, and harvest.
//!
//! A plant is created at stage 0 and needs watering right away. Each watering
//! is allowed once per [`WATER_COOLDOWN_HOURS`] and adds growth proportional
//! to how much of the current stage's duration one cooldown covers. When
//! progress reaches 100 the plant moves to the next stage. On the final stage
//! it stays at 100 and becomes harvestable.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::GardenError;
use super::leveling::grant;
use super::model::{
    GrowthStage, LevelUp, NewPlant, PlantType, PlantView, Position, Reward, UserGarden, UserPlant,
};
use crate::types::{PlantId, PlantTypeId};

/// Minimum time between two waterings of the same plant.
pub const WATER_COOLDOWN_HOURS: i32 = 4;

/// Reward for watering a single plant.
pub const WATERING_REWARD: Reward = Reward::new(5, 2);

/// Minimum time between two garden-wide waterings.
pub const GARDEN_WATER_INTERVAL_HOURS: i64 = 24;

/// Bonus on top of the per-plant rewards for a garden-wide watering.
pub const GARDEN_WATERING_BONUS: Reward = Reward::new(10, 5);

pub const MAX_HEALTH: i32 = 100;
pub const MAX_PROGRESS: i32 = 100;

/// Health lost per full hour a plant goes without water past `next_water_at`.
pub const HEALTH_DECAY_PER_HOUR: i32 = 5;

/// A plant moved to a later growth stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChange {
    pub from: i32,
    pub to: i32,
    pub stage_name: String,
}

/// What one watering did to one plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantGrowth {
    pub plant_id: PlantId,
    pub progress_gained: i32,
    pub grew_up: Option<StageChange>,
    pub fully_grown: bool,
}

/// Result of watering a single plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WateringOutcome {
    pub growth: PlantGrowth,
    pub reward: Reward,
    pub level_up: Option<LevelUp>,
}

/// Result of a garden-wide watering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenWatering {
    pub plants: Vec<PlantGrowth>,
    pub reward: Reward,
    pub level_up: Option<LevelUp>,
}

/// Result of harvesting a plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestOutcome {
    pub reward: Reward,
    pub level_up: Option<LevelUp>,
}

/// Growth points one watering adds during `stage`.
///
/// `ceil(100 * cooldown / duration)`, clamped to `1..=100`: a 24 hour stage
/// takes six waterings, a stage shorter than the cooldown takes one.
#[must_use]
pub fn growth_per_watering(stage: &GrowthStage) -> i32 {
    let hours = stage.duration_hours.max(1);
    let scaled = MAX_PROGRESS.saturating_mul(WATER_COOLDOWN_HOURS);
    let gain = scaled.saturating_add(hours - 1) / hours;
    gain.clamp(1, MAX_PROGRESS)
}

/// Validate a planting and debit its cost.
///
/// Checks run in order: unlock level, balance, grid position. On error the
/// garden is unchanged.
///
/// # Errors
///
/// - `GardenError::LevelTooLow` if the plant type unlocks at a higher level
/// - `GardenError::InsufficientStarSeeds` if the balance is below the cost
/// - `GardenError::PositionTaken` if another plant occupies `position`
pub fn plant(
    garden: &mut UserGarden,
    plant_type: &PlantType,
    existing: &[UserPlant],
    position: Option<Position>,
    now: DateTime<Utc>,
) -> Result<NewPlant, GardenError> {
    if garden.level < plant_type.unlock_level {
        return Err(GardenError::LevelTooLow {
            required: plant_type.unlock_level,
            current: garden.level,
        });
    }

    let cost = plant_type.planting_cost();
    if garden.star_seeds < cost {
        return Err(GardenError::InsufficientStarSeeds {
            required: cost,
            available: garden.star_seeds,
        });
    }

    if let Some(pos) = position
        && existing.iter().any(|p| p.position == Some(pos))
    {
        return Err(GardenError::PositionTaken { x: pos.x, y: pos.y });
    }

    garden.spend(cost)?;

    Ok(NewPlant {
        plant_type_id: plant_type.id,
        stage: 0,
        health: MAX_HEALTH,
        growth_progress: 0,
        position,
        planted_at: now,
        next_water_at: now,
        cost,
    })
}

/// Water one plant and credit the watering reward.
///
/// # Errors
///
/// - `GardenError::PlantTypeMismatch` if `plant_type` is not the plant's type
/// - `GardenError::AlreadyFullyGrown` if the plant only awaits harvest
/// - `GardenError::WateringCooldown` if `now` is before `next_water_at`
pub fn water_plant(
    garden: &mut UserGarden,
    plant: &mut UserPlant,
    plant_type: &PlantType,
    now: DateTime<Utc>,
) -> Result<WateringOutcome, GardenError> {
    let growth = advance(plant, plant_type, now)?;
    let level_up = grant(garden, WATERING_REWARD);
    Ok(WateringOutcome {
        growth,
        reward: WATERING_REWARD,
        level_up,
    })
}

/// Water the whole garden once a day.
///
/// Every plant that is due and not fully grown gets watered and earns the
/// per-plant reward. Plants on cooldown, fully grown plants, and plants whose
/// type is missing from `catalog` are skipped. The garden bonus is paid even
/// when no plant was due.
///
/// # Errors
///
/// Returns `GardenError::WateringCooldown` if the garden was watered less than
/// [`GARDEN_WATER_INTERVAL_HOURS`] ago.
pub fn water_garden(
    garden: &mut UserGarden,
    plants: &mut [UserPlant],
    catalog: &HashMap<PlantTypeId, PlantType>,
    now: DateTime<Utc>,
) -> Result<GardenWatering, GardenError> {
    if let Some(next_water_at) = garden.next_garden_water_at()
        && now < next_water_at
    {
        return Err(GardenError::WateringCooldown { next_water_at });
    }

    let mut watered = Vec::new();
    let mut reward = GARDEN_WATERING_BONUS;
    for plant in plants.iter_mut().filter(|p| p.needs_watering(now)) {
        let Some(plant_type) = catalog.get(&plant.plant_type_id) else {
            continue;
        };
        if let Ok(growth) = advance(plant, plant_type, now) {
            reward += WATERING_REWARD;
            watered.push(growth);
        }
    }

    garden.last_watered_at = Some(now);
    let level_up = grant(garden, reward);

    Ok(GardenWatering {
        plants: watered,
        reward,
        level_up,
    })
}

/// Credit the harvest reward for a fully grown plant.
///
/// The caller must remove the plant afterwards. Harvesting is what makes the
/// reward one-shot.
///
/// # Errors
///
/// - `GardenError::PlantTypeMismatch` if `plant_type` is not the plant's type
/// - `GardenError::NotHarvestable` if the plant is not at its final stage
pub fn harvest(
    garden: &mut UserGarden,
    plant: &UserPlant,
    plant_type: &PlantType,
) -> Result<HarvestOutcome, GardenError> {
    if plant.plant_type_id != plant_type.id {
        return Err(GardenError::PlantTypeMismatch);
    }
    if !plant.can_harvest() {
        return Err(GardenError::NotHarvestable);
    }

    let reward = Reward::new(plant_type.base_xp_reward, plant_type.star_seeds_reward);
    let level_up = grant(garden, reward);
    Ok(HarvestOutcome { reward, level_up })
}

/// Current state of a plant with clock-derived fields filled in.
///
/// Stored health is not rewritten: decay is always recomputed from
/// `next_water_at`.
#[must_use]
pub fn refresh(plant: &UserPlant, now: DateTime<Utc>) -> PlantView {
    plant.view(now)
}

/// Apply one watering's growth to a plant without touching the garden.
fn advance(
    plant: &mut UserPlant,
    plant_type: &PlantType,
    now: DateTime<Utc>,
) -> Result<PlantGrowth, GardenError> {
    if plant.plant_type_id != plant_type.id {
        return Err(GardenError::PlantTypeMismatch);
    }
    if plant.is_fully_grown {
        return Err(GardenError::AlreadyFullyGrown);
    }
    if now < plant.next_water_at {
        return Err(GardenError::WateringCooldown {
            next_water_at: plant.next_water_at,
        });
    }

    let max_stage = plant_type.max_stage();
    plant.stage = plant.stage.clamp(0, max_stage);
    let gain = plant_type
        .stage(plant.stage)
        .map_or(MAX_PROGRESS, growth_per_watering);

    let before = plant.growth_progress.clamp(0, MAX_PROGRESS);
    plant.growth_progress = before.saturating_add(gain).min(MAX_PROGRESS);
    let progress_gained = plant.growth_progress - before;

    let mut grew_up = None;
    if plant.growth_progress >= MAX_PROGRESS {
        if plant.stage < max_stage {
            let from = plant.stage;
            plant.stage += 1;
            plant.growth_progress = 0;
            grew_up = Some(StageChange {
                from,
                to: plant.stage,
                stage_name: plant_type
                    .stage(plant.stage)
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
            });
        } else {
            plant.is_fully_grown = true;
        }
    }

    plant.health = MAX_HEALTH;
    plant.times_watered = plant.times_watered.saturating_add(1);
    plant.last_watered_at = Some(now);
    plant.next_water_at = now + Duration::hours(i64::from(WATER_COOLDOWN_HOURS));

    Ok(PlantGrowth {
        plant_id: plant.id,
        progress_gained,
        grew_up,
        fully_grown: plant.is_fully_grown,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::garden::test_support::{plant_type, user_plant};
    use crate::types::{Rarity, UserId};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    fn hours(n: i64) -> Duration {
        Duration::hours(n)
    }

    fn garden(seeds: i32) -> UserGarden {
        UserGarden::new(UserId::new(1), seeds)
    }

    #[test]
    fn test_growth_per_watering() {
        let stage = |h| GrowthStage {
            name: String::new(),
            duration_hours: h,
        };
        assert_eq!(growth_per_watering(&stage(24)), 17);
        assert_eq!(growth_per_watering(&stage(8)), 50);
        assert_eq!(growth_per_watering(&stage(2)), 100);
        assert_eq!(growth_per_watering(&stage(1000)), 1);
    }

    #[test]
    fn test_plant_rare_with_99_seeds_fails() {
        let mut g = garden(99);
        let ty = plant_type(Rarity::Rare, &[8]);
        let err = plant(&mut g, &ty, &[], None, t0()).unwrap_err();
        assert_eq!(
            err,
            GardenError::InsufficientStarSeeds {
                required: 100,
                available: 99
            }
        );
        assert_eq!(g.star_seeds, 99);
    }

    #[test]
    fn test_plant_rare_with_100_seeds_debits_exactly_100() {
        let mut g = garden(100);
        let ty = plant_type(Rarity::Rare, &[8]);
        let new_plant = plant(&mut g, &ty, &[], None, t0()).unwrap();
        assert_eq!(g.star_seeds, 0);
        assert_eq!(new_plant.cost, 100);
        assert_eq!(new_plant.stage, 0);
        assert_eq!(new_plant.growth_progress, 0);
        assert_eq!(new_plant.next_water_at, t0());
    }

    #[test]
    fn test_plant_requires_unlock_level() {
        let mut g = garden(1000);
        let mut ty = plant_type(Rarity::Common, &[8]);
        ty.unlock_level = 3;
        assert_eq!(
            plant(&mut g, &ty, &[], None, t0()),
            Err(GardenError::LevelTooLow {
                required: 3,
                current: 1
            })
        );
        assert_eq!(g.star_seeds, 1000);
    }

    #[test]
    fn test_plant_rejects_taken_position() {
        let mut g = garden(1000);
        let ty = plant_type(Rarity::Common, &[8]);
        let mut existing = user_plant(0, 0, t0());
        existing.position = Some(Position { x: 1, y: 2 });

        let err = plant(&mut g, &ty, &[existing], Some(Position { x: 1, y: 2 }), t0());
        assert_eq!(err, Err(GardenError::PositionTaken { x: 1, y: 2 }));

        let ok = plant(&mut g, &ty, &[], Some(Position { x: 1, y: 2 }), t0());
        assert!(ok.is_ok());
    }

    #[test]
    fn test_watering_before_cooldown_is_rejected() {
        let mut g = garden(0);
        let ty = plant_type(Rarity::Common, &[24, 24]);
        let mut p = user_plant(0, 0, t0());

        water_plant(&mut g, &mut p, &ty, t0()).unwrap();
        let err = water_plant(&mut g, &mut p, &ty, t0() + hours(3)).unwrap_err();
        assert_eq!(
            err,
            GardenError::WateringCooldown {
                next_water_at: t0() + hours(4)
            }
        );
        assert!(water_plant(&mut g, &mut p, &ty, t0() + hours(4)).is_ok());
    }

    #[test]
    fn test_watering_awards_fixed_reward() {
        let mut g = garden(0);
        let ty = plant_type(Rarity::Common, &[24]);
        let mut p = user_plant(0, 0, t0());

        let outcome = water_plant(&mut g, &mut p, &ty, t0()).unwrap();
        assert_eq!(outcome.reward, WATERING_REWARD);
        assert_eq!((g.xp, g.star_seeds), (5, 2));
        assert_eq!(p.times_watered, 1);
        assert_eq!(p.last_watered_at, Some(t0()));
    }

    #[test]
    fn test_progress_is_monotonic_and_capped_within_stage() {
        let mut g = garden(0);
        let ty = plant_type(Rarity::Common, &[24, 24]);
        let mut p = user_plant(0, 0, t0());

        let mut now = t0();
        let mut last = 0;
        loop {
            let outcome = water_plant(&mut g, &mut p, &ty, now).unwrap();
            if outcome.growth.grew_up.is_some() {
                break;
            }
            assert!(p.growth_progress > last);
            assert!(p.growth_progress <= 100);
            last = p.growth_progress;
            now += hours(4);
        }
        // 17 per watering: 6 waterings to finish a 24h stage
        assert_eq!(p.times_watered, 6);
        assert_eq!(p.stage, 1);
        assert_eq!(p.growth_progress, 0);
    }

    #[test]
    fn test_stage_advance_reports_grew_up() {
        let mut g = garden(0);
        let ty = plant_type(Rarity::Common, &[4, 4]);
        let mut p = user_plant(0, 0, t0());

        let outcome = water_plant(&mut g, &mut p, &ty, t0()).unwrap();
        assert_eq!(
            outcome.growth.grew_up,
            Some(StageChange {
                from: 0,
                to: 1,
                stage_name: "stage 1".to_owned()
            })
        );
        assert!(!outcome.growth.fully_grown);
    }

    #[test]
    fn test_final_stage_becomes_harvestable() {
        let mut g = garden(0);
        let ty = plant_type(Rarity::Common, &[4, 4]);
        let mut p = user_plant(1, 0, t0());

        let outcome = water_plant(&mut g, &mut p, &ty, t0()).unwrap();
        assert!(outcome.growth.fully_grown);
        assert!(outcome.growth.grew_up.is_none());
        assert_eq!(p.stage, 1);
        assert_eq!(p.growth_progress, 100);
        assert!(p.can_harvest());

        let err = water_plant(&mut g, &mut p, &ty, t0() + hours(10)).unwrap_err();
        assert_eq!(err, GardenError::AlreadyFullyGrown);
    }

    #[test]
    fn test_harvest_awards_once_from_plant_type() {
        let mut g = garden(0);
        let mut ty = plant_type(Rarity::Common, &[4]);
        ty.base_xp_reward = 40;
        ty.star_seeds_reward = 30;
        let mut p = user_plant(0, 100, t0());
        p.is_fully_grown = true;

        let outcome = harvest(&mut g, &p, &ty).unwrap();
        assert_eq!(outcome.reward, Reward::new(40, 30));
        assert_eq!((g.xp, g.star_seeds), (40, 30));
    }

    #[test]
    fn test_harvest_rejects_growing_plant() {
        let mut g = garden(0);
        let ty = plant_type(Rarity::Common, &[4, 4]);
        let p = user_plant(0, 50, t0());
        assert_eq!(harvest(&mut g, &p, &ty), Err(GardenError::NotHarvestable));
        assert_eq!((g.xp, g.star_seeds), (0, 0));
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let mut g = garden(0);
        let mut ty = plant_type(Rarity::Common, &[4]);
        ty.id = PlantTypeId::new(99);
        let mut p = user_plant(0, 0, t0());
        assert_eq!(
            water_plant(&mut g, &mut p, &ty, t0()),
            Err(GardenError::PlantTypeMismatch)
        );
    }

    #[test]
    fn test_water_garden_waters_due_plants_only() {
        let mut g = garden(0);
        let ty = plant_type(Rarity::Common, &[24, 24]);
        let catalog = HashMap::from([(ty.id, ty.clone())]);

        let due = user_plant(0, 0, t0());
        let mut on_cooldown = user_plant(0, 0, t0());
        on_cooldown.id = PlantId::new(2);
        on_cooldown.next_water_at = t0() + hours(2);
        let mut grown = user_plant(1, 100, t0());
        grown.id = PlantId::new(3);
        grown.is_fully_grown = true;

        let mut plants = vec![due, on_cooldown, grown];
        let outcome = water_garden(&mut g, &mut plants, &catalog, t0()).unwrap();

        assert_eq!(outcome.plants.len(), 1);
        assert_eq!(outcome.plants.first().unwrap().plant_id, PlantId::new(1));
        assert_eq!(outcome.reward, GARDEN_WATERING_BONUS + WATERING_REWARD);
        assert_eq!(g.last_watered_at, Some(t0()));
        assert_eq!((g.xp, g.star_seeds), (15, 7));
    }

    #[test]
    fn test_refresh_derives_decay_without_mutating() {
        let p = user_plant(0, 40, t0());
        let view = refresh(&p, t0() + hours(3));
        assert_eq!(view.health, 85);
        assert!(view.needs_watering);
        assert_eq!(p.health, 100);
    }

    #[test]
    fn test_watering_restores_health() {
        let mut g = garden(0);
        let ty = plant_type(Rarity::Common, &[24, 24]);
        let mut p = user_plant(0, 0, t0());
        assert_eq!(p.current_health(t0() + hours(10)), 50);
        water_plant(&mut g, &mut p, &ty, t0() + hours(10)).unwrap();
        assert_eq!(p.current_health(t0() + hours(10)), 100);
    }

    #[test]
    fn test_water_garden_once_per_interval() {
        let mut g = garden(0);
        let catalog = HashMap::new();
        water_garden(&mut g, &mut [], &catalog, t0()).unwrap();

        let err = water_garden(&mut g, &mut [], &catalog, t0() + hours(23)).unwrap_err();
        assert_eq!(
            err,
            GardenError::WateringCooldown {
                next_water_at: t0() + hours(24)
            }
        );
        assert!(water_garden(&mut g, &mut [], &catalog, t0() + hours(24)).is_ok());
    }
}
