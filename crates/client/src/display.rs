//! Display values derived from snapshot entities.
//!
//! Everything here is presentation only. None of it feeds back into a request.

use chrono::{DateTime, Utc};

use boostme_core::format::{
    category_emoji, format_time_ago, format_xp, progress_percent, rarity_label_th, stage_emoji,
};
use boostme_core::garden::plants::{MAX_HEALTH, MAX_PROGRESS};
use boostme_core::garden::{GardenActivity, GardenView, PlantType, PlantView};

/// How one plant card reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantDisplay {
    pub emoji: &'static str,
    pub name: String,
    pub category_emoji: &'static str,
    pub rarity: &'static str,
    /// Name of the current growth stage, if the catalog knows it.
    pub stage_name: Option<String>,
    pub growth_percent: i32,
    pub health_percent: i32,
    /// Relative time since the last watering. `None` if never watered.
    pub watered_ago: Option<String>,
}

impl PlantDisplay {
    /// `plant_type` is `None` when the snapshot catalog lacks the type; the
    /// card then falls back to generic values.
    #[must_use]
    pub fn new(plant: &PlantView, plant_type: Option<&PlantType>, now: DateTime<Utc>) -> Self {
        Self {
            emoji: stage_emoji(plant.stage),
            name: plant_type.map_or_else(|| format!("#{}", plant.plant_type_id), |t| t.name.clone()),
            category_emoji: plant_type.map_or("🌱", |t| category_emoji(t.category)),
            rarity: plant_type.map_or("", |t| rarity_label_th(t.rarity)),
            stage_name: plant_type
                .and_then(|t| t.stage(plant.stage))
                .map(|s| s.name.clone()),
            growth_percent: if plant.is_fully_grown {
                100
            } else {
                progress_percent(plant.growth_progress, MAX_PROGRESS)
            },
            health_percent: progress_percent(plant.health, MAX_HEALTH),
            watered_ago: plant.last_watered_at.map(|at| format_time_ago(at, now)),
        }
    }
}

/// Level bar and balance for the garden header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GardenDisplay {
    pub level: i32,
    pub xp_percent: i32,
    /// `"40 / 100"` style label.
    pub xp_label: String,
    pub star_seeds: String,
}

impl From<&GardenView> for GardenDisplay {
    fn from(garden: &GardenView) -> Self {
        Self {
            level: garden.level,
            xp_percent: progress_percent(garden.xp, garden.xp_for_next_level),
            xp_label: format!(
                "{} / {}",
                format_xp(i64::from(garden.xp)),
                format_xp(i64::from(garden.xp_for_next_level))
            ),
            star_seeds: format_xp(i64::from(garden.star_seeds)),
        }
    }
}

/// One line of the activity feed: description and relative time.
#[must_use]
pub fn activity_line(activity: &GardenActivity, now: DateTime<Utc>) -> (String, String) {
    (
        activity.description.clone(),
        format_time_ago(activity.created_at, now),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Duration, TimeZone};

    use boostme_core::garden::GrowthStage;
    use boostme_core::{PlantCategory, PlantId, PlantTypeId, Rarity};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn rose() -> PlantType {
        PlantType {
            id: PlantTypeId::new(4),
            name: "กุหลาบ".to_owned(),
            description: None,
            category: PlantCategory::Mental,
            rarity: Rarity::Rare,
            base_xp_reward: 80,
            star_seeds_reward: 20,
            unlock_level: 3,
            growth_stages: BTreeMap::from([
                (
                    0,
                    GrowthStage {
                        name: "เมล็ด".to_owned(),
                        duration_hours: 24,
                    },
                ),
                (
                    1,
                    GrowthStage {
                        name: "ต้นอ่อน".to_owned(),
                        duration_hours: 48,
                    },
                ),
            ]),
        }
    }

    fn seedling() -> PlantView {
        PlantView {
            id: PlantId::new(9),
            plant_type_id: PlantTypeId::new(4),
            stage: 1,
            health: 80,
            growth_progress: 40,
            needs_watering: false,
            is_fully_grown: false,
            can_harvest: false,
            position: None,
            times_watered: 3,
            planted_at: now() - Duration::days(2),
            last_watered_at: Some(now() - Duration::hours(3)),
            next_water_at: now() + Duration::hours(1),
        }
    }

    #[test]
    fn test_plant_display() {
        let d = PlantDisplay::new(&seedling(), Some(&rose()), now());
        assert_eq!(d.emoji, "🌿");
        assert_eq!(d.name, "กุหลาบ");
        assert_eq!(d.category_emoji, "🧘");
        assert_eq!(d.rarity, "หายาก");
        assert_eq!(d.stage_name.as_deref(), Some("ต้นอ่อน"));
        assert_eq!(d.growth_percent, 40);
        assert_eq!(d.health_percent, 80);
        assert_eq!(d.watered_ago.as_deref(), Some("3 ชั่วโมงที่แล้ว"));
    }

    #[test]
    fn test_plant_display_unknown_type() {
        let mut plant = seedling();
        plant.is_fully_grown = true;
        plant.last_watered_at = None;
        let d = PlantDisplay::new(&plant, None, now());
        assert_eq!(d.name, "#4");
        assert!(d.stage_name.is_none());
        assert_eq!(d.growth_percent, 100);
        assert!(d.watered_ago.is_none());
    }

    #[test]
    fn test_garden_display() {
        let garden = GardenView {
            level: 3,
            xp: 150,
            xp_for_next_level: 300,
            can_level_up: false,
            star_seeds: 1_500,
            theme: None,
            unlocked_themes: Vec::new(),
            needs_watering: false,
            last_watered_at: None,
        };
        let d = GardenDisplay::from(&garden);
        assert_eq!(d.xp_percent, 50);
        assert_eq!(d.xp_label, "150 / 300");
        assert_eq!(d.star_seeds, "1.5K");
    }
}
