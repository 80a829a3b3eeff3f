//! Fixtures shared by the garden rule tests.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::model::{GrowthStage, PlantType, UserPlant};
use crate::types::{PlantCategory, PlantId, PlantTypeId, Rarity, UserId};

/// Plant type 1 with one stage per entry in `durations`, named `stage N`.
pub fn plant_type(rarity: Rarity, durations: &[i32]) -> PlantType {
    let growth_stages: BTreeMap<i32, GrowthStage> = (0..)
        .zip(durations)
        .map(|(index, &duration_hours)| {
            (
                index,
                GrowthStage {
                    name: format!("stage {index}"),
                    duration_hours,
                },
            )
        })
        .collect();

    PlantType {
        id: PlantTypeId::new(1),
        name: "ต้นมะลิ".to_owned(),
        description: None,
        category: PlantCategory::Mental,
        rarity,
        base_xp_reward: 50,
        star_seeds_reward: 25,
        unlock_level: 1,
        growth_stages,
    }
}

/// Plant 1 of type 1, healthy and due for water at `planted_at`.
pub fn user_plant(stage: i32, growth_progress: i32, planted_at: DateTime<Utc>) -> UserPlant {
    UserPlant {
        id: PlantId::new(1),
        user_id: UserId::new(1),
        plant_type_id: PlantTypeId::new(1),
        stage,
        health: 100,
        growth_progress,
        is_fully_grown: false,
        position: None,
        times_watered: 0,
        planted_at,
        last_watered_at: None,
        next_water_at: planted_at,
    }
}
