//! Enumerations shared by the plant catalog and the activity feed.
//!
//! All enums are stored as `snake_case` text in the database and on the wire,
//! so each one implements `Display` and `FromStr` with the same spelling.

use serde::{Deserialize, Serialize};

/// Wellness area a plant type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantCategory {
    Fitness,
    Nutrition,
    Mental,
    Learning,
}

impl PlantCategory {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [Self::Fitness, Self::Nutrition, Self::Mental, Self::Learning];

    /// Wire/database spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fitness => "fitness",
            Self::Nutrition => "nutrition",
            Self::Mental => "mental",
            Self::Learning => "learning",
        }
    }
}

impl std::fmt::Display for PlantCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlantCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("invalid plant category: {s}"))
    }
}

/// Rarity tier of a plant type. Determines the planting cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// All rarities from cheapest to most expensive.
    pub const ALL: [Self; 4] = [Self::Common, Self::Rare, Self::Epic, Self::Legendary];

    /// Star Seeds required to plant a plant of this rarity.
    #[must_use]
    pub const fn planting_cost(self) -> i32 {
        match self {
            Self::Common => 50,
            Self::Rare => 100,
            Self::Epic => 200,
            Self::Legendary => 500,
        }
    }

    /// Wire/database spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Rarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("invalid rarity: {s}"))
    }
}

/// What happened in a garden activity feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Planted,
    Watered,
    GardenWatered,
    Harvested,
    LessonCompleted,
    CourseCompleted,
    ChallengeCompleted,
    AchievementUnlocked,
    LevelUp,
    ThemeUnlocked,
    Granted,
}

impl ActivityKind {
    const ALL: [Self; 11] = [
        Self::Planted,
        Self::Watered,
        Self::GardenWatered,
        Self::Harvested,
        Self::LessonCompleted,
        Self::CourseCompleted,
        Self::ChallengeCompleted,
        Self::AchievementUnlocked,
        Self::LevelUp,
        Self::ThemeUnlocked,
        Self::Granted,
    ];

    /// Wire/database spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planted => "planted",
            Self::Watered => "watered",
            Self::GardenWatered => "garden_watered",
            Self::Harvested => "harvested",
            Self::LessonCompleted => "lesson_completed",
            Self::CourseCompleted => "course_completed",
            Self::ChallengeCompleted => "challenge_completed",
            Self::AchievementUnlocked => "achievement_unlocked",
            Self::LevelUp => "level_up",
            Self::ThemeUnlocked => "theme_unlocked",
            Self::Granted => "granted",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("invalid activity kind: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_planting_cost_by_rarity() {
        assert_eq!(Rarity::Common.planting_cost(), 50);
        assert_eq!(Rarity::Rare.planting_cost(), 100);
        assert_eq!(Rarity::Epic.planting_cost(), 200);
        assert_eq!(Rarity::Legendary.planting_cost(), 500);
    }

    #[test]
    fn test_display_matches_serde() {
        for rarity in Rarity::ALL {
            let json = serde_json::to_string(&rarity).unwrap();
            assert_eq!(json, format!("\"{rarity}\""));
        }
        for category in PlantCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{category}\""));
        }
        for kind in ActivityKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("epic".parse::<Rarity>().unwrap(), Rarity::Epic);
        assert_eq!(
            "mental".parse::<PlantCategory>().unwrap(),
            PlantCategory::Mental
        );
        assert_eq!(
            "garden_watered".parse::<ActivityKind>().unwrap(),
            ActivityKind::GardenWatered
        );
        assert!("mythic".parse::<Rarity>().is_err());
    }
}
