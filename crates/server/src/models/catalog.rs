//! Catalog seed files.
//!
//! The catalog (plant types, achievements, challenge templates, courses) is
//! read-only to users and loaded by operators with `boostme seed catalog`.
//! Seeds carry natural keys instead of database IDs so re-seeding updates
//! rows in place.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use boostme_core::garden::{
    Achievement, AchievementCriteria, ChallengeTemplate, GardenError, GrowthStage, PlantType,
};
use boostme_core::{AchievementId, PlantCategory, PlantTypeId, Rarity};

/// A whole catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub plant_types: Vec<PlantTypeSeed>,
    #[serde(default)]
    pub achievements: Vec<AchievementSeed>,
    #[serde(default)]
    pub challenge_templates: Vec<ChallengeTemplate>,
    #[serde(default)]
    pub courses: Vec<CourseSeed>,
}

/// Plant type keyed by its unique name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantTypeSeed {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: PlantCategory,
    pub rarity: Rarity,
    pub base_xp_reward: i32,
    pub star_seeds_reward: i32,
    #[serde(default = "default_unlock_level")]
    pub unlock_level: i32,
    pub growth_stages: BTreeMap<i32, GrowthStage>,
}

const fn default_unlock_level() -> i32 {
    1
}

impl PlantTypeSeed {
    /// The catalog entry this seed describes, with the given ID.
    #[must_use]
    pub fn to_plant_type(&self, id: PlantTypeId) -> PlantType {
        PlantType {
            id,
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            rarity: self.rarity,
            base_xp_reward: self.base_xp_reward,
            star_seeds_reward: self.star_seeds_reward,
            unlock_level: self.unlock_level,
            growth_stages: self.growth_stages.clone(),
        }
    }
}

/// Achievement keyed by `key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementSeed {
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

impl AchievementSeed {
    #[must_use]
    pub fn to_achievement(&self, id: AchievementId) -> Achievement {
        Achievement {
            id,
            key: self.key.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            criteria: self.criteria,
            xp_reward: self.xp_reward,
            star_seeds_reward: self.star_seeds_reward,
        }
    }
}

/// Course keyed by its unique title. Lesson positions follow list order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSeed {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<PlantCategory>,
    pub lessons: Vec<LessonSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonSeed {
    pub title: String,
    pub duration_minutes: i32,
}

impl CatalogFile {
    /// Check every entry before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `GardenError::InvalidCatalog` describing the first invalid or
    /// duplicated entry.
    pub fn validate(&self) -> Result<(), GardenError> {
        let mut names = HashSet::new();
        for seed in &self.plant_types {
            seed.to_plant_type(PlantTypeId::new(0)).validate()?;
            if !names.insert(seed.name.as_str()) {
                return Err(duplicate("plant type", &seed.name));
            }
        }

        let mut keys = HashSet::new();
        for seed in &self.achievements {
            seed.to_achievement(AchievementId::new(0)).validate()?;
            if !keys.insert(seed.key.as_str()) {
                return Err(duplicate("achievement", &seed.key));
            }
        }

        let mut keys = HashSet::new();
        for template in &self.challenge_templates {
            template.validate()?;
            if !keys.insert(template.key.as_str()) {
                return Err(duplicate("challenge template", &template.key));
            }
        }

        let mut titles = HashSet::new();
        for course in &self.courses {
            if course.title.trim().is_empty() {
                return Err(GardenError::InvalidCatalog(
                    "course title is empty".to_owned(),
                ));
            }
            if course.lessons.is_empty() {
                return Err(GardenError::InvalidCatalog(format!(
                    "course {} has no lessons",
                    course.title
                )));
            }
            if let Some(lesson) = course
                .lessons
                .iter()
                .find(|l| l.title.trim().is_empty() || l.duration_minutes < 0)
            {
                return Err(GardenError::InvalidCatalog(format!(
                    "course {} has an invalid lesson {:?}",
                    course.title, lesson.title
                )));
            }
            if !titles.insert(course.title.as_str()) {
                return Err(duplicate("course", &course.title));
            }
        }

        Ok(())
    }
}

fn duplicate(what: &str, key: &str) -> GardenError {
    GardenError::InvalidCatalog(format!("duplicate {what}: {key}"))
}
