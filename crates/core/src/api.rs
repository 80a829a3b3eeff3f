//! Request and response bodies of the BoostMe HTTP API.
//!
//! Shared by the server (which serializes them) and the client (which
//! deserializes them), so both sides agree on the wire shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::garden::{
    Achievement, ChallengeUpdate, DailyChallenge, GardenView, LevelUp, PlantGrowth, PlantType,
    PlantView, Position, Reward, StageChange, ThemeChange, ThemeView,
};
use crate::types::{CourseId, LessonId, PlantCategory, PlantId, UserId};

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
}

// =============================================================================
// Garden
// =============================================================================

/// Garden with every plant and the plant catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyGardenResponse {
    pub garden: GardenView,
    pub plants: Vec<PlantView>,
    pub plant_types: Vec<PlantType>,
}

/// Authoritative garden state after a mutation.
///
/// Flattened into every mutation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenUpdate {
    pub garden: GardenView,
    pub level_up: Option<LevelUp>,
    #[serde(default)]
    pub new_achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlantRequest {
    #[serde(default)]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantResponse {
    pub plant: PlantView,
    pub cost: i32,
    #[serde(flatten)]
    pub update: GardenUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterPlantResponse {
    pub plant: PlantView,
    pub reward: Reward,
    pub progress_gained: i32,
    pub grew_up: Option<StageChange>,
    pub fully_grown: bool,
    #[serde(flatten)]
    pub update: GardenUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterGardenResponse {
    /// Every plant after watering, not only the watered ones.
    pub plants: Vec<PlantView>,
    pub watered: Vec<PlantGrowth>,
    pub reward: Reward,
    #[serde(flatten)]
    pub update: GardenUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestResponse {
    pub harvested_plant_id: PlantId,
    pub reward: Reward,
    #[serde(flatten)]
    pub update: GardenUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeProgressRequest {
    pub increment: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeProgressResponse {
    pub challenge: DailyChallenge,
    pub result: ChallengeUpdate,
    #[serde(flatten)]
    pub update: GardenUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetThemeRequest {
    pub theme: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetThemeResponse {
    pub result: ThemeChange,
    pub themes: Vec<ThemeView>,
    #[serde(flatten)]
    pub update: GardenUpdate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivitiesQuery {
    pub limit: Option<i64>,
}

// =============================================================================
// Courses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<PlantCategory>,
    pub lesson_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub course_id: CourseId,
    pub title: String,
    pub position: i32,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonCompleteResponse {
    pub lesson_id: LessonId,
    /// The lesson was completed before. Nothing was awarded.
    pub already_completed: bool,
    pub reward: Reward,
    pub course_completed: bool,
    #[serde(flatten)]
    pub update: GardenUpdate,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_garden_update_is_flattened() {
        let response = HarvestResponse {
            harvested_plant_id: PlantId::new(7),
            reward: Reward::new(40, 30),
            update: GardenUpdate {
                garden: GardenView {
                    level: 2,
                    xp: 10,
                    xp_for_next_level: 200,
                    can_level_up: false,
                    star_seeds: 80,
                    theme: None,
                    unlocked_themes: Vec::new(),
                    needs_watering: true,
                    last_watered_at: None,
                },
                level_up: Some(LevelUp { from: 1, to: 2 }),
                new_achievements: Vec::new(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["garden"]["level"], 2);
        assert_eq!(json["level_up"]["to"], 2);
        assert_eq!(json["harvested_plant_id"], 7);

        let back: HarvestResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn test_plant_request_position_optional() {
        let req: PlantRequest = serde_json::from_str("{}").unwrap();
        assert!(req.position.is_none());
        let req: PlantRequest = serde_json::from_str(r#"{"position":{"x":1,"y":2}}"#).unwrap();
        assert_eq!(req.position, Some(Position { x: 1, y: 2 }));
    }
}
