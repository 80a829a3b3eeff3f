//! Garden service.
//!
//! Applies the pure rules from `boostme_core::garden` inside one database
//! transaction per mutation:
//!
//! 1. Lock the garden row (and the plant or challenge being changed)
//! 2. Run the rule against the locked state
//! 3. Write plants, counters, and activities
//! 4. Settle achievements until none are left, then save the garden
//! 5. Commit and return the authoritative post-state
//!
//! Achievement rewards can raise the garden level, which can in turn meet a
//! `garden_level` achievement, so step 4 loops.

mod error;

pub use error::GardenServiceError;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use boostme_core::api::{
    ChallengeProgressResponse, GardenUpdate, HarvestResponse, LessonCompleteResponse,
    MyGardenResponse, PlantResponse, SetThemeResponse, WaterGardenResponse, WaterPlantResponse,
};
use boostme_core::garden::themes::find_theme;
use boostme_core::garden::{
    self, AchievementView, ActivityDraft, ChallengeUpdate, DailyChallenge, GardenActivity,
    GardenError, GardenStats, LevelUp, PlantType, Position, Reward, STARTING_STAR_SEEDS,
    ThemeChange, ThemeView, UserGarden, daily_challenge_templates_for, evaluate_achievements,
    theme_views,
};
use boostme_core::{ChallengeId, LessonId, PlantId, PlantTypeId, UserId};

use crate::db::{
    Counter, CourseRepository, GardenRepository, GardenTx, RepositoryError,
};
use crate::services::catalog::CatalogCache;

/// Activities returned when the client does not ask for a limit.
pub const DEFAULT_ACTIVITY_LIMIT: i64 = 20;

/// Most activities returned in one request.
pub const MAX_ACTIVITY_LIMIT: i64 = 100;

/// Garden service.
pub struct GardenService<'a> {
    pool: &'a PgPool,
    catalog: &'a CatalogCache,
}

impl<'a> GardenService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, catalog: &'a CatalogCache) -> Self {
        Self { pool, catalog }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Garden, every plant, and the plant catalog.
    ///
    /// # Errors
    ///
    /// Returns `GardenServiceError::Repository` if a query fails.
    #[instrument(skip(self))]
    pub async fn my_garden(&self, user_id: UserId) -> Result<MyGardenResponse, GardenServiceError> {
        let now = Utc::now();
        let garden = self.load_garden(user_id).await?;
        let plants = GardenRepository::new(self.pool).plants(user_id).await?;
        let plant_types = self.catalog.plant_types(self.pool).await?;

        Ok(MyGardenResponse {
            garden: garden.view(now),
            plants: plants.iter().map(|p| garden::refresh(p, now)).collect(),
            plant_types: plant_types.as_ref().clone(),
        })
    }

    /// # Errors
    ///
    /// Returns `GardenServiceError::Repository` if loading the catalog fails.
    pub async fn plant_types(&self) -> Result<Vec<PlantType>, GardenServiceError> {
        Ok(self.catalog.plant_types(self.pool).await?.as_ref().clone())
    }

    /// Every achievement, with `earned_at` set on the ones the user has.
    ///
    /// # Errors
    ///
    /// Returns `GardenServiceError::Repository` if a query fails.
    #[instrument(skip(self))]
    pub async fn achievements(
        &self,
        user_id: UserId,
    ) -> Result<Vec<AchievementView>, GardenServiceError> {
        let catalog = self.catalog.achievements(self.pool).await?;
        let earned = GardenRepository::new(self.pool)
            .earned_achievements(user_id)
            .await?;

        Ok(catalog
            .iter()
            .map(|achievement| AchievementView {
                earned_at: earned.get(&achievement.id).copied(),
                achievement: achievement.clone(),
            })
            .collect())
    }

    /// Today's challenges (UTC date), created on first request of the day.
    ///
    /// # Errors
    ///
    /// Returns `GardenServiceError::Repository` if a query fails.
    #[instrument(skip(self))]
    pub async fn challenges_today(
        &self,
        user_id: UserId,
    ) -> Result<Vec<DailyChallenge>, GardenServiceError> {
        let today = Utc::now().date_naive();
        let templates = self.catalog.challenge_templates(self.pool).await?;
        let picks = daily_challenge_templates_for(today, &templates);

        let mut tx = GardenTx::begin(self.pool).await?;
        let challenges = tx.ensure_challenges(user_id, today, &picks).await?;
        tx.commit().await?;
        Ok(challenges)
    }

    /// Most recent activities first. `limit` defaults to
    /// [`DEFAULT_ACTIVITY_LIMIT`] and is clamped to `1..=MAX_ACTIVITY_LIMIT`.
    ///
    /// # Errors
    ///
    /// Returns `GardenServiceError::Repository` if the query fails.
    pub async fn activities(
        &self,
        user_id: UserId,
        limit: Option<i64>,
    ) -> Result<Vec<GardenActivity>, GardenServiceError> {
        let limit = limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT);
        Ok(GardenRepository::new(self.pool)
            .activities(user_id, limit)
            .await?)
    }

    /// # Errors
    ///
    /// Returns `GardenServiceError::Repository` if the query fails.
    pub async fn themes(&self, user_id: UserId) -> Result<Vec<ThemeView>, GardenServiceError> {
        let garden = self.load_garden(user_id).await?;
        Ok(theme_views(&garden))
    }

    /// # Errors
    ///
    /// Returns `GardenServiceError::Repository` if a query fails.
    pub async fn stats(&self, user_id: UserId) -> Result<GardenStats, GardenServiceError> {
        let garden = self.load_garden(user_id).await?;
        Ok(GardenRepository::new(self.pool).stats(&garden).await?)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Plant a seed of `plant_type_id`, paying its rarity cost.
    ///
    /// # Errors
    ///
    /// Returns `GardenServiceError::NotFound` for an unknown plant type.
    /// Returns `GardenServiceError::Rule` with `LevelTooLow`,
    /// `InsufficientStarSeeds`, or `PositionTaken`.
    #[instrument(skip(self))]
    pub async fn plant(
        &self,
        user_id: UserId,
        plant_type_id: PlantTypeId,
        position: Option<Position>,
    ) -> Result<PlantResponse, GardenServiceError> {
        let now = Utc::now();
        let plant_type = self
            .catalog
            .plant_type(self.pool, plant_type_id)
            .await?
            .ok_or(GardenServiceError::NotFound("plant type"))?;

        let mut tx = GardenTx::begin(self.pool).await?;
        let mut garden = tx.lock_garden(user_id, STARTING_STAR_SEEDS).await?;
        let existing = tx.plants(user_id).await?;

        let new_plant = garden::plant(&mut garden, &plant_type, &existing, position, now)?;
        let plant = tx
            .insert_plant(user_id, &new_plant)
            .await
            .map_err(|e| match (e, position) {
                (RepositoryError::Conflict(_), Some(Position { x, y })) => {
                    GardenServiceError::Rule(GardenError::PositionTaken { x, y })
                }
                (e, _) => e.into(),
            })?;

        tx.increment(user_id, Counter::PlantsPlanted, 1).await?;
        tx.record_activity(
            user_id,
            &ActivityDraft::planted(&plant_type.name, new_plant.cost),
            now,
        )
        .await?;

        let update = self.settle(&mut tx, &mut garden, None, now).await?;
        tx.commit().await?;

        tracing::info!(plant_id = %plant.id, cost = new_plant.cost, "plant planted");
        Ok(PlantResponse {
            plant: plant.view(now),
            cost: new_plant.cost,
            update,
        })
    }

    /// Water one plant.
    ///
    /// # Errors
    ///
    /// Returns `GardenServiceError::NotFound` if the plant is not the user's.
    /// Returns `GardenServiceError::Rule` with `AlreadyFullyGrown` or
    /// `WateringCooldown`.
    #[instrument(skip(self))]
    pub async fn water_plant(
        &self,
        user_id: UserId,
        plant_id: PlantId,
    ) -> Result<WaterPlantResponse, GardenServiceError> {
        let now = Utc::now();
        let mut tx = GardenTx::begin(self.pool).await?;
        let mut garden = tx.lock_garden(user_id, STARTING_STAR_SEEDS).await?;
        let mut plant = tx
            .lock_plant(user_id, plant_id)
            .await?
            .ok_or(GardenServiceError::NotFound("plant"))?;
        let plant_type = self.plant_type_of(plant.plant_type_id).await?;

        let outcome = garden::water_plant(&mut garden, &mut plant, &plant_type, now)?;

        tx.save_plant(&plant).await?;
        tx.increment(user_id, Counter::Waterings, 1).await?;
        tx.record_activity(
            user_id,
            &ActivityDraft::watered(&plant_type.name, outcome.reward),
            now,
        )
        .await?;

        let update = self
            .settle(&mut tx, &mut garden, outcome.level_up, now)
            .await?;
        tx.commit().await?;

        Ok(WaterPlantResponse {
            plant: plant.view(now),
            reward: outcome.reward,
            progress_gained: outcome.growth.progress_gained,
            grew_up: outcome.growth.grew_up,
            fully_grown: outcome.growth.fully_grown,
            update,
        })
    }

    /// Daily garden-wide watering.
    ///
    /// # Errors
    ///
    /// Returns `GardenServiceError::Rule` with `WateringCooldown` if the
    /// garden was watered less than a day ago.
    #[instrument(skip(self))]
    pub async fn water_garden(
        &self,
        user_id: UserId,
    ) -> Result<WaterGardenResponse, GardenServiceError> {
        let now = Utc::now();
        let catalog = self.catalog.plant_type_map(self.pool).await?;

        let mut tx = GardenTx::begin(self.pool).await?;
        let mut garden = tx.lock_garden(user_id, STARTING_STAR_SEEDS).await?;
        let mut plants = tx.plants(user_id).await?;

        let outcome = garden::water_garden(&mut garden, &mut plants, &catalog, now)?;

        for growth in &outcome.plants {
            if let Some(plant) = plants.iter().find(|p| p.id == growth.plant_id) {
                tx.save_plant(plant).await?;
            }
        }
        let watered = i64::try_from(outcome.plants.len()).unwrap_or(i64::MAX);
        if watered > 0 {
            tx.increment(user_id, Counter::Waterings, watered).await?;
        }
        tx.record_activity(
            user_id,
            &ActivityDraft::garden_watered(outcome.plants.len(), outcome.reward),
            now,
        )
        .await?;

        let update = self
            .settle(&mut tx, &mut garden, outcome.level_up, now)
            .await?;
        tx.commit().await?;

        Ok(WaterGardenResponse {
            plants: plants.iter().map(|p| garden::refresh(p, now)).collect(),
            watered: outcome.plants,
            reward: outcome.reward,
            update,
        })
    }

    /// Harvest a fully grown plant. The plant is removed.
    ///
    /// # Errors
    ///
    /// Returns `GardenServiceError::NotFound` if the plant is not the user's.
    /// Returns `GardenServiceError::Rule` with `NotHarvestable`.
    #[instrument(skip(self))]
    pub async fn harvest(
        &self,
        user_id: UserId,
        plant_id: PlantId,
    ) -> Result<HarvestResponse, GardenServiceError> {
        let now = Utc::now();
        let mut tx = GardenTx::begin(self.pool).await?;
        let mut garden = tx.lock_garden(user_id, STARTING_STAR_SEEDS).await?;
        let plant = tx
            .lock_plant(user_id, plant_id)
            .await?
            .ok_or(GardenServiceError::NotFound("plant"))?;
        let plant_type = self.plant_type_of(plant.plant_type_id).await?;

        let outcome = garden::harvest(&mut garden, &plant, &plant_type)?;

        tx.delete_plant(plant.id).await?;
        tx.increment(user_id, Counter::PlantsHarvested, 1).await?;
        tx.record_activity(
            user_id,
            &ActivityDraft::harvested(&plant_type.name, outcome.reward),
            now,
        )
        .await?;

        let update = self
            .settle(&mut tx, &mut garden, outcome.level_up, now)
            .await?;
        tx.commit().await?;

        tracing::info!(plant_id = %plant.id, xp = outcome.reward.xp, "plant harvested");
        Ok(HarvestResponse {
            harvested_plant_id: plant.id,
            reward: outcome.reward,
            update,
        })
    }

    /// Add progress to a daily challenge. The reward is paid once, on the
    /// call that reaches the target.
    ///
    /// # Errors
    ///
    /// Returns `GardenServiceError::NotFound` if the challenge is not the user's.
    /// Returns `GardenServiceError::Rule` with `InvalidIncrement`, or with
    /// `ChallengeExpired` for a challenge from another day.
    #[instrument(skip(self))]
    pub async fn progress_challenge(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
        increment: i32,
    ) -> Result<ChallengeProgressResponse, GardenServiceError> {
        let now = Utc::now();
        let mut tx = GardenTx::begin(self.pool).await?;
        let mut garden = tx.lock_garden(user_id, STARTING_STAR_SEEDS).await?;
        let mut challenge = tx
            .lock_challenge(user_id, challenge_id)
            .await?
            .ok_or(GardenServiceError::NotFound("challenge"))?;

        let result = garden::apply_challenge_progress(&mut challenge, increment, now)?;

        let mut level_up = None;
        match result {
            ChallengeUpdate::AlreadyCompleted => {}
            ChallengeUpdate::Progressed => tx.save_challenge(&challenge).await?,
            ChallengeUpdate::Completed { reward } => {
                tx.save_challenge(&challenge).await?;
                level_up = garden::grant(&mut garden, reward);
                tx.increment(user_id, Counter::ChallengesCompleted, 1).await?;
                tx.record_activity(
                    user_id,
                    &ActivityDraft::challenge_completed(&challenge.title, reward),
                    now,
                )
                .await?;
            }
        }

        let update = self.settle(&mut tx, &mut garden, level_up, now).await?;
        tx.commit().await?;

        Ok(ChallengeProgressResponse {
            challenge,
            result,
            update,
        })
    }

    /// Select a theme, buying it first if the user does not own it.
    ///
    /// # Errors
    ///
    /// Returns `GardenServiceError::Rule` with `UnknownTheme`, `LevelTooLow`,
    /// or `InsufficientStarSeeds`.
    #[instrument(skip(self))]
    pub async fn set_theme(
        &self,
        user_id: UserId,
        theme: &str,
    ) -> Result<SetThemeResponse, GardenServiceError> {
        let now = Utc::now();
        let mut tx = GardenTx::begin(self.pool).await?;
        let mut garden = tx.lock_garden(user_id, STARTING_STAR_SEEDS).await?;

        let result = garden::unlock_theme(&mut garden, theme)?;

        if let ThemeChange::Unlocked { cost } = result {
            let name = find_theme(theme).map_or(theme, |t| t.name);
            tx.record_activity(user_id, &ActivityDraft::theme_unlocked(name, cost), now)
                .await?;
        }

        let update = self.settle(&mut tx, &mut garden, None, now).await?;
        tx.commit().await?;

        Ok(SetThemeResponse {
            result,
            themes: theme_views(&garden),
            update,
        })
    }

    /// Award a lesson's reward, and the course bonus when it was the last
    /// lesson left. Completing a lesson again awards nothing.
    ///
    /// # Errors
    ///
    /// Returns `GardenServiceError::NotFound` for an unknown lesson.
    #[instrument(skip(self))]
    pub async fn complete_lesson(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<LessonCompleteResponse, GardenServiceError> {
        let now = Utc::now();
        let courses = CourseRepository::new(self.pool);
        let lesson = courses
            .get_lesson(lesson_id)
            .await?
            .ok_or(GardenServiceError::NotFound("lesson"))?;
        let course_title = courses.title(lesson.course_id).await?;

        let mut tx = GardenTx::begin(self.pool).await?;
        let mut garden = tx.lock_garden(user_id, STARTING_STAR_SEEDS).await?;

        if !tx.complete_lesson(user_id, lesson_id, now).await? {
            tx.commit().await?;
            return Ok(LessonCompleteResponse {
                lesson_id,
                already_completed: true,
                reward: Reward::NONE,
                course_completed: false,
                update: GardenUpdate {
                    garden: garden.view(now),
                    level_up: None,
                    new_achievements: Vec::new(),
                },
            });
        }

        let mut reward = garden::lesson_reward(lesson.duration_minutes);
        let mut level_up = garden::grant(&mut garden, reward);
        tx.record_activity(
            user_id,
            &ActivityDraft::lesson_completed(&lesson.title, reward),
            now,
        )
        .await?;

        let mut course_completed = false;
        if tx.remaining_lessons(user_id, lesson.course_id).await? == 0
            && tx.complete_course(user_id, lesson.course_id, now).await?
        {
            let bonus = garden::course_completion_bonus();
            level_up = merge_level_ups(level_up, garden::grant(&mut garden, bonus));
            tx.record_activity(
                user_id,
                &ActivityDraft::course_completed(&course_title, bonus),
                now,
            )
            .await?;
            reward += bonus;
            course_completed = true;
        }

        let update = self.settle(&mut tx, &mut garden, level_up, now).await?;
        tx.commit().await?;

        Ok(LessonCompleteResponse {
            lesson_id,
            already_completed: false,
            reward,
            course_completed,
            update,
        })
    }

    /// Grant XP and Star Seeds directly. Used by operator tooling.
    ///
    /// # Errors
    ///
    /// Returns `GardenServiceError::Repository` if a query fails.
    #[instrument(skip(self))]
    pub async fn grant(
        &self,
        user_id: UserId,
        reward: Reward,
    ) -> Result<GardenUpdate, GardenServiceError> {
        let now = Utc::now();
        let mut tx = GardenTx::begin(self.pool).await?;
        let mut garden = tx.lock_garden(user_id, STARTING_STAR_SEEDS).await?;

        let level_up = garden::grant(&mut garden, reward);
        tx.record_activity(user_id, &ActivityDraft::granted(reward), now)
            .await?;

        let update = self.settle(&mut tx, &mut garden, level_up, now).await?;
        tx.commit().await?;
        Ok(update)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn load_garden(&self, user_id: UserId) -> Result<UserGarden, GardenServiceError> {
        if let Some(garden) = GardenRepository::new(self.pool).get_garden(user_id).await? {
            return Ok(garden);
        }
        // Accounts created before gardens existed get one on first visit
        let mut tx = GardenTx::begin(self.pool).await?;
        let garden = tx.lock_garden(user_id, STARTING_STAR_SEEDS).await?;
        tx.commit().await?;
        Ok(garden)
    }

    async fn plant_type_of(&self, id: PlantTypeId) -> Result<PlantType, GardenServiceError> {
        self.catalog
            .plant_type(self.pool, id)
            .await?
            .ok_or(GardenServiceError::NotFound("plant type"))
    }

    /// Award every achievement now met, record the level change, and save
    /// the garden.
    async fn settle(
        &self,
        tx: &mut GardenTx,
        garden: &mut UserGarden,
        level_up: Option<LevelUp>,
        now: DateTime<Utc>,
    ) -> Result<GardenUpdate, GardenServiceError> {
        let user_id = garden.user_id;
        let catalog = self.catalog.achievements(self.pool).await?;
        let mut earned = tx.earned_achievement_ids(user_id).await?;
        let mut level_up = level_up;
        let mut new_achievements = Vec::new();

        loop {
            let stats = tx.stats(garden).await?;
            let due: Vec<_> = evaluate_achievements(&catalog, &earned, &stats)
                .into_iter()
                .cloned()
                .collect();
            if due.is_empty() {
                break;
            }

            for achievement in due {
                earned.insert(achievement.id);
                if !tx.award_achievement(user_id, achievement.id, now).await? {
                    continue;
                }
                let reward = achievement.reward();
                level_up = merge_level_ups(level_up, garden::grant(garden, reward));
                tx.record_activity(
                    user_id,
                    &ActivityDraft::achievement_unlocked(&achievement.name, reward),
                    now,
                )
                .await?;
                tracing::info!(user_id = %user_id, achievement = %achievement.key, "achievement earned");
                new_achievements.push(achievement);
            }
        }

        if let Some(change) = level_up {
            tx.record_activity(user_id, &ActivityDraft::level_up(change), now)
                .await?;
            tracing::info!(user_id = %user_id, from = change.from, to = change.to, "garden leveled up");
        }
        tx.save_garden(garden).await?;

        Ok(GardenUpdate {
            garden: garden.view(now),
            level_up,
            new_achievements,
        })
    }
}

/// Combine two level changes from the same request into one.
const fn merge_level_ups(first: Option<LevelUp>, second: Option<LevelUp>) -> Option<LevelUp> {
    match (first, second) {
        (Some(a), Some(b)) => Some(LevelUp {
            from: a.from,
            to: b.to,
        }),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_level_ups() {
        let a = Some(LevelUp { from: 1, to: 2 });
        let b = Some(LevelUp { from: 2, to: 4 });
        assert_eq!(merge_level_ups(a, b), Some(LevelUp { from: 1, to: 4 }));
        assert_eq!(merge_level_ups(a, None), a);
        assert_eq!(merge_level_ups(None, b), b);
        assert_eq!(merge_level_ups(None, None), None);
    }
}
