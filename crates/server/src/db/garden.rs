//! Per-user garden state.
//!
//! Mutations go through [`GardenTx`], which holds one transaction with the
//! user's garden row locked, so concurrent requests for the same user are
//! serialized. Read-only endpoints use [`GardenRepository`].

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use boostme_core::garden::{
    ActivityDraft, ChallengeTemplate, DailyChallenge, GardenActivity, GardenStats, NewPlant,
    Position, UserGarden, UserPlant,
};
use boostme_core::{
    AchievementId, ActivityId, ChallengeId, CourseId, LessonId, PlantId, PlantTypeId, UserId,
};

use super::{RepositoryError, conflict_on_unique};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct GardenRow {
    user_id: i32,
    level: i32,
    xp: i32,
    star_seeds: i32,
    theme: Option<String>,
    unlocked_themes: Vec<String>,
    last_watered_at: Option<DateTime<Utc>>,
}

impl From<GardenRow> for UserGarden {
    fn from(row: GardenRow) -> Self {
        Self {
            user_id: UserId::new(row.user_id),
            level: row.level,
            xp: row.xp,
            star_seeds: row.star_seeds,
            theme: row.theme,
            unlocked_themes: row.unlocked_themes,
            last_watered_at: row.last_watered_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlantRow {
    id: i32,
    user_id: i32,
    plant_type_id: i32,
    stage: i32,
    health: i32,
    growth_progress: i32,
    is_fully_grown: bool,
    position_x: Option<i32>,
    position_y: Option<i32>,
    times_watered: i32,
    planted_at: DateTime<Utc>,
    last_watered_at: Option<DateTime<Utc>>,
    next_water_at: DateTime<Utc>,
}

impl From<PlantRow> for UserPlant {
    fn from(row: PlantRow) -> Self {
        let position = match (row.position_x, row.position_y) {
            (Some(x), Some(y)) => Some(Position { x, y }),
            _ => None,
        };
        Self {
            id: PlantId::new(row.id),
            user_id: UserId::new(row.user_id),
            plant_type_id: PlantTypeId::new(row.plant_type_id),
            stage: row.stage,
            health: row.health,
            growth_progress: row.growth_progress,
            is_fully_grown: row.is_fully_grown,
            position,
            times_watered: row.times_watered,
            planted_at: row.planted_at,
            last_watered_at: row.last_watered_at,
            next_water_at: row.next_water_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ChallengeRow {
    id: i32,
    user_id: i32,
    template_key: String,
    title: String,
    description: Option<String>,
    challenge_date: NaiveDate,
    progress: i32,
    target: i32,
    is_completed: bool,
    completed_at: Option<DateTime<Utc>>,
    xp_reward: i32,
    star_seeds_reward: i32,
}

impl From<ChallengeRow> for DailyChallenge {
    fn from(row: ChallengeRow) -> Self {
        Self {
            id: ChallengeId::new(row.id),
            user_id: UserId::new(row.user_id),
            template_key: row.template_key,
            title: row.title,
            description: row.description,
            challenge_date: row.challenge_date,
            progress: row.progress,
            target: row.target,
            is_completed: row.is_completed,
            completed_at: row.completed_at,
            xp_reward: row.xp_reward,
            star_seeds_reward: row.star_seeds_reward,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    id: i32,
    user_id: i32,
    kind: String,
    description: String,
    xp_delta: i32,
    star_seeds_delta: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for GardenActivity {
    type Error = RepositoryError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActivityId::new(row.id),
            user_id: UserId::new(row.user_id),
            kind: row.kind.parse().map_err(RepositoryError::DataCorruption)?,
            description: row.description,
            xp_delta: row.xp_delta,
            star_seeds_delta: row.star_seeds_delta,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    plants_planted: i64,
    plants_harvested: i64,
    waterings: i64,
    challenges_completed: i64,
    active_plants: i64,
    lessons_completed: i64,
    courses_completed: i64,
    achievements_earned: i64,
}

const GARDEN_COLUMNS: &str =
    "user_id, level, xp, star_seeds, theme, unlocked_themes, last_watered_at";

const PLANT_COLUMNS: &str = "id, user_id, plant_type_id, stage, health, growth_progress, \
     is_fully_grown, position_x, position_y, times_watered, planted_at, last_watered_at, \
     next_water_at";

const CHALLENGE_COLUMNS: &str = "id, user_id, template_key, title, description, challenge_date, \
     progress, target, is_completed, completed_at, xp_reward, star_seeds_reward";

/// Lifetime counters kept on the garden row.
///
/// Plants are deleted on harvest, so these cannot be derived by counting rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    PlantsPlanted,
    PlantsHarvested,
    Waterings,
    ChallengesCompleted,
}

impl Counter {
    const fn column(self) -> &'static str {
        match self {
            Self::PlantsPlanted => "plants_planted",
            Self::PlantsHarvested => "plants_harvested",
            Self::Waterings => "waterings",
            Self::ChallengesCompleted => "challenges_completed",
        }
    }
}

// =============================================================================
// Shared Queries
// =============================================================================

async fn fetch_garden(
    conn: &mut PgConnection,
    user_id: UserId,
    lock: bool,
) -> Result<Option<UserGarden>, RepositoryError> {
    let suffix = if lock { " FOR UPDATE" } else { "" };
    let sql = format!("SELECT {GARDEN_COLUMNS} FROM user_gardens WHERE user_id = $1{suffix}");
    let row = sqlx::query_as::<_, GardenRow>(&sql)
        .bind(user_id.as_i32())
        .fetch_optional(conn)
        .await?;
    Ok(row.map(Into::into))
}

async fn fetch_plants(
    conn: &mut PgConnection,
    user_id: UserId,
    lock: bool,
) -> Result<Vec<UserPlant>, RepositoryError> {
    let suffix = if lock { " FOR UPDATE" } else { "" };
    let sql = format!(
        "SELECT {PLANT_COLUMNS} FROM user_plants WHERE user_id = $1 ORDER BY planted_at, id{suffix}"
    );
    let rows = sqlx::query_as::<_, PlantRow>(&sql)
        .bind(user_id.as_i32())
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

async fn fetch_challenges(
    conn: &mut PgConnection,
    user_id: UserId,
    date: NaiveDate,
) -> Result<Vec<DailyChallenge>, RepositoryError> {
    let sql = format!(
        "SELECT {CHALLENGE_COLUMNS} FROM daily_challenges \
         WHERE user_id = $1 AND challenge_date = $2 ORDER BY id"
    );
    let rows = sqlx::query_as::<_, ChallengeRow>(&sql)
        .bind(user_id.as_i32())
        .bind(date)
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

async fn fetch_stats(
    conn: &mut PgConnection,
    garden: &UserGarden,
) -> Result<GardenStats, RepositoryError> {
    let row = sqlx::query_as::<_, StatsRow>(
        r"
        SELECT g.plants_planted,
               g.plants_harvested,
               g.waterings,
               g.challenges_completed,
               (SELECT COUNT(*) FROM user_plants p WHERE p.user_id = g.user_id) AS active_plants,
               (SELECT COUNT(*) FROM lesson_completions l WHERE l.user_id = g.user_id) AS lessons_completed,
               (SELECT COUNT(*) FROM course_completions c WHERE c.user_id = g.user_id) AS courses_completed,
               (SELECT COUNT(*) FROM user_achievements a WHERE a.user_id = g.user_id) AS achievements_earned
        FROM user_gardens g
        WHERE g.user_id = $1
        ",
    )
    .bind(garden.user_id.as_i32())
    .fetch_optional(conn)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    Ok(GardenStats {
        plants_planted: row.plants_planted,
        plants_harvested: row.plants_harvested,
        active_plants: row.active_plants,
        waterings: row.waterings,
        lessons_completed: row.lessons_completed,
        courses_completed: row.courses_completed,
        challenges_completed: row.challenges_completed,
        achievements_earned: row.achievements_earned,
        garden_level: i64::from(garden.level),
    })
}

async fn fetch_earned(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<HashMap<AchievementId, DateTime<Utc>>, RepositoryError> {
    let rows: Vec<(i32, DateTime<Utc>)> = sqlx::query_as(
        "SELECT achievement_id, earned_at FROM user_achievements WHERE user_id = $1",
    )
    .bind(user_id.as_i32())
    .fetch_all(conn)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(id, at)| (AchievementId::new(id), at))
        .collect())
}

// =============================================================================
// Transaction
// =============================================================================

/// One garden mutation.
///
/// Dropping a `GardenTx` without calling [`GardenTx::commit`] rolls back.
pub struct GardenTx {
    tx: Transaction<'static, Postgres>,
}

impl GardenTx {
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if no connection is available.
    pub async fn begin(pool: &PgPool) -> Result<Self, RepositoryError> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    /// Lock the user's garden row, creating it if the user has none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lock_garden(
        &mut self,
        user_id: UserId,
        starting_star_seeds: i32,
    ) -> Result<UserGarden, RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO user_gardens (user_id, star_seeds)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user_id.as_i32())
        .bind(starting_star_seeds)
        .execute(&mut *self.tx)
        .await?;

        fetch_garden(&mut self.tx, user_id, true)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn save_garden(&mut self, garden: &UserGarden) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE user_gardens
            SET level = $2, xp = $3, star_seeds = $4, theme = $5,
                unlocked_themes = $6, last_watered_at = $7, updated_at = now()
            WHERE user_id = $1
            ",
        )
        .bind(garden.user_id.as_i32())
        .bind(garden.level)
        .bind(garden.xp)
        .bind(garden.star_seeds)
        .bind(&garden.theme)
        .bind(&garden.unlocked_themes)
        .bind(garden.last_watered_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    /// Every plant of the user, locked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn plants(&mut self, user_id: UserId) -> Result<Vec<UserPlant>, RepositoryError> {
        fetch_plants(&mut self.tx, user_id, true).await
    }

    /// Lock one plant. `None` if it does not exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lock_plant(
        &mut self,
        user_id: UserId,
        plant_id: PlantId,
    ) -> Result<Option<UserPlant>, RepositoryError> {
        let sql = format!(
            "SELECT {PLANT_COLUMNS} FROM user_plants WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let row = sqlx::query_as::<_, PlantRow>(&sql)
            .bind(plant_id.as_i32())
            .bind(user_id.as_i32())
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.map(Into::into))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the position is already taken.
    pub async fn insert_plant(
        &mut self,
        user_id: UserId,
        plant: &NewPlant,
    ) -> Result<UserPlant, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO user_plants (user_id, plant_type_id, stage, health, growth_progress,
                                     position_x, position_y, planted_at, next_water_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PLANT_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, PlantRow>(&sql)
            .bind(user_id.as_i32())
            .bind(plant.plant_type_id.as_i32())
            .bind(plant.stage)
            .bind(plant.health)
            .bind(plant.growth_progress)
            .bind(plant.position.map(|p| p.x))
            .bind(plant.position.map(|p| p.y))
            .bind(plant.planted_at)
            .bind(plant.next_water_at)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| conflict_on_unique(e, "plant position"))?;
        Ok(row.into())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn save_plant(&mut self, plant: &UserPlant) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE user_plants
            SET stage = $2, health = $3, growth_progress = $4, is_fully_grown = $5,
                times_watered = $6, last_watered_at = $7, next_water_at = $8
            WHERE id = $1
            ",
        )
        .bind(plant.id.as_i32())
        .bind(plant.stage)
        .bind(plant.health)
        .bind(plant.growth_progress)
        .bind(plant.is_fully_grown)
        .bind(plant.times_watered)
        .bind(plant.last_watered_at)
        .bind(plant.next_water_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_plant(&mut self, plant_id: PlantId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM user_plants WHERE id = $1")
            .bind(plant_id.as_i32())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    /// Append to the activity feed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record_activity(
        &mut self,
        user_id: UserId,
        draft: &ActivityDraft,
        now: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO garden_activities (user_id, kind, description, xp_delta,
                                           star_seeds_delta, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(user_id.as_i32())
        .bind(draft.kind.as_str())
        .bind(&draft.description)
        .bind(draft.xp_delta)
        .bind(draft.star_seeds_delta)
        .bind(now)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    /// Bump a lifetime counter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn increment(
        &mut self,
        user_id: UserId,
        counter: Counter,
        by: i64,
    ) -> Result<(), RepositoryError> {
        let column = counter.column();
        let sql = format!("UPDATE user_gardens SET {column} = {column} + $2 WHERE user_id = $1");
        sqlx::query(&sql)
            .bind(user_id.as_i32())
            .bind(by)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    /// Counters achievements are checked against, as seen inside this
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the garden row is missing.
    pub async fn stats(&mut self, garden: &UserGarden) -> Result<GardenStats, RepositoryError> {
        fetch_stats(&mut self.tx, garden).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn earned_achievement_ids(
        &mut self,
        user_id: UserId,
    ) -> Result<HashSet<AchievementId>, RepositoryError> {
        Ok(fetch_earned(&mut self.tx, user_id)
            .await?
            .into_keys()
            .collect())
    }

    /// Record an achievement. Returns `false` if it was already earned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn award_achievement(
        &mut self,
        user_id: UserId,
        achievement_id: AchievementId,
        now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO user_achievements (user_id, achievement_id, earned_at)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(user_id.as_i32())
        .bind(achievement_id.as_i32())
        .bind(now)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Create the day's challenges from `templates` if they do not exist yet.
    ///
    /// Challenges copy the template's title, target, and rewards, so later
    /// catalog edits do not change a day already handed out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if an insert fails.
    pub async fn ensure_challenges(
        &mut self,
        user_id: UserId,
        date: NaiveDate,
        templates: &[&ChallengeTemplate],
    ) -> Result<Vec<DailyChallenge>, RepositoryError> {
        let existing = fetch_challenges(&mut self.tx, user_id, date).await?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        for template in templates {
            sqlx::query(
                r"
                INSERT INTO daily_challenges (user_id, template_key, title, description,
                                              challenge_date, target, xp_reward, star_seeds_reward)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (user_id, challenge_date, template_key) DO NOTHING
                ",
            )
            .bind(user_id.as_i32())
            .bind(&template.key)
            .bind(&template.title)
            .bind(&template.description)
            .bind(date)
            .bind(template.target)
            .bind(template.xp_reward)
            .bind(template.star_seeds_reward)
            .execute(&mut *self.tx)
            .await?;
        }

        fetch_challenges(&mut self.tx, user_id, date).await
    }

    /// Lock one challenge. `None` if it does not exist or belongs to someone
    /// else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lock_challenge(
        &mut self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Option<DailyChallenge>, RepositoryError> {
        let sql = format!(
            "SELECT {CHALLENGE_COLUMNS} FROM daily_challenges \
             WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let row = sqlx::query_as::<_, ChallengeRow>(&sql)
            .bind(challenge_id.as_i32())
            .bind(user_id.as_i32())
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.map(Into::into))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn save_challenge(
        &mut self,
        challenge: &DailyChallenge,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE daily_challenges
            SET progress = $2, is_completed = $3, completed_at = $4
            WHERE id = $1
            ",
        )
        .bind(challenge.id.as_i32())
        .bind(challenge.progress)
        .bind(challenge.is_completed)
        .bind(challenge.completed_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    /// Mark a lesson done. Returns `false` if it already was.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn complete_lesson(
        &mut self,
        user_id: UserId,
        lesson_id: LessonId,
        now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO lesson_completions (user_id, lesson_id, completed_at)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(user_id.as_i32())
        .bind(lesson_id.as_i32())
        .bind(now)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Lessons of `course_id` the user has not completed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remaining_lessons(
        &mut self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<i64, RepositoryError> {
        let remaining: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM lessons l
            WHERE l.course_id = $2
              AND NOT EXISTS (
                  SELECT 1 FROM lesson_completions c
                  WHERE c.lesson_id = l.id AND c.user_id = $1
              )
            ",
        )
        .bind(user_id.as_i32())
        .bind(course_id.as_i32())
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(remaining)
    }

    /// Mark a course done. Returns `false` if it already was.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn complete_course(
        &mut self,
        user_id: UserId,
        course_id: CourseId,
        now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO course_completions (user_id, course_id, completed_at)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(user_id.as_i32())
        .bind(course_id.as_i32())
        .bind(now)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the commit fails.
    pub async fn commit(self) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Read Repository
// =============================================================================

/// Lock-free reads for GET endpoints.
pub struct GardenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GardenRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_garden(&self, user_id: UserId) -> Result<Option<UserGarden>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        fetch_garden(&mut conn, user_id, false).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn plants(&self, user_id: UserId) -> Result<Vec<UserPlant>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        fetch_plants(&mut conn, user_id, false).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the garden row is missing.
    pub async fn stats(&self, garden: &UserGarden) -> Result<GardenStats, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        fetch_stats(&mut conn, garden).await
    }

    /// When each earned achievement was earned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn earned_achievements(
        &self,
        user_id: UserId,
    ) -> Result<HashMap<AchievementId, DateTime<Utc>>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        fetch_earned(&mut conn, user_id).await
    }

    /// Most recent activities first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a stored kind is unknown.
    pub async fn activities(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<GardenActivity>, RepositoryError> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r"
            SELECT id, user_id, kind, description, xp_delta, star_seeds_delta, created_at
            FROM garden_activities
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(GardenActivity::try_from).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_plant_row_position_requires_both_coordinates() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let row = |x, y| PlantRow {
            id: 1,
            user_id: 2,
            plant_type_id: 3,
            stage: 0,
            health: 100,
            growth_progress: 0,
            is_fully_grown: false,
            position_x: x,
            position_y: y,
            times_watered: 0,
            planted_at: at,
            last_watered_at: None,
            next_water_at: at,
        };

        let plant = UserPlant::from(row(Some(1), Some(2)));
        assert_eq!(plant.position, Some(Position { x: 1, y: 2 }));
        assert_eq!(plant.user_id, UserId::new(2));
        assert!(UserPlant::from(row(Some(1), None)).position.is_none());
    }

    #[test]
    fn test_activity_row_rejects_unknown_kind() {
        let row = ActivityRow {
            id: 1,
            user_id: 1,
            kind: "teleported".to_owned(),
            description: String::new(),
            xp_delta: 0,
            star_seeds_delta: 0,
            created_at: Utc::now(),
        };
        assert!(matches!(
            GardenActivity::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_counter_columns() {
        assert_eq!(Counter::PlantsPlanted.column(), "plants_planted");
        assert_eq!(Counter::ChallengesCompleted.column(), "challenges_completed");
    }
}
