//! Garden catalog: plant types, achievements, and challenge templates.
//!
//! Users only read the catalog. Writes come from `boostme seed catalog`.

use std::collections::BTreeMap;

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use boostme_core::garden::{
    Achievement, AchievementCriteria, ChallengeTemplate, GrowthStage, PlantType,
};
use boostme_core::{AchievementId, PlantTypeId};

use super::RepositoryError;
use crate::models::catalog::{AchievementSeed, CatalogFile, CourseSeed, PlantTypeSeed};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct PlantTypeRow {
    id: i32,
    name: String,
    description: Option<String>,
    category: String,
    rarity: String,
    base_xp_reward: i32,
    star_seeds_reward: i32,
    unlock_level: i32,
    growth_stages: Json<BTreeMap<i32, GrowthStage>>,
}

impl TryFrom<PlantTypeRow> for PlantType {
    type Error = RepositoryError;

    fn try_from(row: PlantTypeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PlantTypeId::new(row.id),
            name: row.name,
            description: row.description,
            category: row.category.parse().map_err(RepositoryError::DataCorruption)?,
            rarity: row.rarity.parse().map_err(RepositoryError::DataCorruption)?,
            base_xp_reward: row.base_xp_reward,
            star_seeds_reward: row.star_seeds_reward,
            unlock_level: row.unlock_level,
            growth_stages: row.growth_stages.0,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AchievementRow {
    id: i32,
    key: String,
    name: String,
    description: Option<String>,
    icon: Option<String>,
    criteria: Json<AchievementCriteria>,
    xp_reward: i32,
    star_seeds_reward: i32,
}

impl From<AchievementRow> for Achievement {
    fn from(row: AchievementRow) -> Self {
        Self {
            id: AchievementId::new(row.id),
            key: row.key,
            name: row.name,
            description: row.description,
            icon: row.icon,
            criteria: row.criteria.0,
            xp_reward: row.xp_reward,
            star_seeds_reward: row.star_seeds_reward,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ChallengeTemplateRow {
    key: String,
    title: String,
    description: Option<String>,
    target: i32,
    xp_reward: i32,
    star_seeds_reward: i32,
}

impl From<ChallengeTemplateRow> for ChallengeTemplate {
    fn from(row: ChallengeTemplateRow) -> Self {
        Self {
            key: row.key,
            title: row.title,
            description: row.description,
            target: row.target,
            xp_reward: row.xp_reward,
            star_seeds_reward: row.star_seeds_reward,
        }
    }
}

/// Row counts written by [`CatalogRepository::seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub plant_types: usize,
    pub achievements: usize,
    pub challenge_templates: usize,
    pub courses: usize,
    pub lessons: usize,
    pub removed: u64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All plant types, cheapest unlocks first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a stored enum is unknown.
    pub async fn list_plant_types(&self) -> Result<Vec<PlantType>, RepositoryError> {
        let rows = sqlx::query_as::<_, PlantTypeRow>(
            r"
            SELECT id, name, description, category, rarity, base_xp_reward,
                   star_seeds_reward, unlock_level, growth_stages
            FROM plant_types
            ORDER BY unlock_level, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PlantType::try_from).collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_achievements(&self) -> Result<Vec<Achievement>, RepositoryError> {
        let rows = sqlx::query_as::<_, AchievementRow>(
            r"
            SELECT id, key, name, description, icon, criteria, xp_reward, star_seeds_reward
            FROM achievements
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Templates in rotation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_challenge_templates(
        &self,
    ) -> Result<Vec<ChallengeTemplate>, RepositoryError> {
        let rows = sqlx::query_as::<_, ChallengeTemplateRow>(
            r"
            SELECT key, title, description, target, xp_reward, star_seeds_reward
            FROM challenge_templates
            ORDER BY sort_order, key
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Upsert a whole catalog file in one transaction.
    ///
    /// With `replace`, entries missing from the file are deleted. Plant types
    /// that users still grow are kept.
    ///
    /// The caller validates the file first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails. Nothing is
    /// written in that case.
    pub async fn seed(
        &self,
        catalog: &CatalogFile,
        replace: bool,
    ) -> Result<SeedSummary, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut summary = SeedSummary::default();

        for seed in &catalog.plant_types {
            upsert_plant_type(&mut tx, seed).await?;
            summary.plant_types += 1;
        }
        for seed in &catalog.achievements {
            upsert_achievement(&mut tx, seed).await?;
            summary.achievements += 1;
        }
        for (sort_order, template) in (0_i32..).zip(&catalog.challenge_templates) {
            upsert_challenge_template(&mut tx, template, sort_order).await?;
            summary.challenge_templates += 1;
        }
        for course in &catalog.courses {
            summary.lessons += upsert_course(&mut tx, course).await?;
            summary.courses += 1;
        }

        if replace {
            summary.removed = remove_missing(&mut tx, catalog).await?;
        }

        tx.commit().await?;
        Ok(summary)
    }
}

async fn upsert_plant_type(
    conn: &mut PgConnection,
    seed: &PlantTypeSeed,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO plant_types (name, description, category, rarity, base_xp_reward,
                                 star_seeds_reward, unlock_level, growth_stages)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (name) DO UPDATE SET
            description = EXCLUDED.description,
            category = EXCLUDED.category,
            rarity = EXCLUDED.rarity,
            base_xp_reward = EXCLUDED.base_xp_reward,
            star_seeds_reward = EXCLUDED.star_seeds_reward,
            unlock_level = EXCLUDED.unlock_level,
            growth_stages = EXCLUDED.growth_stages
        ",
    )
    .bind(&seed.name)
    .bind(&seed.description)
    .bind(seed.category.as_str())
    .bind(seed.rarity.as_str())
    .bind(seed.base_xp_reward)
    .bind(seed.star_seeds_reward)
    .bind(seed.unlock_level)
    .bind(Json(&seed.growth_stages))
    .execute(conn)
    .await?;
    Ok(())
}

async fn upsert_achievement(
    conn: &mut PgConnection,
    seed: &AchievementSeed,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO achievements (key, name, description, icon, criteria, xp_reward, star_seeds_reward)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (key) DO UPDATE SET
            name = EXCLUDED.name,
            description = EXCLUDED.description,
            icon = EXCLUDED.icon,
            criteria = EXCLUDED.criteria,
            xp_reward = EXCLUDED.xp_reward,
            star_seeds_reward = EXCLUDED.star_seeds_reward
        ",
    )
    .bind(&seed.key)
    .bind(&seed.name)
    .bind(&seed.description)
    .bind(&seed.icon)
    .bind(Json(seed.criteria))
    .bind(seed.xp_reward)
    .bind(seed.star_seeds_reward)
    .execute(conn)
    .await?;
    Ok(())
}

async fn upsert_challenge_template(
    conn: &mut PgConnection,
    template: &ChallengeTemplate,
    sort_order: i32,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO challenge_templates (key, title, description, target, xp_reward,
                                         star_seeds_reward, sort_order)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (key) DO UPDATE SET
            title = EXCLUDED.title,
            description = EXCLUDED.description,
            target = EXCLUDED.target,
            xp_reward = EXCLUDED.xp_reward,
            star_seeds_reward = EXCLUDED.star_seeds_reward,
            sort_order = EXCLUDED.sort_order
        ",
    )
    .bind(&template.key)
    .bind(&template.title)
    .bind(&template.description)
    .bind(template.target)
    .bind(template.xp_reward)
    .bind(template.star_seeds_reward)
    .bind(sort_order)
    .execute(conn)
    .await?;
    Ok(())
}

/// Upsert a course and its lessons. Returns the number of lessons written.
async fn upsert_course(
    conn: &mut PgConnection,
    course: &CourseSeed,
) -> Result<usize, RepositoryError> {
    let course_id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO courses (title, description, category)
        VALUES ($1, $2, $3)
        ON CONFLICT (title) DO UPDATE SET
            description = EXCLUDED.description,
            category = EXCLUDED.category
        RETURNING id
        ",
    )
    .bind(&course.title)
    .bind(&course.description)
    .bind(course.category.map(|c| c.as_str()))
    .fetch_one(&mut *conn)
    .await?;

    for (position, lesson) in (1_i32..).zip(&course.lessons) {
        sqlx::query(
            r"
            INSERT INTO lessons (course_id, title, position, duration_minutes)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (course_id, position) DO UPDATE SET
                title = EXCLUDED.title,
                duration_minutes = EXCLUDED.duration_minutes
            ",
        )
        .bind(course_id)
        .bind(&lesson.title)
        .bind(position)
        .bind(lesson.duration_minutes)
        .execute(&mut *conn)
        .await?;
    }

    let lesson_count = i32::try_from(course.lessons.len()).unwrap_or(i32::MAX);
    sqlx::query("DELETE FROM lessons WHERE course_id = $1 AND position > $2")
        .bind(course_id)
        .bind(lesson_count)
        .execute(&mut *conn)
        .await?;

    Ok(course.lessons.len())
}

/// Delete catalog rows that are not in `catalog`. Returns the number removed.
async fn remove_missing(
    conn: &mut PgConnection,
    catalog: &CatalogFile,
) -> Result<u64, RepositoryError> {
    let plant_names: Vec<&str> = catalog.plant_types.iter().map(|p| p.name.as_str()).collect();
    let achievement_keys: Vec<&str> = catalog.achievements.iter().map(|a| a.key.as_str()).collect();
    let template_keys: Vec<&str> = catalog
        .challenge_templates
        .iter()
        .map(|t| t.key.as_str())
        .collect();
    let course_titles: Vec<&str> = catalog.courses.iter().map(|c| c.title.as_str()).collect();

    let mut removed = 0;
    removed += sqlx::query(
        r"
        DELETE FROM plant_types p
        WHERE NOT (p.name = ANY($1))
          AND NOT EXISTS (SELECT 1 FROM user_plants up WHERE up.plant_type_id = p.id)
        ",
    )
    .bind(&plant_names)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    removed += sqlx::query("DELETE FROM achievements WHERE NOT (key = ANY($1))")
        .bind(&achievement_keys)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    removed += sqlx::query("DELETE FROM challenge_templates WHERE NOT (key = ANY($1))")
        .bind(&template_keys)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    removed += sqlx::query("DELETE FROM courses WHERE NOT (title = ANY($1))")
        .bind(&course_titles)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(removed)
}
