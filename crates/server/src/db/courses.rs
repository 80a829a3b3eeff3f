//! Course and lesson catalog.

use sqlx::PgPool;

use boostme_core::api::{Course, Lesson};
use boostme_core::{CourseId, LessonId, PlantCategory};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: i32,
    title: String,
    description: Option<String>,
    category: Option<String>,
    lesson_count: i64,
}

impl TryFrom<CourseRow> for Course {
    type Error = RepositoryError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .map(|c| c.parse::<PlantCategory>())
            .transpose()
            .map_err(RepositoryError::DataCorruption)?;
        Ok(Self {
            id: CourseId::new(row.id),
            title: row.title,
            description: row.description,
            category,
            lesson_count: row.lesson_count,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LessonRow {
    id: i32,
    course_id: i32,
    title: String,
    position: i32,
    duration_minutes: i32,
}

impl From<LessonRow> for Lesson {
    fn from(row: LessonRow) -> Self {
        Self {
            id: LessonId::new(row.id),
            course_id: CourseId::new(row.course_id),
            title: row.title,
            position: row.position,
            duration_minutes: row.duration_minutes,
        }
    }
}

const COURSE_SELECT: &str = r"
    SELECT c.id, c.title, c.description, c.category,
           (SELECT COUNT(*) FROM lessons l WHERE l.course_id = c.id) AS lesson_count
    FROM courses c
";

/// Repository for course database operations.
pub struct CourseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CourseRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a stored category is unknown.
    pub async fn list(&self) -> Result<Vec<Course>, RepositoryError> {
        let sql = format!("{COURSE_SELECT} ORDER BY c.id");
        let rows = sqlx::query_as::<_, CourseRow>(&sql)
            .fetch_all(self.pool)
            .await?;
        rows.into_iter().map(Course::try_from).collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the stored category is unknown.
    pub async fn get(&self, id: CourseId) -> Result<Option<Course>, RepositoryError> {
        let sql = format!("{COURSE_SELECT} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;
        row.map(Course::try_from).transpose()
    }

    /// Lessons in course order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>, RepositoryError> {
        let rows = sqlx::query_as::<_, LessonRow>(
            r"
            SELECT id, course_id, title, position, duration_minutes
            FROM lessons
            WHERE course_id = $1
            ORDER BY position
            ",
        )
        .bind(course_id.as_i32())
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_lesson(&self, id: LessonId) -> Result<Option<Lesson>, RepositoryError> {
        let row = sqlx::query_as::<_, LessonRow>(
            r"
            SELECT id, course_id, title, position, duration_minutes
            FROM lessons
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    /// Title of a course, for activity descriptions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the course does not exist.
    pub async fn title(&self, id: CourseId) -> Result<String, RepositoryError> {
        sqlx::query_scalar("SELECT title FROM courses WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(category: Option<&str>) -> CourseRow {
        CourseRow {
            id: 4,
            title: "โยคะเบื้องต้น".to_owned(),
            description: None,
            category: category.map(str::to_owned),
            lesson_count: 6,
        }
    }

    #[test]
    fn test_course_row_conversion() {
        let course = Course::try_from(row(Some("fitness"))).unwrap();
        assert_eq!(course.id, CourseId::new(4));
        assert_eq!(course.category, Some(PlantCategory::Fitness));
        assert_eq!(course.lesson_count, 6);

        assert!(Course::try_from(row(None)).unwrap().category.is_none());
        assert!(Course::try_from(row(Some("cardio"))).is_err());
    }
}
