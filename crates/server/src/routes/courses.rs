//! Course catalog and lesson completion.

use axum::{Json, extract::State};

use boostme_core::api::{Course, Lesson, LessonCompleteResponse};
use boostme_core::{CourseId, LessonId};

use crate::db::CourseRepository;
use crate::error::{AppError, Result};
use crate::extract::ApiPath;
use crate::middleware::RequireAuth;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Course>>> {
    Ok(Json(CourseRepository::new(state.pool()).list().await?))
}

pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CourseId>,
) -> Result<Json<Course>> {
    CourseRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("course {id}")))
}

pub async fn lessons(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CourseId>,
) -> Result<Json<Vec<Lesson>>> {
    let courses = CourseRepository::new(state.pool());
    if courses.get(id).await?.is_none() {
        return Err(AppError::NotFound(format!("course {id}")));
    }
    Ok(Json(courses.lessons(id).await?))
}

/// Award the lesson reward, plus the course bonus on the last lesson.
pub async fn complete_lesson(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<LessonId>,
) -> Result<Json<LessonCompleteResponse>> {
    Ok(Json(state.garden().complete_lesson(user.id, id).await?))
}
