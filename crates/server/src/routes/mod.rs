//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (database ping)
//!
//! # Auth (login/register rate limited)
//! POST /api/auth/register      - Create account, start session
//! POST /api/auth/login         - Start session
//! GET  /api/auth/me            - Current user
//! POST /api/auth/logout        - End session
//!
//! # Garden (requires auth)
//! GET  /garden/my-garden                 - Garden, plants, plant catalog
//! PUT  /garden/water-garden              - Daily garden watering
//! GET  /garden/plant-types               - Plant catalog
//! POST /garden/plant/{plantTypeId}       - Plant a seed
//! PUT  /garden/plants/{id}/water         - Water one plant
//! POST /garden/plants/{id}/harvest       - Harvest a grown plant
//! GET  /garden/achievements              - Achievements with earned dates
//! GET  /garden/challenges/today          - Today's challenges
//! PUT  /garden/challenges/{id}/progress  - Report challenge progress
//! GET  /garden/activities?limit=         - Activity feed
//! GET  /garden/themes                    - Themes and ownership
//! PUT  /garden/theme                     - Select or buy a theme
//! GET  /garden/stats                     - Lifetime counters
//!
//! # Courses
//! GET  /courses                          - Course list
//! GET  /courses/{id}                     - Course detail
//! GET  /courses/{id}/lessons             - Lessons in order
//! POST /course-integration/lessons/{id}/complete - Complete a lesson (requires auth)
//! ```

pub mod auth;
pub mod courses;
pub mod garden;
pub mod health;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::{auth_rate_limiter, rate_limit_json};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(auth_rate_limiter())
        .layer(axum::middleware::map_response(rate_limit_json));

    Router::new()
        .merge(limited)
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
}

/// Create the garden routes router.
pub fn garden_routes() -> Router<AppState> {
    Router::new()
        .route("/my-garden", get(garden::my_garden))
        .route("/water-garden", put(garden::water_garden))
        .route("/plant-types", get(garden::plant_types))
        .route("/plant/{plant_type_id}", post(garden::plant))
        .route("/plants/{id}/water", put(garden::water_plant))
        .route("/plants/{id}/harvest", post(garden::harvest))
        .route("/achievements", get(garden::achievements))
        .route("/challenges/today", get(garden::challenges_today))
        .route("/challenges/{id}/progress", put(garden::progress_challenge))
        .route("/activities", get(garden::activities))
        .route("/themes", get(garden::themes))
        .route("/theme", put(garden::set_theme))
        .route("/stats", get(garden::stats))
}

/// Create the course routes router.
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list))
        .route("/{id}", get(courses::show))
        .route("/{id}/lessons", get(courses::lessons))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/auth", auth_routes())
        .nest("/garden", garden_routes())
        .nest("/courses", course_routes())
        .route(
            "/course-integration/lessons/{id}/complete",
            post(courses::complete_lesson),
        )
}
