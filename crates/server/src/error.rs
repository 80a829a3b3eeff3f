//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors become a JSON body
//! `{"error": "<Thai message>"}` with the matching status code. Server errors
//! are captured to Sentry and logged, and their details never reach clients.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use boostme_core::api::ErrorBody;
use boostme_core::garden::GardenError;

use crate::db::RepositoryError;
use crate::services::auth::{AuthError, MAX_NAME_LENGTH, MIN_PASSWORD_LENGTH};
use crate::services::garden::GardenServiceError;

const MSG_INTERNAL: &str = "เกิดข้อผิดพลาดภายในเซิร์ฟเวอร์";
const MSG_INVALID_INPUT: &str = "ข้อมูลไม่ถูกต้อง";
const MSG_NOT_FOUND: &str = "ไม่พบข้อมูล";
const MSG_LOGIN_REQUIRED: &str = "กรุณาเข้าสู่ระบบ";
const MSG_INVALID_CREDENTIALS: &str = "อีเมลหรือรหัสผ่านไม่ถูกต้อง";
const MSG_RATE_LIMITED: &str = "คำขอมากเกินไป กรุณาลองใหม่ภายหลัง";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Garden operation failed.
    #[error("Garden error: {0}")]
    Garden(#[from] GardenServiceError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<GardenError> for AppError {
    fn from(err: GardenError) -> Self {
        Self::Garden(GardenServiceError::Rule(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidName { .. } => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Garden(err) => match err {
                GardenServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                GardenServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                GardenServiceError::Rule(rule) => rule_status(rule),
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Message shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        if self.status().is_server_error() {
            return MSG_INTERNAL.to_string();
        }
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => MSG_INVALID_CREDENTIALS.to_string(),
                AuthError::UserNotFound => MSG_LOGIN_REQUIRED.to_string(),
                AuthError::UserAlreadyExists => "อีเมลนี้ถูกใช้งานแล้ว".to_string(),
                AuthError::WeakPassword(_) => {
                    format!("รหัสผ่านต้องมีอย่างน้อย {MIN_PASSWORD_LENGTH} ตัวอักษร")
                }
                AuthError::InvalidEmail(_) => "รูปแบบอีเมลไม่ถูกต้อง".to_string(),
                AuthError::InvalidName { .. } => {
                    format!("ชื่อต้องมีความยาว 1-{MAX_NAME_LENGTH} ตัวอักษร")
                }
                AuthError::Repository(_) | AuthError::PasswordHash => MSG_INTERNAL.to_string(),
            },
            Self::Garden(GardenServiceError::Rule(rule)) => rule_message(rule),
            Self::Garden(GardenServiceError::NotFound(_)) | Self::NotFound(_) => {
                MSG_NOT_FOUND.to_string()
            }
            Self::Unauthorized => MSG_LOGIN_REQUIRED.to_string(),
            Self::BadRequest(_) => MSG_INVALID_INPUT.to_string(),
            Self::RateLimited => MSG_RATE_LIMITED.to_string(),
            Self::Database(_) | Self::Internal(_) | Self::Garden(GardenServiceError::Repository(_)) => {
                MSG_INTERNAL.to_string()
            }
        }
    }
}

const fn rule_status(err: &GardenError) -> StatusCode {
    match err {
        GardenError::InsufficientStarSeeds { .. }
        | GardenError::LevelTooLow { .. }
        | GardenError::WateringCooldown { .. }
        | GardenError::AlreadyFullyGrown
        | GardenError::NotHarvestable
        | GardenError::PositionTaken { .. }
        | GardenError::ChallengeExpired { .. } => StatusCode::CONFLICT,
        GardenError::InvalidIncrement(_) => StatusCode::BAD_REQUEST,
        GardenError::UnknownTheme(_) => StatusCode::NOT_FOUND,
        GardenError::PlantTypeMismatch | GardenError::InvalidCatalog(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn rule_message(err: &GardenError) -> String {
    match err {
        GardenError::InsufficientStarSeeds { .. } => "Star Seeds ไม่เพียงพอ".to_string(),
        GardenError::LevelTooLow { required, .. } => format!("ต้องมีระดับสวน {required} ขึ้นไป"),
        GardenError::WateringCooldown { .. } => "ยังไม่ถึงเวลารดน้ำ".to_string(),
        GardenError::AlreadyFullyGrown => "ต้นไม้โตเต็มที่แล้ว พร้อมเก็บเกี่ยว".to_string(),
        GardenError::NotHarvestable => "ต้นไม้ยังไม่พร้อมเก็บเกี่ยว".to_string(),
        GardenError::PositionTaken { .. } => "ตำแหน่งนี้มีต้นไม้อยู่แล้ว".to_string(),
        GardenError::ChallengeExpired { .. } => "ภารกิจนี้หมดเวลาแล้ว".to_string(),
        GardenError::InvalidIncrement(_) => MSG_INVALID_INPUT.to_string(),
        GardenError::UnknownTheme(_) => MSG_NOT_FOUND.to_string(),
        GardenError::PlantTypeMismatch | GardenError::InvalidCatalog(_) => MSG_INTERNAL.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = ErrorBody {
            error: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
