//! Account routes.
//!
//! Register and login both start a session. The session cookie is the only
//! credential the API accepts.

use axum::{Json, extract::State, http::StatusCode};
use tower_sessions::Session;

use boostme_core::api::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::extract::ApiJson;
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::User;
use crate::state::AppState;

/// Create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let user = state
        .auth()
        .register(&req.name, &req.email, &req.password)
        .await?;

    start_session(&session, &user).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse { user: user.into() }),
    ))
}

/// Log in with email and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = match state.auth().login(&req.email, &req.password).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            return Err(e.into());
        }
    };

    start_session(&session, &user).await?;

    Ok(Json(AuthResponse { user: user.into() }))
}

/// The logged-in user.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<AuthResponse>> {
    let user = state.auth().get_user(current.id).await?;
    Ok(Json(AuthResponse { user: user.into() }))
}

/// End the session. Succeeds even without one.
pub async fn logout(session: Session) -> Result<Json<LogoutResponse>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    clear_sentry_user();

    Ok(Json(LogoutResponse { success: true }))
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    set_current_user(session, &user.current_user())
        .await
        .map_err(|e| AppError::Internal(format!("failed to set session: {e}")))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}
