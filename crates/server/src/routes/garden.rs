//! Garden routes. Every route requires a session.

use axum::{Json, body::Bytes, extract::State};

use boostme_core::api::{
    ActivitiesQuery, ChallengeProgressRequest, ChallengeProgressResponse, HarvestResponse,
    MyGardenResponse, PlantRequest, PlantResponse, SetThemeRequest, SetThemeResponse,
    WaterGardenResponse, WaterPlantResponse,
};
use boostme_core::garden::{
    AchievementView, DailyChallenge, GardenActivity, GardenStats, PlantType, ThemeView,
};
use boostme_core::{ChallengeId, PlantId, PlantTypeId};

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::RequireAuth;
use crate::state::AppState;

pub async fn my_garden(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<MyGardenResponse>> {
    Ok(Json(state.garden().my_garden(user.id).await?))
}

pub async fn plant_types(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<PlantType>>> {
    Ok(Json(state.garden().plant_types().await?))
}

/// Plant a seed. The body is optional; an empty body plants without a
/// position.
pub async fn plant(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(plant_type_id): ApiPath<PlantTypeId>,
    body: Bytes,
) -> Result<Json<PlantResponse>> {
    let req = parse_plant_request(&body)?;
    let response = state
        .garden()
        .plant(user.id, plant_type_id, req.position)
        .await?;
    Ok(Json(response))
}

pub async fn water_plant(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(plant_id): ApiPath<PlantId>,
) -> Result<Json<WaterPlantResponse>> {
    Ok(Json(state.garden().water_plant(user.id, plant_id).await?))
}

pub async fn water_garden(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<WaterGardenResponse>> {
    Ok(Json(state.garden().water_garden(user.id).await?))
}

pub async fn harvest(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(plant_id): ApiPath<PlantId>,
) -> Result<Json<HarvestResponse>> {
    Ok(Json(state.garden().harvest(user.id, plant_id).await?))
}

pub async fn achievements(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<AchievementView>>> {
    Ok(Json(state.garden().achievements(user.id).await?))
}

pub async fn challenges_today(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<DailyChallenge>>> {
    Ok(Json(state.garden().challenges_today(user.id).await?))
}

pub async fn progress_challenge(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(challenge_id): ApiPath<ChallengeId>,
    ApiJson(req): ApiJson<ChallengeProgressRequest>,
) -> Result<Json<ChallengeProgressResponse>> {
    let response = state
        .garden()
        .progress_challenge(user.id, challenge_id, req.increment)
        .await?;
    Ok(Json(response))
}

pub async fn activities(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiQuery(query): ApiQuery<ActivitiesQuery>,
) -> Result<Json<Vec<GardenActivity>>> {
    Ok(Json(state.garden().activities(user.id, query.limit).await?))
}

pub async fn themes(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<ThemeView>>> {
    Ok(Json(state.garden().themes(user.id).await?))
}

pub async fn set_theme(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<SetThemeRequest>,
) -> Result<Json<SetThemeResponse>> {
    Ok(Json(state.garden().set_theme(user.id, &req.theme).await?))
}

pub async fn stats(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<GardenStats>> {
    Ok(Json(state.garden().stats(user.id).await?))
}

fn parse_plant_request(body: &[u8]) -> Result<PlantRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PlantRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boostme_core::garden::Position;

    use super::*;

    #[test]
    fn test_parse_plant_request() {
        assert!(parse_plant_request(b"").unwrap().position.is_none());
        assert!(parse_plant_request(b"  \n").unwrap().position.is_none());
        assert!(parse_plant_request(b"{}").unwrap().position.is_none());
        assert_eq!(
            parse_plant_request(br#"{"position":{"x":2,"y":3}}"#)
                .unwrap()
                .position,
            Some(Position { x: 2, y: 3 })
        );
        assert!(matches!(
            parse_plant_request(b"{\"position\":"),
            Err(AppError::BadRequest(_))
        ));
    }
}
