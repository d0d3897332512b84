use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};

use super::errors::ApiError;
use super::routes::AppState;
use crate::auth::CurrentUser;
use crate::models::{UpsertProfileRequest, UserProfile};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(upsert_profile))
}

/// Body metrics for the authenticated user
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state
        .profiles
        .get(session.user_id)
        .await?
        .ok_or(ApiError::ProfileMissing)?;

    Ok(Json(profile))
}

/// Create or replace the body-metrics row
pub async fn upsert_profile(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(request): Json<UpsertProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state.profiles.upsert(session.user_id, request).await?;
    Ok(Json(profile))
}
