use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ApiError;
use super::routes::AppState;
use crate::auth::CurrentUser;
use crate::models::{Roadmap, RoadmapData};
use crate::services::{compute_progress, GoalSource, Progress};

#[derive(Debug, Deserialize)]
pub struct GenerateRoadmapRequest {
    pub goal: String,
}

#[derive(Debug, Deserialize)]
pub struct FixRoadmapRequest {
    pub issue: String,
}

/// Persist a previewed plan. `goal` present means a fresh plan; absent means
/// the revision flow, where the original goal is carried forward and `issue`
/// is only the fallback for users with no active plan.
#[derive(Debug, Deserialize)]
pub struct ConfirmRoadmapRequest {
    pub goal: Option<String>,
    pub issue: Option<String>,
    pub plan: Value,
}

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    pub success: bool,
    pub data: RoadmapData,
}

pub fn roadmap_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(generate_roadmap))
        .route("/fix", post(fix_roadmap))
        .route("/confirm", post(confirm_roadmap))
        .route("/active", get(active_roadmap))
        .route("/progress", get(roadmap_progress))
}

/// Generate a plan preview from the user's goal. Nothing is persisted; the
/// client confirms separately.
pub async fn generate_roadmap(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(request): Json<GenerateRoadmapRequest>,
) -> Result<Json<RoadmapResponse>, ApiError> {
    let profile = state
        .profiles
        .get(session.user_id)
        .await?
        .ok_or(ApiError::ProfileMissing)?;

    let plan = state
        .generation
        .generate_roadmap(&profile, &request.goal)
        .await
        .map_err(|e| {
            tracing::error!("roadmap generation failed: {e}");
            ApiError::from(e)
        })?;

    Ok(Json(RoadmapResponse {
        success: true,
        data: plan,
    }))
}

/// Generate a revised plan preview from the active plan, the last two weeks
/// of logs, and the user's reported issue.
pub async fn fix_roadmap(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(request): Json<FixRoadmapRequest>,
) -> Result<Json<RoadmapResponse>, ApiError> {
    let profile = state
        .profiles
        .get(session.user_id)
        .await?
        .ok_or(ApiError::ProfileMissing)?;

    let current = state
        .roadmaps
        .get_active(session.user_id)
        .await?
        .ok_or(ApiError::NoActivePlan)?;

    let since = Utc::now() - Duration::days(14);
    let recent_logs = state.roadmaps.logs_since(session.user_id, since).await?;

    let plan = state
        .generation
        .revise_roadmap(&profile, &current, &recent_logs, &request.issue)
        .await
        .map_err(|e| {
            tracing::error!("roadmap revision failed: {e}");
            ApiError::from(e)
        })?;

    Ok(Json(RoadmapResponse {
        success: true,
        data: plan,
    }))
}

/// Activate a confirmed plan, superseding the previous one.
pub async fn confirm_roadmap(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(request): Json<ConfirmRoadmapRequest>,
) -> Result<Json<Roadmap>, ApiError> {
    let plan = RoadmapData::validate(request.plan)?;

    let goal = match request.goal {
        Some(goal) => GoalSource::New(goal),
        None => GoalSource::CarryForward {
            fallback: request.issue.unwrap_or_default(),
        },
    };

    let roadmap = state.roadmaps.activate(session.user_id, &plan, goal).await?;
    Ok(Json(roadmap))
}

pub async fn active_roadmap(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<Roadmap>, ApiError> {
    let roadmap = state
        .roadmaps
        .get_active(session.user_id)
        .await?
        .ok_or(ApiError::NoActivePlan)?;

    Ok(Json(roadmap))
}

pub async fn roadmap_progress(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<Progress>, ApiError> {
    let roadmap = state
        .roadmaps
        .get_active(session.user_id)
        .await?
        .ok_or(ApiError::NoActivePlan)?;

    let plan = roadmap
        .plan()
        .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;
    let completed = state
        .roadmaps
        .completed_keys(session.user_id, roadmap.id)
        .await?;

    Ok(Json(compute_progress(&plan, &completed)))
}
