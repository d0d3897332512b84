use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

use super::errors::ApiError;
use super::routes::AppState;
use crate::auth::CurrentUser;
use crate::services::{best_daily_1rm, DailyBest};

#[derive(Debug, Deserialize)]
pub struct OneRepMaxQuery {
    pub exercise: String,
}

pub fn records_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exercises))
        .route("/one-rep-max", get(one_rep_max_history))
}

/// Every exercise name the user has ever logged
pub async fn list_exercises(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = state.roadmaps.exercise_names(session.user_id).await?;
    Ok(Json(names))
}

/// Per-day best estimated one-rep max for a single exercise, oldest first
pub async fn one_rep_max_history(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Query(query): Query<OneRepMaxQuery>,
) -> Result<Json<Vec<DailyBest>>, ApiError> {
    let logs = state
        .roadmaps
        .all_logs(session.user_id, &query.exercise)
        .await?;

    Ok(Json(best_daily_1rm(&logs, &query.exercise)))
}
