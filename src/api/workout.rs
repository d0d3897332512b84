use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use super::errors::ApiError;
use super::routes::AppState;
use crate::auth::CurrentUser;
use crate::models::{CreateWorkoutLog, Exercise, WorkoutLog};
use crate::services::{next_incomplete_day, WorkoutSession};

/// Last logged set for an exercise, shown as a reference next to today's
/// prescription.
#[derive(Debug, Serialize)]
pub struct PreviousRecord {
    pub weight: f64,
    pub reps: i32,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TodayWorkoutResponse {
    AllComplete {
        all_complete: bool,
    },
    Scheduled {
        week: u32,
        day: u32,
        exercises: Vec<Exercise>,
        previous_records: Vec<Option<PreviousRecord>>,
    },
}

#[derive(Debug, Deserialize)]
pub struct LogSetRequest {
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i32,
    pub set_index: i32,
    pub num_of_week: i32,
    pub num_of_day: i32,
}

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/today", get(today_workout))
        .route("/sets", post(log_set))
}

/// The earliest incomplete day of the active plan, with previous records for
/// each exercise on the menu.
pub async fn today_workout(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<TodayWorkoutResponse>, ApiError> {
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

    let Some(next) = next_incomplete_day(&plan, &completed) else {
        return Ok(Json(TodayWorkoutResponse::AllComplete { all_complete: true }));
    };

    let recent_logs = state.roadmaps.recent_logs(session.user_id, 50).await?;
    let workout = WorkoutSession::start(next, recent_logs)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;

    let previous_records = workout
        .exercises()
        .iter()
        .map(|exercise| {
            workout.previous_record(&exercise.name).map(|log| PreviousRecord {
                weight: log.weight,
                reps: log.reps,
            })
        })
        .collect();

    Ok(Json(TodayWorkoutResponse::Scheduled {
        week: workout.week(),
        day: workout.day(),
        exercises: workout.exercises().to_vec(),
        previous_records,
    }))
}

/// Record one completed set against the active plan. Every set is appended;
/// re-doing a set produces a second row rather than overwriting the first.
pub async fn log_set(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(request): Json<LogSetRequest>,
) -> Result<Json<WorkoutLog>, ApiError> {
    let roadmap = state
        .roadmaps
        .get_active(session.user_id)
        .await?
        .ok_or(ApiError::NoActivePlan)?;

    let log = state
        .roadmaps
        .insert_log(
            session.user_id,
            roadmap.id,
            &CreateWorkoutLog {
                exercise_name: request.exercise_name,
                weight: request.weight,
                reps: request.reps,
                set_index: request.set_index,
                num_of_week: request.num_of_week,
                num_of_day: request.num_of_day,
            },
        )
        .await?;

    Ok(Json(log))
}
