use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One logged set. Append-only; rows are never revised or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub roadmap_id: Uuid,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i32,
    /// 1-based, per exercise per day.
    pub set_index: i32,
    pub num_of_week: i32,
    pub num_of_day: i32,
    pub created_at: DateTime<Utc>,
}

/// Payload for one set, as emitted by the workout session. The caller
/// supplies the user and roadmap ids when persisting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateWorkoutLog {
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i32,
    pub set_index: i32,
    pub num_of_week: i32,
    pub num_of_day: i32,
}
