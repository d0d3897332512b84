use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Body metrics and starting lifts, collected once after sign-up. The
/// generation prompts are built from this row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub username: String,
    pub gender: String,
    pub age: i32,
    /// Centimeters.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    pub start_bench_press_weight: f64,
    pub start_squat_weight: f64,
    pub start_deadlift_weight: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertProfileRequest {
    pub username: String,
    pub gender: String,
    pub age: i32,
    pub height: f64,
    pub weight: f64,
    pub start_bench_press_weight: f64,
    pub start_squat_weight: f64,
    pub start_deadlift_weight: f64,
}
