use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{UpsertProfileRequest, UserProfile};

#[derive(Clone)]
pub struct ProfileService {
    db: PgPool,
}

impl ProfileService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT user_id, username, gender, age, height, weight,
                    start_bench_press_weight, start_squat_weight, start_deadlift_weight,
                    created_at, updated_at
             FROM user_profiles
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(profile)
    }

    pub async fn upsert(
        &self,
        user_id: Uuid,
        request: UpsertProfileRequest,
    ) -> Result<UserProfile> {
        let now = Utc::now();
        let profile = sqlx::query_as::<_, UserProfile>(
            "INSERT INTO user_profiles (user_id, username, gender, age, height, weight,
                                        start_bench_press_weight, start_squat_weight,
                                        start_deadlift_weight, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
             ON CONFLICT (user_id) DO UPDATE SET
                 username = EXCLUDED.username,
                 gender = EXCLUDED.gender,
                 age = EXCLUDED.age,
                 height = EXCLUDED.height,
                 weight = EXCLUDED.weight,
                 start_bench_press_weight = EXCLUDED.start_bench_press_weight,
                 start_squat_weight = EXCLUDED.start_squat_weight,
                 start_deadlift_weight = EXCLUDED.start_deadlift_weight,
                 updated_at = EXCLUDED.updated_at
             RETURNING user_id, username, gender, age, height, weight,
                       start_bench_press_weight, start_squat_weight, start_deadlift_weight,
                       created_at, updated_at",
        )
        .bind(user_id)
        .bind(&request.username)
        .bind(&request.gender)
        .bind(request.age)
        .bind(request.height)
        .bind(request.weight)
        .bind(request.start_bench_press_weight)
        .bind(request.start_squat_weight)
        .bind(request.start_deadlift_weight)
        .bind(now)
        .fetch_one(&self.db)
        .await?;

        Ok(profile)
    }
}
