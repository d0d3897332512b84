use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{CreateWorkoutLog, Roadmap, RoadmapData, WorkoutLog};
use crate::services::progress::CompletionKey;

/// How the persisted `goal_text` of a newly activated plan is chosen.
#[derive(Debug, Clone)]
pub enum GoalSource {
    /// Store the given text as the goal.
    New(String),
    /// Revision flow: keep the currently active plan's goal. The fallback
    /// (the user's issue text) is only stored when no active plan exists.
    CarryForward { fallback: String },
}

/// The goal text to persist on a newly activated plan. A carried-forward
/// goal survives any number of revisions; the fallback only applies to
/// users whose first plan ever comes through the revision flow.
fn resolve_goal(goal: GoalSource, previous_goal: Option<String>) -> String {
    match goal {
        GoalSource::New(text) => text,
        GoalSource::CarryForward { fallback } => previous_goal.unwrap_or(fallback),
    }
}

#[derive(Clone)]
pub struct RoadmapService {
    db: PgPool,
}

impl RoadmapService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Activate a plan for a user, superseding any previous one.
    ///
    /// Deactivation of old rows and insertion of the new active row run in
    /// one transaction, so a failure part-way leaves the previously active
    /// plan in place rather than the user with no active plan.
    pub async fn activate(
        &self,
        user_id: Uuid,
        plan: &RoadmapData,
        goal: GoalSource,
    ) -> Result<Roadmap> {
        let mut tx = self.db.begin().await?;

        let previous_goal = match &goal {
            GoalSource::New(_) => None,
            GoalSource::CarryForward { .. } => sqlx::query_scalar::<_, String>(
                "SELECT goal_text FROM roadmaps WHERE user_id = $1 AND is_active = true",
            )
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?,
        };
        let goal_text = resolve_goal(goal, previous_goal);

        sqlx::query("UPDATE roadmaps SET is_active = false WHERE user_id = $1 AND is_active = true")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let roadmap = sqlx::query_as::<_, Roadmap>(
            "INSERT INTO roadmaps (id, user_id, goal_text, menu_json, is_active, created_at)
             VALUES ($1, $2, $3, $4, true, $5)
             RETURNING id, user_id, goal_text, menu_json, is_active, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&goal_text)
        .bind(serde_json::to_value(plan)?)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(user_id = %user_id, roadmap_id = %roadmap.id, "activated roadmap");
        Ok(roadmap)
    }

    pub async fn get_active(&self, user_id: Uuid) -> Result<Option<Roadmap>> {
        let roadmap = sqlx::query_as::<_, Roadmap>(
            "SELECT id, user_id, goal_text, menu_json, is_active, created_at
             FROM roadmaps
             WHERE user_id = $1 AND is_active = true",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(roadmap)
    }

    /// Completion keys for a plan: the distinct `(week, day)` pairs with at
    /// least one logged set. Repeated logs for a day collapse to one key.
    pub async fn completed_keys(
        &self,
        user_id: Uuid,
        roadmap_id: Uuid,
    ) -> Result<HashSet<CompletionKey>> {
        let rows = sqlx::query_as::<_, (i32, i32)>(
            "SELECT DISTINCT num_of_week, num_of_day
             FROM workout_log
             WHERE user_id = $1 AND roadmap_id = $2",
        )
        .bind(user_id)
        .bind(roadmap_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(week, day)| CompletionKey::new(week.max(0) as u32, day.max(0) as u32))
            .collect())
    }

    /// Most recent log entries across all plans, newest-first.
    pub async fn recent_logs(&self, user_id: Uuid, limit: i64) -> Result<Vec<WorkoutLog>> {
        let logs = sqlx::query_as::<_, WorkoutLog>(
            "SELECT id, user_id, roadmap_id, exercise_name, weight, reps, set_index,
                    num_of_week, num_of_day, created_at
             FROM workout_log
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    /// Log entries since a cutoff, newest-first. Used to summarize recent
    /// performance for the revision prompt.
    pub async fn logs_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<WorkoutLog>> {
        let logs = sqlx::query_as::<_, WorkoutLog>(
            "SELECT id, user_id, roadmap_id, exercise_name, weight, reps, set_index,
                    num_of_week, num_of_day, created_at
             FROM workout_log
             WHERE user_id = $1 AND created_at >= $2
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    /// Every log entry for one exercise, ascending by time. Feeds the 1RM
    /// series.
    pub async fn all_logs(&self, user_id: Uuid, exercise: &str) -> Result<Vec<WorkoutLog>> {
        let logs = sqlx::query_as::<_, WorkoutLog>(
            "SELECT id, user_id, roadmap_id, exercise_name, weight, reps, set_index,
                    num_of_week, num_of_day, created_at
             FROM workout_log
             WHERE user_id = $1 AND exercise_name = $2
             ORDER BY created_at ASC",
        )
        .bind(user_id)
        .bind(exercise)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    pub async fn exercise_names(&self, user_id: Uuid) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT exercise_name FROM workout_log WHERE user_id = $1 ORDER BY exercise_name",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(names)
    }

    /// Append one set. Never deduplicates: a repeated call appends a
    /// repeated row.
    pub async fn insert_log(
        &self,
        user_id: Uuid,
        roadmap_id: Uuid,
        entry: &CreateWorkoutLog,
    ) -> Result<WorkoutLog> {
        let log = sqlx::query_as::<_, WorkoutLog>(
            "INSERT INTO workout_log (id, user_id, roadmap_id, exercise_name, weight, reps,
                                      set_index, num_of_week, num_of_day, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id, user_id, roadmap_id, exercise_name, weight, reps, set_index,
                       num_of_week, num_of_day, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(roadmap_id)
        .bind(&entry.exercise_name)
        .bind(entry.weight)
        .bind(entry.reps)
        .bind(entry.set_index)
        .bind(entry.num_of_week)
        .bind(entry.num_of_day)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_goal_is_stored_verbatim() {
        let goal = GoalSource::New("bench press 100kg".to_string());
        let resolved = resolve_goal(goal, Some("old goal".to_string()));
        assert_eq!(resolved, "bench press 100kg");
    }

    #[test]
    fn carry_forward_keeps_the_previous_goal() {
        let goal = GoalSource::CarryForward {
            fallback: "my knees hurt".to_string(),
        };
        let resolved = resolve_goal(goal, Some("bench press 100kg".to_string()));
        assert_eq!(resolved, "bench press 100kg");
    }

    #[test]
    fn carry_forward_without_a_previous_plan_uses_the_fallback() {
        let goal = GoalSource::CarryForward {
            fallback: "my knees hurt".to_string(),
        };
        assert_eq!(resolve_goal(goal, None), "my knees hurt");
    }
}
