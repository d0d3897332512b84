use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// One prescribed movement inside a training day. Immutable once embedded in
/// a plan; a workout session may override `weight`/`reps` transiently before
/// logging a set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    /// Working weight in kilograms.
    pub weight: f64,
    pub reps: u32,
    pub sets: u32,
    /// Rest between sets, in seconds.
    pub rest: u32,
}

/// A scheduled training day. `day_index` is unique within its week, not
/// globally; `menu` order is the prescribed exercise sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Day {
    #[serde(rename = "dayIndex")]
    pub day_index: u32,
    pub menu: Vec<Exercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Week {
    pub week: u32,
    pub days: Vec<Day>,
}

/// A complete multi-week training plan, in the exact JSON shape the
/// generative model is asked to emit and the store persists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapData {
    /// Free-text coach commentary, may be empty.
    #[serde(default)]
    pub explanation: String,
    pub total_weeks: u32,
    pub frequency_per_week: u32,
    pub roadmap: Vec<Week>,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("roadmap does not match the plan shape: {0}")]
    Shape(String),
    #[error("{field} must be a positive integer")]
    NonPositive { field: &'static str },
    #[error("week {0} appears more than once")]
    DuplicateWeek(u32),
    #[error("day {day} appears more than once in week {week}")]
    DuplicateDay { week: u32, day: u32 },
    #[error("day {day} in week {week} has no exercises")]
    EmptyDay { week: u32, day: u32 },
}

impl RoadmapData {
    /// Validate an untrusted JSON value against the plan shape.
    ///
    /// Rejects a non-sequence `roadmap`, missing or non-positive `week` /
    /// `dayIndex` / `totalWeeks` / `frequencyPerWeek`, exercises with
    /// missing or non-numeric fields, duplicate week or day numbers, and
    /// days with no exercises.
    pub fn validate(value: Value) -> Result<Self, SchemaError> {
        let plan: RoadmapData =
            serde_json::from_value(value).map_err(|e| SchemaError::Shape(e.to_string()))?;
        plan.check()?;
        Ok(plan)
    }

    fn check(&self) -> Result<(), SchemaError> {
        if self.total_weeks == 0 {
            return Err(SchemaError::NonPositive {
                field: "totalWeeks",
            });
        }
        if self.frequency_per_week == 0 {
            return Err(SchemaError::NonPositive {
                field: "frequencyPerWeek",
            });
        }

        let mut seen_weeks = HashSet::new();
        for week in &self.roadmap {
            if week.week == 0 {
                return Err(SchemaError::NonPositive { field: "week" });
            }
            if !seen_weeks.insert(week.week) {
                return Err(SchemaError::DuplicateWeek(week.week));
            }

            let mut seen_days = HashSet::new();
            for day in &week.days {
                if day.day_index == 0 {
                    return Err(SchemaError::NonPositive { field: "dayIndex" });
                }
                if !seen_days.insert(day.day_index) {
                    return Err(SchemaError::DuplicateDay {
                        week: week.week,
                        day: day.day_index,
                    });
                }
                // an exercise-less day could never be completed
                if day.menu.is_empty() {
                    return Err(SchemaError::EmptyDay {
                        week: week.week,
                        day: day.day_index,
                    });
                }
                for exercise in &day.menu {
                    if exercise.reps == 0 {
                        return Err(SchemaError::NonPositive { field: "reps" });
                    }
                    if exercise.sets == 0 {
                        return Err(SchemaError::NonPositive { field: "sets" });
                    }
                    if !exercise.weight.is_finite() || exercise.weight < 0.0 {
                        return Err(SchemaError::Shape(format!(
                            "exercise '{}' has an invalid weight",
                            exercise.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Persisted plan record. At most one row per user is active at a time;
/// `RoadmapService::activate` enforces that, not the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Roadmap {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_text: String,
    pub menu_json: Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Roadmap {
    /// Decode the stored plan. Rows are only written through
    /// `RoadmapService::activate`, which validates first, so a decode
    /// failure here means the row was corrupted out of band.
    pub fn plan(&self) -> Result<RoadmapData, SchemaError> {
        RoadmapData::validate(self.menu_json.clone())
    }
}
