//! Exercises the generation service end to end against scripted models:
//! prompt assembly, reply extraction, and the schema gate.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use ironroad::models::{Roadmap, UserProfile, WorkoutLog};
use ironroad::services::{GenerationError, GenerationService, LlmError, TextModel};
use serde_json::json;
use uuid::Uuid;

/// Always replies with the same canned text and records the prompt it saw.
struct ScriptedModel {
    reply: String,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedModel {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            last_prompt: Mutex::new(None),
        })
    }

    fn prompt(&self) -> String {
        self.last_prompt.lock().unwrap().clone().unwrap()
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        Ok(self.reply.clone())
    }
}

struct FailingModel;

#[async_trait]
impl TextModel for FailingModel {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::EmptyCompletion)
    }
}

fn profile() -> UserProfile {
    UserProfile {
        user_id: Uuid::new_v4(),
        username: "lifter".to_string(),
        gender: "male".to_string(),
        age: 28,
        height: 178.0,
        weight: 74.0,
        start_bench_press_weight: 60.0,
        start_squat_weight: 80.0,
        start_deadlift_weight: 100.0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn plan_reply() -> String {
    json!({
        "explanation": "Linear progression with a light deload in week 4.",
        "totalWeeks": 8,
        "frequencyPerWeek": 3,
        "roadmap": [
            {
                "week": 1,
                "days": [
                    {
                        "dayIndex": 1,
                        "menu": [
                            { "name": "Bench Press", "weight": 40.0, "reps": 10, "sets": 3, "rest": 90 }
                        ]
                    }
                ]
            }
        ]
    })
    .to_string()
}

fn active_roadmap(user_id: Uuid) -> Roadmap {
    Roadmap {
        id: Uuid::new_v4(),
        user_id,
        goal_text: "bench press 100kg".to_string(),
        menu_json: serde_json::from_str(&plan_reply()).unwrap(),
        is_active: true,
        created_at: Utc::now(),
    }
}

fn log(exercise: &str, weight: f64) -> WorkoutLog {
    WorkoutLog {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        roadmap_id: Uuid::new_v4(),
        exercise_name: exercise.to_string(),
        weight,
        reps: 8,
        set_index: 1,
        num_of_week: 2,
        num_of_day: 1,
        created_at: Utc.with_ymd_and_hms(2024, 6, 9, 9, 30, 0).unwrap(),
    }
}

#[tokio::test]
async fn generates_a_plan_from_a_fenced_reply() {
    let model = ScriptedModel::new(&format!("```json\n{}\n```", plan_reply()));
    let service = GenerationService::new(model.clone());

    let plan = service
        .generate_roadmap(&profile(), "bench press 100kg")
        .await
        .unwrap();

    assert_eq!(plan.total_weeks, 8);
    assert_eq!(plan.frequency_per_week, 3);
    assert_eq!(plan.roadmap[0].days[0].menu[0].name, "Bench Press");
}

#[tokio::test]
async fn initial_prompt_carries_profile_and_goal() {
    let model = ScriptedModel::new(&plan_reply());
    let service = GenerationService::new(model.clone());

    service
        .generate_roadmap(&profile(), "bench press 100kg")
        .await
        .unwrap();

    let prompt = model.prompt();
    assert!(prompt.contains("bench press 100kg"));
    assert!(prompt.contains("Height: 178cm"));
    assert!(prompt.contains("bench press 60kg"));
    assert!(prompt.contains("frequencyPerWeek"));
}

#[tokio::test]
async fn revision_prompt_carries_plan_logs_and_issue() {
    let model = ScriptedModel::new(&plan_reply());
    let service = GenerationService::new(model.clone());
    let p = profile();
    let current = active_roadmap(p.user_id);
    let logs = vec![log("Bench Press", 62.5)];

    service
        .revise_roadmap(&p, &current, &logs, "my shoulder hurts on day 2")
        .await
        .unwrap();

    let prompt = model.prompt();
    assert!(prompt.contains("bench press 100kg"));
    assert!(prompt.contains("my shoulder hurts on day 2"));
    assert!(prompt.contains("[6/9] Bench Press: 62.5kg × 8 reps (week 2 day 1)"));
}

#[tokio::test]
async fn revision_prompt_notes_missing_training_record() {
    let model = ScriptedModel::new(&plan_reply());
    let service = GenerationService::new(model.clone());
    let p = profile();
    let current = active_roadmap(p.user_id);

    service
        .revise_roadmap(&p, &current, &[], "too easy")
        .await
        .unwrap();

    assert!(model.prompt().contains("training record: none"));
}

#[tokio::test]
async fn chatty_reply_without_json_is_rejected() {
    let model = ScriptedModel::new("I would love to help, but let me explain first...");
    let service = GenerationService::new(model);

    let err = service
        .generate_roadmap(&profile(), "get stronger")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::MalformedResponse(_)));
}

#[tokio::test]
async fn well_formed_json_with_bad_schema_is_rejected() {
    let reply = json!({ "totalWeeks": 0, "frequencyPerWeek": 3, "roadmap": [] }).to_string();
    let model = ScriptedModel::new(&reply);
    let service = GenerationService::new(model);

    let err = service
        .generate_roadmap(&profile(), "get stronger")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::InvalidPlanShape(_)));
}

#[tokio::test]
async fn model_failure_propagates() {
    let service = GenerationService::new(Arc::new(FailingModel));

    let err = service
        .generate_roadmap(&profile(), "get stronger")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Model(LlmError::EmptyCompletion)));
}
