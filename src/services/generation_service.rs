use std::sync::Arc;
use thiserror::Error;

use crate::models::{Roadmap, RoadmapData, SchemaError, UserProfile, WorkoutLog};
use crate::services::llm_client::{LlmError, TextModel};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Model(#[from] LlmError),
    #[error("model response did not contain parseable JSON: {0}")]
    MalformedResponse(String),
    #[error("model produced an invalid plan: {0}")]
    InvalidPlanShape(#[from] SchemaError),
}

/// Builds prompts for the generative model and parses its free-text replies
/// into validated plans. No retries: a failed generation is surfaced and the
/// user re-submits.
#[derive(Clone)]
pub struct GenerationService {
    model: Arc<dyn TextModel>,
}

impl GenerationService {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Generate a fresh plan from the user's body profile and stated goal.
    pub async fn generate_roadmap(
        &self,
        profile: &UserProfile,
        goal: &str,
    ) -> Result<RoadmapData, GenerationError> {
        let prompt = initial_prompt(profile, goal);
        let reply = self.model.complete(&prompt).await?;
        parse_roadmap(&reply)
    }

    /// Generate a revised plan from the active plan, recent performance, and
    /// the user's issue text. The issue is prompt material only; the stored
    /// goal is carried forward by the activation step.
    pub async fn revise_roadmap(
        &self,
        profile: &UserProfile,
        current: &Roadmap,
        recent_logs: &[WorkoutLog],
        issue: &str,
    ) -> Result<RoadmapData, GenerationError> {
        let prompt = revision_prompt(profile, current, recent_logs, issue);
        let reply = self.model.complete(&prompt).await?;
        parse_roadmap(&reply)
    }
}

const PLAN_SHAPE: &str = r#"{
  "explanation": "overall coaching commentary, around 300 words, Markdown allowed inside the string",
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
}"#;

fn profile_block(profile: &UserProfile) -> String {
    format!(
        "- Gender: {}, Age: {}\n\
         - Height: {}cm, Weight: {}kg\n\
         - Starting lifts: bench press {}kg, squat {}kg, deadlift {}kg",
        profile.gender,
        profile.age,
        profile.height,
        profile.weight,
        profile.start_bench_press_weight,
        profile.start_squat_weight,
        profile.start_deadlift_weight,
    )
}

fn initial_prompt(profile: &UserProfile, goal: &str) -> String {
    format!(
        "You are a professional strength coach. Create an 8-week strength-training \
         plan for the user below.\n\n\
         [User profile]\n{profile}\n\n\
         [Goal]\n{goal}\n\n\
         [Constraints]\n\
         - Apply progressive overload: increase loads gradually week over week.\n\
         - Choose intensities a beginner can handle without injury.\n\n\
         [Output format]\n\
         Output only JSON in exactly this shape, with no prose outside it:\n\
         {shape}\n",
        profile = profile_block(profile),
        goal = goal,
        shape = PLAN_SHAPE,
    )
}

fn revision_prompt(
    profile: &UserProfile,
    current: &Roadmap,
    recent_logs: &[WorkoutLog],
    issue: &str,
) -> String {
    format!(
        "You are a professional strength coach. Analyze the user's current plan, \
         recent performance, and reported issue, then produce an improved plan.\n\n\
         [User profile]\n{profile}\n\n\
         [Current goal]\n{goal}\n\n\
         [Current plan]\n{plan}\n\n\
         [Last two weeks of training]\n{performance}\n\n\
         [Issue reported by the user]\n{issue}\n\n\
         [Instructions]\n\
         1. Analyze the gap between the current plan and the logged performance.\n\
         2. If progress has stalled, consider a deload or a volume adjustment.\n\
         3. Address the reported issue concretely.\n\
         4. Keep the plan to at most 12 weeks.\n\n\
         [Output format]\n\
         Output only JSON in exactly this shape, with no prose or Markdown outside it:\n\
         {shape}\n",
        profile = profile_block(profile),
        goal = current.goal_text,
        plan = serde_json::to_string_pretty(&current.menu_json).unwrap_or_default(),
        performance = format_performance(recent_logs),
        issue = issue,
        shape = PLAN_SHAPE,
    )
}

/// Render recent log entries for the revision prompt, newest-first, one
/// `[M/D] name: Wkg × R reps (week W day D)` line per set.
pub fn format_performance(logs: &[WorkoutLog]) -> String {
    if logs.is_empty() {
        return "training record: none".to_string();
    }

    logs.iter()
        .map(|log| {
            format!(
                "[{}] {}: {}kg × {} reps (week {} day {})",
                log.created_at.format("%-m/%-d"),
                log.exercise_name,
                log.weight,
                log.reps,
                log.num_of_week,
                log.num_of_day,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a model reply into a validated plan.
///
/// Tolerant extraction first (strip code fences, slice from the first `{`
/// to the last `}`), then strict JSON parsing, then the schema gate. Any
/// stricter future contract only needs to change the extraction step.
pub fn parse_roadmap(reply: &str) -> Result<RoadmapData, GenerationError> {
    let cleaned = reply.replace("```json", "").replace("```", "");

    let start = cleaned.find('{');
    let end = cleaned.rfind('}');
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) if start <= end => (start, end),
        _ => {
            return Err(GenerationError::MalformedResponse(
                "no JSON object found in model reply".to_string(),
            ))
        }
    };

    let json = &cleaned[start..=end];
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    Ok(RoadmapData::validate(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    const BARE_PLAN: &str = r#"{
        "explanation": "keep it simple",
        "totalWeeks": 8,
        "frequencyPerWeek": 3,
        "roadmap": [
            { "week": 1, "days": [
                { "dayIndex": 1, "menu": [
                    { "name": "Bench Press", "weight": 40.0, "reps": 10, "sets": 3, "rest": 90 }
                ] }
            ] }
        ]
    }"#;

    #[test]
    fn fenced_reply_parses_like_bare_json() {
        let fenced = format!("```json\n{}\n```", BARE_PLAN);
        let from_fenced = parse_roadmap(&fenced).unwrap();
        let from_bare = parse_roadmap(BARE_PLAN).unwrap();
        assert_eq!(from_fenced, from_bare);
    }

    #[test]
    fn prose_around_the_object_is_sliced_away() {
        let chatty = format!("Here is your plan!\n{}\nGood luck!", BARE_PLAN);
        assert!(parse_roadmap(&chatty).is_ok());
    }

    #[test]
    fn reply_without_braces_is_malformed() {
        let err = parse_roadmap("Sorry, I cannot help with that.").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn unparseable_slice_is_malformed() {
        let err = parse_roadmap("{ this is not json }").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn valid_json_missing_roadmap_is_invalid_plan_shape() {
        let err = parse_roadmap(r#"{ "totalWeeks": 8, "frequencyPerWeek": 3 }"#).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidPlanShape(_)));
    }

    fn log_at(month: u32, day: u32) -> WorkoutLog {
        WorkoutLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            roadmap_id: Uuid::new_v4(),
            exercise_name: "Bench Press".to_string(),
            weight: 60.0,
            reps: 8,
            set_index: 1,
            num_of_week: 2,
            num_of_day: 1,
            created_at: Utc.with_ymd_and_hms(2024, month, day, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn performance_lines_render_newest_first_without_zero_padding() {
        let logs = vec![log_at(6, 9), log_at(6, 7)];
        let summary = format_performance(&logs);
        assert_eq!(
            summary,
            "[6/9] Bench Press: 60kg × 8 reps (week 2 day 1)\n\
             [6/7] Bench Press: 60kg × 8 reps (week 2 day 1)"
        );
    }

    #[test]
    fn empty_performance_has_a_placeholder() {
        assert_eq!(format_performance(&[]), "training record: none");
    }
}
