// Domain logic and store access

pub mod generation_service;
pub mod llm_client;
pub mod one_rep_max;
pub mod profile_service;
pub mod progress;
pub mod roadmap_service;
pub mod workout_session;

pub use generation_service::{GenerationError, GenerationService};
pub use llm_client::{GeminiClient, LlmError, TextModel};
pub use one_rep_max::{best_daily_1rm, estimate_1rm, DailyBest};
pub use profile_service::ProfileService;
pub use progress::{compute_progress, next_incomplete_day, CompletionKey, NextWorkout, Progress};
pub use roadmap_service::{GoalSource, RoadmapService};
pub use workout_session::{Direction, Phase, SessionError, WorkoutSession};
