use thiserror::Error;

use crate::models::{CreateWorkoutLog, Exercise, WorkoutLog};
use crate::services::progress::NextWorkout;

/// Where the session currently stands within the day's exercise list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready to lift the current set.
    InProgress,
    /// Counting down between sets; `tick()` once per second.
    Resting { seconds_left: u32 },
    /// Every prescribed set of every exercise has been logged; terminal.
    AllExercisesDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("the scheduled day has no exercises")]
    EmptyMenu,
    #[error("all exercises for this day are already done")]
    DayComplete,
}

/// One user's pass through a single scheduled day.
///
/// Owned by the caller and mutated only through these operations; nothing
/// here touches the store. `complete_set` emits the log entry to persist,
/// and day-level completion is decided by the progress calculator's key
/// membership, never by this struct's local counters.
#[derive(Debug, Clone)]
pub struct WorkoutSession {
    week: u32,
    day: u32,
    exercises: Vec<Exercise>,
    current: usize,
    completed_sets: Vec<u32>,
    /// Working overrides, reseeded from the prescription on every exercise
    /// change and discarded when navigating away.
    weight: f64,
    reps: u32,
    phase: Phase,
    /// Newest-first slice of recent log entries for "previous record" lookups.
    recent_logs: Vec<WorkoutLog>,
}

impl WorkoutSession {
    /// Begin a session for the next incomplete day. `recent_logs` must be
    /// ordered newest-first.
    pub fn start(next: NextWorkout, recent_logs: Vec<WorkoutLog>) -> Result<Self, SessionError> {
        let first = next.exercises.first().ok_or(SessionError::EmptyMenu)?;
        let weight = first.weight;
        let reps = first.reps;
        let count = next.exercises.len();

        Ok(Self {
            week: next.week,
            day: next.day,
            exercises: next.exercises,
            current: 0,
            completed_sets: vec![0; count],
            weight,
            reps,
            phase: Phase::InProgress,
            recent_logs,
        })
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_exercise(&self) -> &Exercise {
        &self.exercises[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn working_weight(&self) -> f64 {
        self.weight
    }

    pub fn working_reps(&self) -> u32 {
        self.reps
    }

    pub fn completed_sets(&self) -> u32 {
        self.completed_sets[self.current]
    }

    /// Most recent log entry for an exercise name, across any plan or day.
    pub fn previous_record(&self, exercise_name: &str) -> Option<&WorkoutLog> {
        self.recent_logs
            .iter()
            .find(|log| log.exercise_name == exercise_name)
    }

    /// Any delta is accepted; the UI steps by 2.5 but that is not enforced
    /// here. Clamped at zero.
    pub fn adjust_weight(&mut self, delta: f64) {
        self.weight = (self.weight + delta).max(0.0);
    }

    /// Clamped at one rep.
    pub fn adjust_reps(&mut self, delta: i32) {
        let adjusted = i64::from(self.reps) + i64::from(delta);
        self.reps = adjusted.max(1) as u32;
    }

    /// Log the current set. Cancels a running rest countdown, then either
    /// rests before the next set, advances to the next exercise, or ends the
    /// day. No deduplication: calling twice logs two entries.
    pub fn complete_set(&mut self) -> Result<CreateWorkoutLog, SessionError> {
        if self.phase == Phase::AllExercisesDone {
            return Err(SessionError::DayComplete);
        }

        let exercise = &self.exercises[self.current];
        self.completed_sets[self.current] += 1;

        let entry = CreateWorkoutLog {
            exercise_name: exercise.name.clone(),
            weight: self.weight,
            reps: self.reps as i32,
            set_index: self.completed_sets[self.current] as i32,
            num_of_week: self.week as i32,
            num_of_day: self.day as i32,
        };

        if self.completed_sets[self.current] < exercise.sets {
            // a zero-second prescription skips the rest phase entirely
            self.phase = if exercise.rest > 0 {
                Phase::Resting {
                    seconds_left: exercise.rest,
                }
            } else {
                Phase::InProgress
            };
        } else if self.current + 1 < self.exercises.len() {
            self.current += 1;
            self.seed_from_prescription();
            self.phase = Phase::InProgress;
        } else {
            self.phase = Phase::AllExercisesDone;
        }

        Ok(entry)
    }

    /// Advance the rest countdown by one second. No-op outside `Resting`.
    pub fn tick(&mut self) {
        if let Phase::Resting { seconds_left } = self.phase {
            if seconds_left <= 1 {
                self.phase = Phase::InProgress;
            } else {
                self.phase = Phase::Resting {
                    seconds_left: seconds_left - 1,
                };
            }
        }
    }

    /// Move between exercises. Always cancels an active rest countdown;
    /// the index clamps at the list bounds, and working weight/reps reseed
    /// from the target's prescription, discarding unlogged adjustments.
    pub fn navigate(&mut self, direction: Direction) {
        if self.phase == Phase::AllExercisesDone {
            return;
        }

        let target = match direction {
            Direction::Prev => self.current.saturating_sub(1),
            Direction::Next => (self.current + 1).min(self.exercises.len() - 1),
        };

        if target != self.current {
            self.current = target;
            self.seed_from_prescription();
        }
        self.phase = Phase::InProgress;
    }

    fn seed_from_prescription(&mut self) {
        let exercise = &self.exercises[self.current];
        self.weight = exercise.weight;
        self.reps = exercise.reps;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn exercise(name: &str, weight: f64, reps: u32, sets: u32, rest: u32) -> Exercise {
        Exercise {
            name: name.to_string(),
            weight,
            reps,
            sets,
            rest,
        }
    }

    fn session(exercises: Vec<Exercise>) -> WorkoutSession {
        WorkoutSession::start(
            NextWorkout {
                week: 2,
                day: 1,
                exercises,
            },
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn starts_on_first_exercise_with_prescribed_values() {
        let s = session(vec![
            exercise("Bench Press", 60.0, 8, 3, 90),
            exercise("Squat", 80.0, 5, 3, 120),
        ]);
        assert_eq!(s.current_exercise().name, "Bench Press");
        assert_eq!(s.working_weight(), 60.0);
        assert_eq!(s.working_reps(), 8);
        assert_eq!(s.phase(), Phase::InProgress);
    }

    #[test]
    fn empty_menu_is_rejected() {
        let result = WorkoutSession::start(
            NextWorkout {
                week: 1,
                day: 1,
                exercises: vec![],
            },
            vec![],
        );
        assert!(matches!(result, Err(SessionError::EmptyMenu)));
    }

    #[test]
    fn weight_clamps_at_zero_and_reps_at_one() {
        let mut s = session(vec![exercise("Bench Press", 2.5, 8, 3, 90)]);
        s.adjust_weight(-10.0);
        assert_eq!(s.working_weight(), 0.0);
        s.adjust_weight(1.25);
        assert_eq!(s.working_weight(), 1.25);

        s.adjust_reps(-20);
        assert_eq!(s.working_reps(), 1);
        s.adjust_reps(4);
        assert_eq!(s.working_reps(), 5);
    }

    #[test]
    fn complete_set_emits_log_with_one_based_set_index() {
        let mut s = session(vec![exercise("Bench Press", 60.0, 8, 3, 90)]);
        s.adjust_weight(2.5);

        let entry = s.complete_set().unwrap();
        assert_eq!(entry.exercise_name, "Bench Press");
        assert_eq!(entry.weight, 62.5);
        assert_eq!(entry.set_index, 1);
        assert_eq!(entry.num_of_week, 2);
        assert_eq!(entry.num_of_day, 1);

        s.tick();
        let entry = s.complete_set().unwrap();
        assert_eq!(entry.set_index, 2);
    }

    #[test]
    fn rests_between_sets_and_counts_down_to_lifting() {
        let mut s = session(vec![exercise("Bench Press", 60.0, 8, 2, 3)]);
        s.complete_set().unwrap();
        assert_eq!(s.phase(), Phase::Resting { seconds_left: 3 });

        s.tick();
        assert_eq!(s.phase(), Phase::Resting { seconds_left: 2 });
        s.tick();
        s.tick();
        assert_eq!(s.phase(), Phase::InProgress);

        // ticking while lifting changes nothing
        s.tick();
        assert_eq!(s.phase(), Phase::InProgress);
    }

    #[test]
    fn full_day_rests_sets_minus_one_times_per_exercise() {
        let mut s = session(vec![
            exercise("Bench Press", 60.0, 8, 3, 90),
            exercise("Squat", 80.0, 5, 2, 120),
        ]);

        let mut rests = 0;
        for _ in 0..3 {
            s.complete_set().unwrap();
            if matches!(s.phase(), Phase::Resting { .. }) {
                rests += 1;
            }
        }
        assert_eq!(rests, 2);
        // advanced to the squat with reseeded working values
        assert_eq!(s.current_exercise().name, "Squat");
        assert_eq!(s.working_weight(), 80.0);
        assert_eq!(s.working_reps(), 5);
        assert_eq!(s.phase(), Phase::InProgress);

        s.complete_set().unwrap();
        assert!(matches!(s.phase(), Phase::Resting { .. }));
        let last = s.complete_set().unwrap();
        assert_eq!(last.set_index, 2);
        assert_eq!(s.phase(), Phase::AllExercisesDone);

        assert!(matches!(s.complete_set(), Err(SessionError::DayComplete)));
    }

    #[test]
    fn zero_rest_prescription_never_enters_resting() {
        let mut s = session(vec![exercise("Bench Press", 60.0, 8, 3, 0)]);
        s.complete_set().unwrap();
        assert_eq!(s.phase(), Phase::InProgress);
        s.complete_set().unwrap();
        assert_eq!(s.phase(), Phase::InProgress);
        s.complete_set().unwrap();
        assert_eq!(s.phase(), Phase::AllExercisesDone);
    }

    #[test]
    fn completing_a_set_early_cancels_the_rest() {
        let mut s = session(vec![exercise("Bench Press", 60.0, 8, 3, 90)]);
        s.complete_set().unwrap();
        assert!(matches!(s.phase(), Phase::Resting { .. }));

        // logging the next set without waiting out the countdown is allowed
        let entry = s.complete_set().unwrap();
        assert_eq!(entry.set_index, 2);
    }

    #[test]
    fn navigation_cancels_rest_and_discards_adjustments() {
        let mut s = session(vec![
            exercise("Bench Press", 60.0, 8, 3, 90),
            exercise("Squat", 80.0, 5, 3, 120),
        ]);
        s.adjust_weight(5.0);
        s.complete_set().unwrap();
        assert!(matches!(s.phase(), Phase::Resting { .. }));

        s.navigate(Direction::Next);
        assert_eq!(s.phase(), Phase::InProgress);
        assert_eq!(s.current_exercise().name, "Squat");
        assert_eq!(s.working_weight(), 80.0);

        // back to the bench: prescription, not the abandoned 65.0
        s.navigate(Direction::Prev);
        assert_eq!(s.working_weight(), 60.0);

        // clamped at the boundary
        s.navigate(Direction::Prev);
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn previous_record_finds_most_recent_occurrence() {
        let mk = |name: &str, weight: f64| WorkoutLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            roadmap_id: Uuid::new_v4(),
            exercise_name: name.to_string(),
            weight,
            reps: 8,
            set_index: 1,
            num_of_week: 1,
            num_of_day: 1,
            created_at: Utc::now(),
        };
        // newest-first slice
        let logs = vec![mk("Squat", 82.5), mk("Bench Press", 62.5), mk("Bench Press", 60.0)];
        let s = WorkoutSession::start(
            NextWorkout {
                week: 1,
                day: 2,
                exercises: vec![exercise("Bench Press", 60.0, 8, 3, 90)],
            },
            logs,
        )
        .unwrap();

        assert_eq!(s.previous_record("Bench Press").unwrap().weight, 62.5);
        assert!(s.previous_record("Deadlift").is_none());
    }
}
