use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::WorkoutLog;

/// Estimated one-rep max from a logged set, Epley formula.
///
/// A single rep at a given weight is the max by definition, so `reps == 1`
/// returns the weight exactly instead of going through the formula; the
/// general branch rounds to one decimal, half away from zero.
pub fn estimate_1rm(weight: f64, reps: u32) -> f64 {
    if reps == 1 {
        return weight;
    }
    (weight * (1.0 + reps as f64 / 30.0) * 10.0).round() / 10.0
}

/// One chart point: the best estimated 1RM logged on a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBest {
    pub date: NaiveDate,
    pub best_1rm: f64,
}

/// Best estimated 1RM per day for one exercise, ascending by date. Days with
/// no matching sets produce no point.
pub fn best_daily_1rm(logs: &[WorkoutLog], exercise: &str) -> Vec<DailyBest> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for log in logs.iter().filter(|l| l.exercise_name == exercise) {
        let estimated = estimate_1rm(log.weight, log.reps.max(0) as u32);
        let date = log.created_at.date_naive();
        let best = by_date.entry(date).or_insert(estimated);
        if estimated > *best {
            *best = estimated;
        }
    }

    by_date
        .into_iter()
        .map(|(date, best_1rm)| DailyBest { date, best_1rm })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    #[test]
    fn single_rep_is_the_max_itself() {
        assert_eq!(estimate_1rm(0.0, 1), 0.0);
        assert_eq!(estimate_1rm(62.5, 1), 62.5);
        assert_eq!(estimate_1rm(180.0, 1), 180.0);
    }

    #[test]
    fn epley_rounds_to_one_decimal() {
        assert_eq!(estimate_1rm(100.0, 10), 133.3);
        assert_eq!(estimate_1rm(60.0, 8), 76.0);
        assert_eq!(estimate_1rm(42.5, 5), 49.6);
    }

    fn log(exercise: &str, weight: f64, reps: i32, day: u32) -> WorkoutLog {
        WorkoutLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            roadmap_id: Uuid::new_v4(),
            exercise_name: exercise.to_string(),
            weight,
            reps,
            set_index: 1,
            num_of_week: 1,
            num_of_day: 1,
            created_at: Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn keeps_the_daily_maximum_per_exercise() {
        let logs = vec![
            log("Bench Press", 60.0, 8, 3),
            log("Bench Press", 65.0, 5, 3),
            log("Squat", 100.0, 5, 3),
            log("Bench Press", 60.0, 10, 5),
        ];

        let series = best_daily_1rm(&logs, "Bench Press");
        assert_eq!(series.len(), 2);
        // 65kg x5 beats 60kg x8 on the same day
        assert_eq!(series[0].best_1rm, estimate_1rm(65.0, 5));
        assert_eq!(series[1].best_1rm, estimate_1rm(60.0, 10));
        assert!(series[0].date < series[1].date);
    }

    #[test]
    fn unknown_exercise_yields_empty_series() {
        let logs = vec![log("Squat", 100.0, 5, 3)];
        assert!(best_daily_1rm(&logs, "Deadlift").is_empty());
    }
}
