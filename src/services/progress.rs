use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::models::{Exercise, RoadmapData};

/// Identifies one scheduled day of a plan. Two log entries with the same key
/// are the same completed day, however many sets were actually logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompletionKey {
    pub week: u32,
    pub day: u32,
}

impl CompletionKey {
    pub fn new(week: u32, day: u32) -> Self {
        Self { week, day }
    }
}

impl fmt::Display for CompletionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.week, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed_days: usize,
    pub total_days: usize,
    /// Rounded to the nearest integer, half away from zero, clamped to 100.
    pub percentage: u32,
}

/// The earliest not-yet-logged day in plan order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextWorkout {
    pub week: u32,
    pub day: u32,
    pub exercises: Vec<Exercise>,
}

/// Progress against a plan. The denominator is the prescribed
/// `total_weeks * frequency_per_week`, not the number of days the roadmap
/// actually enumerates.
pub fn compute_progress(plan: &RoadmapData, completed: &HashSet<CompletionKey>) -> Progress {
    let total_days = plan.total_weeks as usize * plan.frequency_per_week as usize;
    let completed_days = completed.len();

    let percentage = if total_days == 0 {
        0
    } else {
        let pct = (completed_days as f64 / total_days as f64 * 100.0).round();
        (pct as u32).min(100)
    };

    Progress {
        completed_days,
        total_days,
        percentage,
    }
}

/// Scan weeks in ascending week order, days in array order, and return the
/// first day whose completion key is absent. `None` means every scheduled
/// day has been logged at least once.
pub fn next_incomplete_day(
    plan: &RoadmapData,
    completed: &HashSet<CompletionKey>,
) -> Option<NextWorkout> {
    let mut weeks: Vec<&crate::models::Week> = plan.roadmap.iter().collect();
    weeks.sort_by_key(|w| w.week);

    for week in weeks {
        for day in &week.days {
            let key = CompletionKey::new(week.week, day.day_index);
            if !completed.contains(&key) {
                return Some(NextWorkout {
                    week: week.week,
                    day: day.day_index,
                    exercises: day.menu.clone(),
                });
            }
        }
    }

    None
}
