// Aggregated workout statistics and their display text

use serde::{Deserialize, Serialize};

use crate::exercise::ExerciseKind;

/// Snapshot of session progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStats {
    pub exercise: Option<ExerciseKind>,
    /// Sets finished so far
    pub sets_completed: u32,
    pub target_sets: u32,
    /// Reps in the set currently in progress
    pub reps_in_set: u32,
    pub target_reps: u32,
    /// All reps across finished sets plus the current one
    pub total_reps: u32,
    /// Estimated calories burned
    pub calories: f32,
    /// Time since the first active tick
    pub elapsed_ms: u64,
}

impl WorkoutStats {
    /// Calorie estimate: `calories_per_rep × (reps_in_set + sets_completed × target_reps)`
    pub fn estimate_calories(
        calories_per_rep: f32,
        reps_in_set: u32,
        sets_completed: u32,
        target_reps: u32,
    ) -> f32 {
        calories_per_rep * total_reps(reps_in_set, sets_completed, target_reps) as f32
    }

    /// Multi-line stats panel text
    pub fn stats_text(&self) -> String {
        format!(
            "Sets: {}/{}\nReps: {}/{}\nCalories: {:.2}",
            self.sets_completed, self.target_sets, self.reps_in_set, self.target_reps, self.calories
        )
    }

    /// Elapsed time as `mm:ss`
    pub fn elapsed_text(&self) -> String {
        let total_seconds = self.elapsed_ms / 1000;
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }
}

/// Reps across finished sets plus the set in progress
pub(crate) fn total_reps(reps_in_set: u32, sets_completed: u32, target_reps: u32) -> u32 {
    reps_in_set + sets_completed * target_reps
}
