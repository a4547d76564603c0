// Workout module - session orchestration, stats and history records
//
// Session lifecycle:
// Idle → Calibrating → Active → Finished → Idle
//
// - Calibrating: CalibrationSession captures the exercise's key poses
// - Active: RepDetector counts reps, sets roll over, stop ends early
// - Finished: stats frozen until the user confirms

pub mod record;
pub mod session;
pub mod stats;

pub use record::{PlayerProfile, WorkoutRecord};
pub use session::{TickOutcome, WorkoutEvent, WorkoutSession};
pub use stats::WorkoutStats;

use serde::{Deserialize, Serialize};

/// Phase of a workout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutPhase {
    Idle,
    Calibrating,
    Active,
    Finished,
}
