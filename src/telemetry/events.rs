//! Metric events describing workout progress for CLI and diagnostics
//! consumers.

use serde::{Deserialize, Serialize};

use crate::exercise::ExerciseKind;
use crate::workout::WorkoutEvent;

/// Metric events covering pose matching, rep/set counting, calibration and errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MetricEvent {
    PoseReached {
        pose: u8,
        next_pose: u8,
        timestamp_ms: u64,
    },
    Rep {
        set: u32,
        reps_in_set: u32,
        timestamp_ms: u64,
    },
    Set {
        sets_completed: u32,
        timestamp_ms: u64,
    },
    CalibrationCaptured {
        pose: u8,
        pitch: f32,
        yaw: f32,
        roll: f32,
    },
    CalibrationComplete {
        exercise: ExerciseKind,
    },
    SessionFinished {
        total_reps: u32,
        sets_completed: u32,
        calories: f32,
        elapsed_ms: u64,
        early: bool,
    },
    Error {
        code: i32,
        context: String,
    },
}

impl MetricEvent {
    /// Metric for a session event, if it carries one
    ///
    /// Step prompts, calibration restarts and resets are UI-only and map to `None`.
    pub fn from_workout_event(event: &WorkoutEvent, timestamp_ms: u64) -> Option<Self> {
        match event {
            WorkoutEvent::PoseReached { pose, next_pose } => Some(Self::PoseReached {
                pose: *pose,
                next_pose: *next_pose,
                timestamp_ms,
            }),
            WorkoutEvent::RepCompleted { reps_in_set, set } => Some(Self::Rep {
                set: *set,
                reps_in_set: *reps_in_set,
                timestamp_ms,
            }),
            WorkoutEvent::SetCompleted { sets_completed } => Some(Self::Set {
                sets_completed: *sets_completed,
                timestamp_ms,
            }),
            WorkoutEvent::PoseCaptured { pose, orientation } => Some(Self::CalibrationCaptured {
                pose: *pose,
                pitch: orientation.pitch,
                yaw: orientation.yaw,
                roll: orientation.roll,
            }),
            WorkoutEvent::CalibrationComplete { exercise } => Some(Self::CalibrationComplete {
                exercise: *exercise,
            }),
            WorkoutEvent::Finished { stats, early } => Some(Self::SessionFinished {
                total_reps: stats.total_reps,
                sets_completed: stats.sets_completed,
                calories: stats.calories,
                elapsed_ms: stats.elapsed_ms,
                early: *early,
            }),
            WorkoutEvent::CalibrationStep { .. }
            | WorkoutEvent::CalibrationRestarted { .. }
            | WorkoutEvent::Reset => None,
        }
    }
}
