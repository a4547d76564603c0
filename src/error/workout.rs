// Workout session error types and constants

use crate::error::ErrorCode;
use crate::workout::WorkoutPhase;
use log::error;
use std::fmt;

/// Workout error code constants
///
/// Error code range: 3001-3003
pub struct WorkoutErrorCodes {}

impl WorkoutErrorCodes {
    /// Workout configuration rejected at session start
    pub const INVALID_CONFIG: i32 = 3001;

    /// Operation not allowed in the current session phase
    pub const INVALID_PHASE: i32 = 3002;

    /// Session has not reached the finished phase yet
    pub const NOT_FINISHED: i32 = 3003;
}

/// Log a workout error with structured context
pub fn log_workout_error(err: &WorkoutError, context: &str) {
    error!(
        "Workout error in {}: code={}, component=WorkoutSession, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Workout session errors
///
/// Error code ranges: 3001-3003
#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutError {
    /// Sets, reps, margin or calorie factor out of range
    InvalidConfig { reason: String },

    /// Operation requires a different phase
    InvalidPhase {
        expected: WorkoutPhase,
        actual: WorkoutPhase,
    },

    /// No finished workout to report on
    NotFinished,
}

impl ErrorCode for WorkoutError {
    fn code(&self) -> i32 {
        match self {
            WorkoutError::InvalidConfig { .. } => WorkoutErrorCodes::INVALID_CONFIG,
            WorkoutError::InvalidPhase { .. } => WorkoutErrorCodes::INVALID_PHASE,
            WorkoutError::NotFinished => WorkoutErrorCodes::NOT_FINISHED,
        }
    }

    fn message(&self) -> String {
        match self {
            WorkoutError::InvalidConfig { reason } => {
                format!("Invalid workout config: {}", reason)
            }
            WorkoutError::InvalidPhase { expected, actual } => {
                format!("Expected phase {:?}, session is {:?}", expected, actual)
            }
            WorkoutError::NotFinished => "Workout not finished".to_string(),
        }
    }
}

impl fmt::Display for WorkoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WorkoutError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for WorkoutError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workout_error_codes() {
        assert_eq!(
            WorkoutError::InvalidConfig {
                reason: "test".to_string()
            }
            .code(),
            3001
        );
        assert_eq!(
            WorkoutError::InvalidPhase {
                expected: WorkoutPhase::Idle,
                actual: WorkoutPhase::Active,
            }
            .code(),
            3002
        );
        assert_eq!(WorkoutError::NotFinished.code(), 3003);
    }

    #[test]
    fn test_workout_error_messages() {
        let err = WorkoutError::InvalidConfig {
            reason: "sets must be greater than zero".to_string(),
        };
        assert_eq!(
            err.message(),
            "Invalid workout config: sets must be greater than zero"
        );

        let err = WorkoutError::InvalidPhase {
            expected: WorkoutPhase::Idle,
            actual: WorkoutPhase::Calibrating,
        };
        assert_eq!(err.message(), "Expected phase Idle, session is Calibrating");
    }
}
