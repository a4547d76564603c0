// Calibration error types and constants

use crate::error::ErrorCode;
use crate::exercise::ExerciseKind;
use log::error;
use std::fmt;

/// Calibration error code constants
///
/// Error code range: 2001-2004
pub struct CalibrationErrorCodes {}

impl CalibrationErrorCodes {
    /// Exercise has no head-orientation calibration sequence
    pub const UNSUPPORTED: i32 = 2001;

    /// Calibration was never started
    pub const NOT_STARTED: i32 = 2002;

    /// Calibration not complete
    pub const NOT_COMPLETE: i32 = 2003;

    /// A pose reference expected by the exercise profile is missing
    pub const MISSING_POSE: i32 = 2004;
}

/// Log a calibration error with structured context
///
/// This function logs calibration errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
/// - context: Additional contextual information
pub fn log_calibration_error(err: &CalibrationError, context: &str) {
    error!(
        "Calibration error in {}: code={}, component=CalibrationSession, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Calibration-related errors
///
/// None of these are fatal: the session keeps running and the caller
/// decides whether to restart calibration.
///
/// Error code ranges: 2001-2004
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Exercise has no calibration sequence
    Unsupported { exercise: ExerciseKind },

    /// Calibration was never started
    NotStarted,

    /// Calibration not complete
    NotComplete,

    /// Pose reference missing for the given 1-based pose index
    MissingPose { pose: u8 },
}

impl ErrorCode for CalibrationError {
    fn code(&self) -> i32 {
        match self {
            CalibrationError::Unsupported { .. } => CalibrationErrorCodes::UNSUPPORTED,
            CalibrationError::NotStarted => CalibrationErrorCodes::NOT_STARTED,
            CalibrationError::NotComplete => CalibrationErrorCodes::NOT_COMPLETE,
            CalibrationError::MissingPose { .. } => CalibrationErrorCodes::MISSING_POSE,
        }
    }

    fn message(&self) -> String {
        match self {
            CalibrationError::Unsupported { exercise } => {
                format!(
                    "Calibration not supported for {}",
                    exercise.display_name()
                )
            }
            CalibrationError::NotStarted => "Calibration not started".to_string(),
            CalibrationError::NotComplete => "Calibration not complete".to_string(),
            CalibrationError::MissingPose { pose } => {
                format!("Pose {} has no calibrated reference", pose)
            }
        }
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CalibrationError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for CalibrationError {}
