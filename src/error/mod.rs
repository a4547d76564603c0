// Error types for the workout trainer
//
// This module defines custom error types for calibration and workout session
// operations, providing structured error handling with stable numeric codes
// that the presentation layer can branch on.

mod calibration;
mod workout;

pub use calibration::{log_calibration_error, CalibrationError, CalibrationErrorCodes};
pub use workout::{log_workout_error, WorkoutError, WorkoutErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the engine boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
