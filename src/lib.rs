// Workout Trainer Core - VR exercise tracking
// Pose calibration, rep/set counting and workout results from headset orientation

// Module declarations
pub mod analysis;
pub mod calibration;
pub mod config;
pub mod context;
pub mod error;
pub mod exercise;
pub mod feedback;
pub mod input;
pub mod replay;
pub mod telemetry;
pub mod workout;

// Re-exports for convenience
pub use analysis::{NormalizedOrientation, Orientation, RepDetector};
pub use calibration::{CalibrationSession, CalibrationState};
pub use config::{AppConfig, WorkoutConfig};
pub use context::AppContext;
pub use exercise::{Axis, ExerciseKind, ExerciseProfile};
pub use input::{OrientationSource, TickInput, UserEvent};
pub use workout::{WorkoutEvent, WorkoutPhase, WorkoutSession, WorkoutStats};

/// Install the `tracing` fmt subscriber
///
/// Honors `RUST_LOG`-style filtering through the subscriber defaults and is
/// safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    if tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
    {
        log::debug!("Logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
    }
}
