// Calibration module - pose capture walkthrough and reference storage
//
// This module provides two main components:
// 1. CalibrationSession: walks the user through holding each key pose
// 2. CalibrationState: the captured pose references for one exercise
//
// The calibration workflow:
// 1. begin(exercise) shows the intro prompt
// 2. Each confirmation captures the live normalized orientation for the next pose
// 3. The final confirmation completes the walkthrough; finalize() yields the state

pub mod procedure;
pub mod progress;
pub mod state;

pub use procedure::{CalibrationEvent, CalibrationSession};
pub use progress::{CalibrationProgress, CalibrationPrompt, CalibrationStatus, CalibrationStep};
pub use state::{CalibrationState, PoseReferences};
