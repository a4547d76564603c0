// Progress tracking for the calibration walkthrough
//
// This module provides the step/status types and the instructional prompt
// shown to the user at each step of pose capture.

use serde::{Deserialize, Serialize};

use crate::exercise::ExerciseKind;

/// Position in the calibration walkthrough
///
/// `AwaitingPose(step)` counts confirmations: step 0 is the intro screen,
/// steps 1..=N wait for the user to hold pose `step`, step N+1 is the
/// "calibration complete" screen waiting for a last confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationStep {
    NotStarted,
    AwaitingPose(u8),
    Complete,
}

/// Coarse status reported to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationStatus {
    NotStarted,
    InProgress,
    /// Exercise has no calibration sequence; the walkthrough never advances
    Unsupported,
    Complete,
}

/// Instruction shown for the current calibration step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationPrompt {
    /// Instructional text
    pub text: String,
    /// Pose illustration to display alongside the text (1-based), if any
    pub pose_image: Option<u8>,
}

impl CalibrationPrompt {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pose_image: None,
        }
    }

    /// Intro screen before any pose is captured
    pub fn intro(exercise: ExerciseKind) -> Self {
        Self::text(format!(
            "Press/slide button on headset\nto begin {} calibration",
            exercise.display_name()
        ))
    }

    /// Ask the user to hold a pose and confirm
    pub fn hold_pose(exercise: ExerciseKind, pose: u8) -> Self {
        Self {
            text: format!(
                "Get in position {} of a {},\nthen press/slide button on headset",
                pose,
                exercise.display_name()
            ),
            pose_image: Some(pose),
        }
    }

    /// Every pose captured, waiting for the final confirmation
    pub fn finished() -> Self {
        Self::text("Calibration is complete!\nPress/slide button on headset to finish")
    }

    pub fn unsupported() -> Self {
        Self::text("Calibration not supported for this exercise")
    }
}

/// Snapshot of the calibration walkthrough for feedback rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProgress {
    /// Exercise being calibrated, if a walkthrough was started
    pub exercise: Option<ExerciseKind>,
    pub status: CalibrationStatus,
    pub step: CalibrationStep,
    /// Number of poses captured so far
    pub poses_captured: u8,
    /// Total poses the exercise needs (0 when unsupported)
    pub poses_needed: u8,
    /// Prompt to display, `None` once the walkthrough is over
    pub prompt: Option<CalibrationPrompt>,
    /// Pose guide that should mirror the live orientation
    pub preview_pose: Option<u8>,
}

impl CalibrationProgress {
    /// Check if every pose has been captured
    pub fn all_poses_captured(&self) -> bool {
        self.poses_needed > 0 && self.poses_captured >= self.poses_needed
    }

    /// Get progress percentage (0-100)
    pub fn percentage(&self) -> u8 {
        if self.poses_needed == 0 {
            return 0;
        }
        ((self.poses_captured as f32 / self.poses_needed as f32) * 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(captured: u8, needed: u8) -> CalibrationProgress {
        CalibrationProgress {
            exercise: Some(ExerciseKind::TwistCrunch),
            status: CalibrationStatus::InProgress,
            step: CalibrationStep::AwaitingPose(captured + 1),
            poses_captured: captured,
            poses_needed: needed,
            prompt: None,
            preview_pose: None,
        }
    }

    #[test]
    fn test_prompt_texts() {
        let intro = CalibrationPrompt::intro(ExerciseKind::SitUp);
        assert_eq!(
            intro.text,
            "Press/slide button on headset\nto begin sit-up calibration"
        );
        assert_eq!(intro.pose_image, None);

        let hold = CalibrationPrompt::hold_pose(ExerciseKind::SitUp, 2);
        assert_eq!(
            hold.text,
            "Get in position 2 of a sit-up,\nthen press/slide button on headset"
        );
        assert_eq!(hold.pose_image, Some(2));

        assert!(CalibrationPrompt::finished().text.starts_with("Calibration is complete!"));
        assert!(CalibrationPrompt::unsupported().text.contains("not supported"));
    }

    #[test]
    fn test_progress_percentage() {
        assert_eq!(progress(0, 3).percentage(), 0);
        assert_eq!(progress(1, 2).percentage(), 50);
        assert_eq!(progress(3, 3).percentage(), 100);
        assert_eq!(progress(0, 0).percentage(), 0);
    }

    #[test]
    fn test_all_poses_captured() {
        assert!(progress(3, 3).all_poses_captured());
        assert!(!progress(2, 3).all_poses_captured());
        assert!(!progress(0, 0).all_poses_captured());
    }
}
