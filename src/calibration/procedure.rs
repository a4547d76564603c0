// CalibrationSession - guided pose capture workflow
//
// The user is walked through the key poses of an exercise one confirmation
// at a time:
// 1. Intro prompt (step 0)
// 2. Hold pose 1, confirm → pose 1 captured
// 3. Hold pose 2, confirm → pose 2 captured (and pose 3 for twist exercises)
// 4. "Calibration complete" prompt, confirm → walkthrough ends
//
// Starting a new walkthrough discards every previously captured reference.

use crate::analysis::angle::NormalizedOrientation;
use crate::calibration::progress::{
    CalibrationProgress, CalibrationPrompt, CalibrationStatus, CalibrationStep,
};
use crate::calibration::state::{CalibrationState, PoseReferences};
use crate::error::CalibrationError;
use crate::exercise::{ExerciseKind, ExerciseProfile};

/// Outcome of one confirmation event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationEvent {
    /// Moved past the intro screen
    StepAdvanced { step: u8 },
    /// Stored the live orientation as the reference for `pose`
    PoseCaptured {
        pose: u8,
        orientation: NormalizedOrientation,
    },
    /// Final confirmation received
    Completed,
}

/// CalibrationSession manages the pose capture walkthrough
#[derive(Debug, Clone)]
pub struct CalibrationSession {
    /// Exercise selected by the last `begin`
    exercise: Option<ExerciseKind>,
    /// Profile of that exercise, `None` when unsupported
    profile: Option<ExerciseProfile>,
    step: CalibrationStep,
    references: PoseReferences,
}

impl CalibrationSession {
    pub fn new() -> Self {
        Self {
            exercise: None,
            profile: None,
            step: CalibrationStep::NotStarted,
            references: PoseReferences::new(),
        }
    }

    /// Start (or restart) the walkthrough for an exercise
    ///
    /// Prior references are cleared immediately, so nothing captured by an
    /// earlier run can leak into the new one. Unsupported exercises park the
    /// walkthrough on step 0.
    pub fn begin(&mut self, exercise: ExerciseKind) -> CalibrationProgress {
        self.exercise = Some(exercise);
        self.profile = exercise.profile();
        self.references.clear();
        self.step = CalibrationStep::AwaitingPose(0);

        match self.profile {
            Some(profile) => tracing::info!(
                "[Calibration] Started {} calibration ({} poses)",
                exercise,
                profile.pose_count
            ),
            None => tracing::warn!("[Calibration] Calibration not supported for {}", exercise),
        }

        self.progress()
    }

    /// Handle a confirmation event with the current normalized orientation
    ///
    /// # Returns
    /// * `Some(CalibrationEvent)` - The walkthrough moved forward
    /// * `None` - Event ignored (not started, unsupported, or already complete)
    pub fn advance(&mut self, current: NormalizedOrientation) -> Option<CalibrationEvent> {
        let CalibrationStep::AwaitingPose(step) = self.step else {
            return None;
        };
        let profile = self.profile?;

        let next = step + 1;
        let event = if next == 1 {
            CalibrationEvent::StepAdvanced { step: next }
        } else if next <= profile.pose_count + 1 {
            let pose = next - 1;
            self.references.insert(pose, current);
            tracing::info!(
                "[Calibration] Captured pose {} of {}: pitch={:.1} yaw={:.1} roll={:.1}",
                pose,
                profile.pose_count,
                current.pitch,
                current.yaw,
                current.roll
            );
            CalibrationEvent::PoseCaptured {
                pose,
                orientation: current,
            }
        } else {
            self.step = CalibrationStep::Complete;
            tracing::info!("[Calibration] {} calibration complete", profile.kind);
            return Some(CalibrationEvent::Completed);
        };

        self.step = CalibrationStep::AwaitingPose(next);
        Some(event)
    }

    /// Current step of the walkthrough
    pub fn step(&self) -> CalibrationStep {
        self.step
    }

    pub fn exercise(&self) -> Option<ExerciseKind> {
        self.exercise
    }

    pub fn status(&self) -> CalibrationStatus {
        match self.step {
            CalibrationStep::NotStarted => CalibrationStatus::NotStarted,
            CalibrationStep::Complete => CalibrationStatus::Complete,
            CalibrationStep::AwaitingPose(_) if self.profile.is_none() => {
                CalibrationStatus::Unsupported
            }
            CalibrationStep::AwaitingPose(_) => CalibrationStatus::InProgress,
        }
    }

    /// Check if the walkthrough reached its end
    pub fn is_complete(&self) -> bool {
        self.step == CalibrationStep::Complete
    }

    /// Prompt for the current step, `None` before `begin` and after completion
    pub fn prompt(&self) -> Option<CalibrationPrompt> {
        let CalibrationStep::AwaitingPose(step) = self.step else {
            return None;
        };
        let exercise = self.exercise?;
        let Some(profile) = self.profile else {
            return Some(CalibrationPrompt::unsupported());
        };

        Some(if step == 0 {
            CalibrationPrompt::intro(exercise)
        } else if step <= profile.pose_count {
            CalibrationPrompt::hold_pose(exercise, step)
        } else {
            CalibrationPrompt::finished()
        })
    }

    /// Pose whose guide model should follow the live orientation
    ///
    /// While the user is positioning for pose k (step k), guide k mirrors the
    /// headset; earlier guides stay frozen at their captured orientation.
    pub fn preview_pose(&self) -> Option<u8> {
        match (self.step, self.profile) {
            (CalibrationStep::AwaitingPose(step), Some(profile))
                if step >= 1 && step <= profile.pose_count =>
            {
                Some(step)
            }
            _ => None,
        }
    }

    /// References captured so far
    pub fn references(&self) -> &PoseReferences {
        &self.references
    }

    /// Get current calibration progress
    pub fn progress(&self) -> CalibrationProgress {
        CalibrationProgress {
            exercise: self.exercise,
            status: self.status(),
            step: self.step,
            poses_captured: self.references.len() as u8,
            poses_needed: self.profile.map(|p| p.pose_count).unwrap_or(0),
            prompt: self.prompt(),
            preview_pose: self.preview_pose(),
        }
    }

    /// Finalize calibration and create CalibrationState
    ///
    /// # Returns
    /// * `Ok(CalibrationState)` - Walkthrough complete with every pose captured
    /// * `Err(CalibrationError)` - Not started, unsupported, or incomplete
    pub fn finalize(&self) -> Result<CalibrationState, CalibrationError> {
        let exercise = self.exercise.ok_or(CalibrationError::NotStarted)?;
        let profile = self
            .profile
            .ok_or(CalibrationError::Unsupported { exercise })?;

        if !self.is_complete() {
            return Err(CalibrationError::NotComplete);
        }

        CalibrationState::from_references(&profile, self.references.clone())
    }

    /// Reset the walkthrough to its initial state
    pub fn reset(&mut self) {
        self.exercise = None;
        self.profile = None;
        self.step = CalibrationStep::NotStarted;
        self.references.clear();
    }
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "procedure_tests.rs"]
mod tests;
