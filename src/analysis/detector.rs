//! RepDetector - cyclic pose matching for repetition counting
//!
//! One algorithm serves every exercise: the detector only ever tests the
//! window of the pose it expects next. A sample inside that window advances
//! the pointer; reaching the last pose of the profile counts a rep and wraps
//! the pointer back to pose 1. Samples matching no window, or the window of a
//! pose that is not expected yet, leave the state untouched.

use serde::{Deserialize, Serialize};

use crate::analysis::angle::{angular_delta, NormalizedOrientation};
use crate::calibration::state::{CalibrationState, PoseReferences};
use crate::error::CalibrationError;
use crate::exercise::{Axis, ExerciseProfile};

/// Spans smaller than this are treated as "no movement" for progress
const MIN_SPAN_DEGREES: f32 = 1e-3;

/// Result of feeding one sample to the detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorUpdate {
    /// Pose matched by this sample, if any
    pub pose_reached: Option<u8>,
    /// Whether this sample completed a repetition
    pub rep_completed: bool,
    /// Pose expected by the next sample (1-based)
    pub next_pose: u8,
    /// Advisory position within the rep cycle, 0-100
    pub percentage: f32,
}

/// Cyclic pose classifier parameterized by an exercise profile
#[derive(Debug, Clone)]
pub struct RepDetector {
    profile: ExerciseProfile,
    references: PoseReferences,
    /// Half-width of every tolerance window in degrees
    margin_degrees: f32,
    next_pose: u8,
    /// Set once pose 1 has been reached; progress reads 0 before that
    started: bool,
    reps_completed: u32,
}

impl RepDetector {
    /// Create a detector expecting pose 1
    ///
    /// # Arguments
    /// * `profile` - Pose layout of the exercise
    /// * `references` - Calibrated normalized orientations, keyed by pose
    /// * `margin_degrees` - Tolerance added to both sides of each reference
    pub fn new(profile: ExerciseProfile, references: PoseReferences, margin_degrees: f32) -> Self {
        Self {
            profile,
            references,
            margin_degrees,
            next_pose: 1,
            started: false,
            reps_completed: 0,
        }
    }

    /// Create a detector from a finished calibration
    ///
    /// # Returns
    /// * `Ok(RepDetector)` - State is calibrated for a supported exercise
    /// * `Err(CalibrationError)` - Unsupported exercise, incomplete state, or missing pose
    pub fn from_state(
        state: &CalibrationState,
        margin_degrees: f32,
    ) -> Result<Self, CalibrationError> {
        let profile = state
            .exercise
            .profile()
            .ok_or(CalibrationError::Unsupported {
                exercise: state.exercise,
            })?;

        if !state.is_calibrated {
            return Err(CalibrationError::NotComplete);
        }
        if let Some(pose) = state.references.first_missing(&profile) {
            return Err(CalibrationError::MissingPose { pose });
        }

        Ok(Self::new(profile, state.references.clone(), margin_degrees))
    }

    /// Feed one normalized sample
    pub fn observe(&mut self, sample: &NormalizedOrientation) -> DetectorUpdate {
        let expected = self.next_pose;
        let mut pose_reached = None;
        let mut rep_completed = false;

        if self.matches_pose(expected, sample) {
            pose_reached = Some(expected);
            self.started = true;
            self.next_pose = self.profile.next_pose(expected);

            if expected == self.profile.pose_count {
                rep_completed = true;
                self.reps_completed += 1;
            }

            tracing::debug!(
                "[RepDetector] Pose {} reached, next pose {}{}",
                expected,
                self.next_pose,
                if rep_completed { " (rep complete)" } else { "" }
            );
        }

        DetectorUpdate {
            pose_reached,
            rep_completed,
            next_pose: self.next_pose,
            percentage: self.percentage(sample),
        }
    }

    /// Check whether a sample lies inside a pose's tolerance window
    ///
    /// Every profile axis must satisfy `|sample - reference| < margin`, with
    /// the difference taken the short way around the circle. A pose without
    /// a reference never matches.
    pub fn matches_pose(&self, pose: u8, sample: &NormalizedOrientation) -> bool {
        let Some(reference) = self.references.get(pose) else {
            return false;
        };

        self.profile.axes.iter().all(|&axis| {
            angular_delta(sample.axis(axis), reference.axis(axis)).abs() < self.margin_degrees
        })
    }

    /// Advisory rep-completion percentage for a sample, 0-100
    ///
    /// The way out, pose 1 → ... → pose N, fills the bar in N-1 equal
    /// segments, so the tick that reaches pose N and counts the rep reads
    /// 100. The return segment, pose N → pose 1, drains it back to 0. Within
    /// a segment the sample is interpolated along the axis with the largest
    /// reference span and clamped to the segment.
    pub fn percentage(&self, sample: &NormalizedOrientation) -> f32 {
        if !self.started {
            return 0.0;
        }

        let forward_segments = (self.profile.pose_count.max(2) - 1) as f32;
        let from_pose = self.profile.previous_pose(self.next_pose);
        let returning = self.next_pose == 1;

        let fraction = match (
            self.references.get(from_pose),
            self.references.get(self.next_pose),
        ) {
            (Some(from), Some(to)) => self
                .dominant_axis(from, to)
                .map(|axis| {
                    let span = angular_delta(to.axis(axis), from.axis(axis));
                    let travelled = angular_delta(sample.axis(axis), from.axis(axis));
                    (travelled / span).clamp(0.0, 1.0)
                })
                .unwrap_or(0.0),
            _ => 0.0,
        };

        if returning {
            (1.0 - fraction) * 100.0
        } else {
            ((from_pose - 1) as f32 + fraction) / forward_segments * 100.0
        }
    }

    /// Profile axis along which two references differ the most
    fn dominant_axis(
        &self,
        from: &NormalizedOrientation,
        to: &NormalizedOrientation,
    ) -> Option<Axis> {
        self.profile
            .axes
            .iter()
            .copied()
            .map(|axis| (axis, angular_delta(to.axis(axis), from.axis(axis)).abs()))
            .filter(|(_, span)| *span >= MIN_SPAN_DEGREES)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(axis, _)| axis)
    }

    /// Pose expected by the next sample (1-based)
    pub fn next_pose(&self) -> u8 {
        self.next_pose
    }

    /// Reps counted since creation or the last reset
    pub fn reps_completed(&self) -> u32 {
        self.reps_completed
    }

    pub fn profile(&self) -> &ExerciseProfile {
        &self.profile
    }

    pub fn margin_degrees(&self) -> f32 {
        self.margin_degrees
    }

    /// Expect pose 1 again without touching the references
    pub fn reset(&mut self) {
        self.next_pose = 1;
        self.started = false;
        self.reps_completed = 0;
    }
}
