// CalibrationState - calibrated pose references for one exercise
//
// A calibration run captures one normalized orientation per key pose. The
// references are keyed by 1-based pose index and become the centres of the
// tolerance windows used by the rep detector.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::angle::NormalizedOrientation;
use crate::error::CalibrationError;
use crate::exercise::{ExerciseKind, ExerciseProfile};

/// Pose index → normalized reference orientation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseReferences {
    poses: BTreeMap<u8, NormalizedOrientation>,
}

impl PoseReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the reference for a pose
    pub fn insert(&mut self, pose: u8, orientation: NormalizedOrientation) {
        self.poses.insert(pose, orientation);
    }

    pub fn get(&self, pose: u8) -> Option<&NormalizedOrientation> {
        self.poses.get(&pose)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn clear(&mut self) {
        self.poses.clear();
    }

    /// Iterate references in pose order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &NormalizedOrientation)> {
        self.poses.iter().map(|(pose, orientation)| (*pose, orientation))
    }

    /// First pose of the profile that has no reference yet
    pub fn first_missing(&self, profile: &ExerciseProfile) -> Option<u8> {
        profile.poses().find(|pose| !self.poses.contains_key(pose))
    }
}

/// CalibrationState stores the reference poses for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationState {
    /// Exercise these references belong to
    pub exercise: ExerciseKind,
    /// Captured reference orientations
    pub references: PoseReferences,
    /// Whether every pose of the exercise has been captured
    pub is_calibrated: bool,
}

impl CalibrationState {
    /// Empty, uncalibrated state for an exercise
    pub fn new_uncalibrated(exercise: ExerciseKind) -> Self {
        Self {
            exercise,
            references: PoseReferences::new(),
            is_calibrated: false,
        }
    }

    /// Create calibrated state from captured references
    ///
    /// # Returns
    /// * `Ok(CalibrationState)` - Every pose of the profile has a reference
    /// * `Err(CalibrationError::MissingPose)` - First pose without a reference
    pub fn from_references(
        profile: &ExerciseProfile,
        references: PoseReferences,
    ) -> Result<Self, CalibrationError> {
        if let Some(pose) = references.first_missing(profile) {
            return Err(CalibrationError::MissingPose { pose });
        }

        Ok(Self {
            exercise: profile.kind,
            references,
            is_calibrated: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sit_up_profile() -> ExerciseProfile {
        ExerciseKind::SitUp.profile().unwrap()
    }

    #[test]
    fn test_new_uncalibrated() {
        let state = CalibrationState::new_uncalibrated(ExerciseKind::SitUp);
        assert_eq!(state.exercise, ExerciseKind::SitUp);
        assert!(state.references.is_empty());
        assert!(!state.is_calibrated);
    }

    #[test]
    fn test_from_references_complete() {
        let mut references = PoseReferences::new();
        references.insert(1, NormalizedOrientation::new(170.0, 180.0, 180.0));
        references.insert(2, NormalizedOrientation::new(10.0, 180.0, 180.0));

        let state = CalibrationState::from_references(&sit_up_profile(), references).unwrap();
        assert!(state.is_calibrated);
        assert_eq!(state.references.get(2).unwrap().pitch, 10.0);
    }

    #[test]
    fn test_from_references_missing_pose() {
        let mut references = PoseReferences::new();
        references.insert(1, NormalizedOrientation::new(170.0, 180.0, 180.0));

        let result = CalibrationState::from_references(&sit_up_profile(), references);
        assert_eq!(result, Err(CalibrationError::MissingPose { pose: 2 }));
    }

    #[test]
    fn test_insert_overwrites_pose() {
        let mut references = PoseReferences::new();
        references.insert(1, NormalizedOrientation::new(100.0, 180.0, 180.0));
        references.insert(1, NormalizedOrientation::new(120.0, 180.0, 180.0));

        assert_eq!(references.len(), 1);
        assert_eq!(references.get(1).unwrap().pitch, 120.0);
    }

    #[test]
    fn test_serialization_round_trip_keeps_pose_keys() {
        let mut references = PoseReferences::new();
        references.insert(1, NormalizedOrientation::new(170.0, 180.0, 180.0));
        references.insert(2, NormalizedOrientation::new(10.0, 180.0, 180.0));
        let state = CalibrationState::from_references(&sit_up_profile(), references).unwrap();

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"sit-up\""), "unexpected JSON: {}", json);

        let parsed: CalibrationState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
