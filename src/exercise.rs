// Exercise catalogue and per-exercise pose profiles
//
// Each supported exercise is described by an ExerciseProfile: how many key
// poses make up one repetition and which orientation axes distinguish them.
// The rep detector and the calibration walkthrough are both driven by the
// profile, so adding an exercise means adding a profile, not a new branch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Orientation axis used when comparing a live sample against a pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Rotation around x (nodding)
    Pitch,
    /// Rotation around y (turning)
    Yaw,
    /// Rotation around z (tilting)
    Roll,
}

/// Exercises offered by the workout menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    SitUp,
    TwistCrunch,
    TwistLunge,
    /// Listed in the menu but not trackable from head orientation alone
    JumpingJack,
}

impl ExerciseKind {
    /// Every exercise, in menu order
    pub const ALL: [ExerciseKind; 4] = [
        ExerciseKind::SitUp,
        ExerciseKind::TwistCrunch,
        ExerciseKind::TwistLunge,
        ExerciseKind::JumpingJack,
    ];

    /// Get human-readable name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseKind::SitUp => "sit-up",
            ExerciseKind::TwistCrunch => "twist crunch",
            ExerciseKind::TwistLunge => "twist lunge",
            ExerciseKind::JumpingJack => "jumping jack",
        }
    }

    /// Stable identifier used in config files, traces and the CLI
    pub fn slug(&self) -> &'static str {
        match self {
            ExerciseKind::SitUp => "sit-up",
            ExerciseKind::TwistCrunch => "twist-crunch",
            ExerciseKind::TwistLunge => "twist-lunge",
            ExerciseKind::JumpingJack => "jumping-jack",
        }
    }

    /// Pose profile for this exercise
    ///
    /// # Returns
    /// * `Some(ExerciseProfile)` - Exercise can be calibrated and tracked
    /// * `None` - Calibration not supported
    pub fn profile(&self) -> Option<ExerciseProfile> {
        match self {
            ExerciseKind::SitUp => Some(ExerciseProfile {
                kind: *self,
                pose_count: 2,
                axes: &[Axis::Pitch],
            }),
            ExerciseKind::TwistCrunch | ExerciseKind::TwistLunge => Some(ExerciseProfile {
                kind: *self,
                pose_count: 3,
                axes: &[Axis::Pitch, Axis::Yaw],
            }),
            ExerciseKind::JumpingJack => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.profile().is_some()
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ExerciseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        ExerciseKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown exercise '{}', expected one of: sit-up, twist-crunch, twist-lunge, jumping-jack",
                    s
                )
            })
    }
}

/// Pose layout for one exercise
///
/// Poses are numbered from 1 and visited in cyclic order
/// 1 → 2 → ... → pose_count → 1. Reaching the last pose completes a rep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseProfile {
    pub kind: ExerciseKind,
    /// Number of key poses in one repetition (2 or 3)
    pub pose_count: u8,
    /// Axes that must all fall inside the tolerance window
    pub axes: &'static [Axis],
}

impl ExerciseProfile {
    /// Pose that follows `pose` in the cycle
    pub fn next_pose(&self, pose: u8) -> u8 {
        if pose >= self.pose_count {
            1
        } else {
            pose + 1
        }
    }

    /// Pose that precedes `pose` in the cycle
    pub fn previous_pose(&self, pose: u8) -> u8 {
        if pose <= 1 {
            self.pose_count
        } else {
            pose - 1
        }
    }

    /// Iterate pose indices 1..=pose_count
    pub fn poses(&self) -> impl Iterator<Item = u8> {
        1..=self.pose_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_pose_counts() {
        let sit_up = ExerciseKind::SitUp.profile().unwrap();
        assert_eq!(sit_up.pose_count, 2);
        assert_eq!(sit_up.axes, &[Axis::Pitch]);

        let crunch = ExerciseKind::TwistCrunch.profile().unwrap();
        assert_eq!(crunch.pose_count, 3);
        assert_eq!(crunch.axes, &[Axis::Pitch, Axis::Yaw]);

        let lunge = ExerciseKind::TwistLunge.profile().unwrap();
        assert_eq!(lunge.pose_count, 3);

        assert!(ExerciseKind::JumpingJack.profile().is_none());
        assert!(!ExerciseKind::JumpingJack.is_supported());
    }

    #[test]
    fn test_pose_cycle_wraps() {
        let crunch = ExerciseKind::TwistCrunch.profile().unwrap();
        assert_eq!(crunch.next_pose(1), 2);
        assert_eq!(crunch.next_pose(2), 3);
        assert_eq!(crunch.next_pose(3), 1);
        assert_eq!(crunch.previous_pose(1), 3);
        assert_eq!(crunch.poses().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_from_str_accepts_variants() {
        assert_eq!("sit-up".parse::<ExerciseKind>(), Ok(ExerciseKind::SitUp));
        assert_eq!(
            "Twist_Crunch".parse::<ExerciseKind>(),
            Ok(ExerciseKind::TwistCrunch)
        );
        assert_eq!(
            "twist lunge".parse::<ExerciseKind>(),
            Ok(ExerciseKind::TwistLunge)
        );
        assert!("burpee".parse::<ExerciseKind>().is_err());
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&ExerciseKind::TwistCrunch).unwrap();
        assert_eq!(json, "\"twist-crunch\"");
        let parsed: ExerciseKind = serde_json::from_str("\"sit-up\"").unwrap();
        assert_eq!(parsed, ExerciseKind::SitUp);
    }
}
