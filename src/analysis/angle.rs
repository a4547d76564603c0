//! Angle normalization for head orientation samples.
//!
//! Headset Euler angles wrap at 0°/360°, which sits exactly on the neutral
//! forward-facing pose for every tracked exercise. Shifting every angle by
//! 180° moves the discontinuity to the rarely visited rear so the neutral
//! pose lands at 180°. Window comparisons additionally go through
//! [`angular_delta`], which stays correct even across the shifted seam.

use serde::{Deserialize, Serialize};

use crate::exercise::Axis;

/// Full turn in degrees
pub const FULL_TURN: f32 = 360.0;

/// Half turn in degrees
pub const HALF_TURN: f32 = 180.0;

/// Fold any angle into [0, 360)
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= FULL_TURN {
        0.0
    } else {
        wrapped
    }
}

/// Remap a raw angle by `(angle + 180) mod 360`
///
/// Applying it twice returns the original angle (mod 360).
pub fn normalize(angle: f32) -> f32 {
    wrap_degrees(angle + HALF_TURN)
}

/// Signed shortest difference `angle - reference`, in (-180, 180]
pub fn angular_delta(angle: f32, reference: f32) -> f32 {
    let delta = wrap_degrees(angle - reference);
    if delta > HALF_TURN {
        delta - FULL_TURN
    } else {
        delta
    }
}

/// Raw headset orientation in degrees, as reported by the sensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Orientation {
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Apply [`normalize`] to every axis
    pub fn normalized(&self) -> NormalizedOrientation {
        NormalizedOrientation {
            pitch: normalize(self.pitch),
            yaw: normalize(self.yaw),
            roll: normalize(self.roll),
        }
    }
}

/// Orientation after the 180° shift; neutral pose sits near 180° per axis
///
/// Kept as its own type so raw sensor values can never be compared against
/// calibrated references by accident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedOrientation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl NormalizedOrientation {
    /// Build from angles that are already in normalized space
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self {
            pitch: wrap_degrees(pitch),
            yaw: wrap_degrees(yaw),
            roll: wrap_degrees(roll),
        }
    }

    pub fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Pitch => self.pitch,
            Axis::Yaw => self.yaw,
            Axis::Roll => self.roll,
        }
    }

    /// Undo the 180° shift
    pub fn to_raw(&self) -> Orientation {
        Orientation {
            pitch: normalize(self.pitch),
            yaw: normalize(self.yaw),
            roll: normalize(self.roll),
        }
    }
}

impl Default for NormalizedOrientation {
    /// Neutral pose (raw 0°, 0°, 0°)
    fn default() -> Self {
        Orientation::default().normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_shifts_by_half_turn() {
        assert_eq!(normalize(0.0), 180.0);
        assert_eq!(normalize(90.0), 270.0);
        assert_eq!(normalize(180.0), 0.0);
        assert_eq!(normalize(350.0), 170.0);
        assert_eq!(normalize(10.0), 190.0);
    }

    #[test]
    fn test_normalize_twice_is_identity() {
        for step in 0..720 {
            let angle = step as f32 * 0.5;
            let twice = normalize(normalize(angle));
            assert!(
                (twice - angle).abs() < 1e-3,
                "normalize twice of {} gave {}",
                angle,
                twice
            );
        }
    }

    #[test]
    fn test_normalize_folds_out_of_range_inputs() {
        assert_eq!(normalize(-10.0), 170.0);
        assert_eq!(normalize(540.0), 0.0);
        assert!(normalize(-1e-7) < FULL_TURN);
    }

    #[test]
    fn test_angular_delta_is_wrap_safe() {
        assert_eq!(angular_delta(10.0, 350.0), 20.0);
        assert_eq!(angular_delta(350.0, 10.0), -20.0);
        assert_eq!(angular_delta(170.0, 170.0), 0.0);
        assert_eq!(angular_delta(0.0, 180.0), 180.0);
    }

    #[test]
    fn test_orientation_normalized_round_trip() {
        let raw = Orientation::new(300.0, 30.0, 0.0);
        let normalized = raw.normalized();
        assert_eq!(normalized.pitch, 120.0);
        assert_eq!(normalized.yaw, 210.0);
        assert_eq!(normalized.roll, 180.0);
        assert_eq!(normalized.to_raw(), raw);
        assert_eq!(normalized.axis(Axis::Yaw), 210.0);
    }

    #[test]
    fn test_neutral_default_sits_at_half_turn() {
        let neutral = NormalizedOrientation::default();
        assert_eq!(neutral, NormalizedOrientation::new(180.0, 180.0, 180.0));
    }
}
