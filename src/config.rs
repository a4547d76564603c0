//! Configuration management for workout tuning
//!
//! This module provides runtime configuration loading from JSON files, so the
//! default workout plan, rep-tracking tolerances and telemetry sizes can be
//! tuned without recompiling.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analysis::angle::HALF_TURN;
use crate::error::WorkoutError;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub workout: WorkoutConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Workout plan supplied when a session begins
///
/// Immutable for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutConfig {
    /// Number of sets in the workout
    pub sets: u32,
    /// Reps per set
    pub reps: u32,
    /// Tolerance added and subtracted around each calibrated pose (degrees)
    pub margin_degrees: f32,
    /// Calorie estimate per completed rep
    #[serde(default = "default_calories_per_rep")]
    pub calories_per_rep: f32,
}

/// Default calorie factor for backward compatibility with older config files
fn default_calories_per_rep() -> f32 {
    0.25
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            sets: 2,
            reps: 5,
            margin_degrees: 5.0,
            calories_per_rep: default_calories_per_rep(),
        }
    }
}

impl WorkoutConfig {
    pub fn new(sets: u32, reps: u32, margin_degrees: f32) -> Self {
        Self {
            sets,
            reps,
            margin_degrees,
            ..Self::default()
        }
    }

    pub fn with_calories_per_rep(mut self, calories_per_rep: f32) -> Self {
        self.calories_per_rep = calories_per_rep;
        self
    }

    /// Validate the plan before a session starts
    ///
    /// # Returns
    /// * `Ok(())` - Plan usable
    /// * `Err(WorkoutError::InvalidConfig)` - First violated constraint
    pub fn validate(&self) -> Result<(), WorkoutError> {
        let reason = if self.sets == 0 {
            "sets must be greater than zero".to_string()
        } else if self.reps == 0 {
            "reps must be greater than zero".to_string()
        } else if !self.margin_degrees.is_finite() || self.margin_degrees <= 0.0 {
            format!(
                "margin {} must be a positive number of degrees",
                self.margin_degrees
            )
        } else if self.margin_degrees >= HALF_TURN {
            format!(
                "margin {} must be below {} degrees or every orientation matches",
                self.margin_degrees, HALF_TURN
            )
        } else if !self.calories_per_rep.is_finite() || self.calories_per_rep < 0.0 {
            format!(
                "calories per rep {} must be zero or positive",
                self.calories_per_rep
            )
        } else {
            return Ok(());
        };

        Err(WorkoutError::InvalidConfig { reason })
    }
}

/// Rep-tracking behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Ticks after entering the active phase during which stop events are ignored
    pub stop_debounce_ticks: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            // The press that dismissed the calibration screen must not end the workout
            stop_debounce_ticks: 1,
        }
    }
}

/// Telemetry collector sizing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Broadcast channel capacity for live subscribers
    pub channel_capacity: usize,
    /// Number of recent events retained for snapshots
    pub history_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            history_capacity: 128,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default asset location
    pub fn load() -> Self {
        Self::load_from_file("assets/workout_config.json")
    }
}
