// WorkoutSession - calibration → rep counting → set counting → results
//
// One session drives one exercise at a time from explicit ticks. Each tick
// reads one TickInput, performs at most one phase transition and returns the
// events it produced together with a feedback frame for the HUD.

use serde::{Deserialize, Serialize};

use crate::analysis::angle::NormalizedOrientation;
use crate::analysis::detector::{DetectorUpdate, RepDetector};
use crate::calibration::{CalibrationEvent, CalibrationProgress, CalibrationSession};
use crate::config::{TrackingConfig, WorkoutConfig};
use crate::error::{log_calibration_error, log_workout_error, WorkoutError};
use crate::exercise::ExerciseKind;
use crate::feedback::FeedbackFrame;
use crate::input::{TickInput, UserEvent};
use crate::workout::record::WorkoutRecord;
use crate::workout::stats::{total_reps, WorkoutStats};
use crate::workout::WorkoutPhase;

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkoutEvent {
    /// Calibration moved past its intro screen
    CalibrationStep { step: u8 },
    /// A calibration reference was captured
    PoseCaptured {
        pose: u8,
        orientation: NormalizedOrientation,
    },
    /// Calibration finished; counting starts next tick
    CalibrationComplete { exercise: ExerciseKind },
    /// Active session found no calibration and went back to calibrating
    CalibrationRestarted { exercise: ExerciseKind },
    /// The expected pose was reached
    PoseReached { pose: u8, next_pose: u8 },
    /// A rep finished; `set` is the 1-based set it belongs to
    RepCompleted { reps_in_set: u32, set: u32 },
    /// A set finished
    SetCompleted { sets_completed: u32 },
    /// Session finished, either every set done or stopped early
    Finished { stats: WorkoutStats, early: bool },
    /// Results dismissed, session back to idle
    Reset,
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub events: Vec<WorkoutEvent>,
    pub feedback: FeedbackFrame,
}

impl TickOutcome {
    pub fn rep_completed(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, WorkoutEvent::RepCompleted { .. }))
    }

    pub fn finished(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, WorkoutEvent::Finished { .. }))
    }
}

/// Workout state machine for one exercise
#[derive(Debug, Clone)]
pub struct WorkoutSession {
    phase: WorkoutPhase,
    tracking: TrackingConfig,
    exercise: Option<ExerciseKind>,
    config: WorkoutConfig,
    calibration: CalibrationSession,
    /// Set when calibration completes, cleared on confirm or recalibrate
    calibrated: bool,
    detector: Option<RepDetector>,
    reps_so_far: u32,
    sets_so_far: u32,
    /// Timestamp of the first active tick
    active_since_ms: Option<u64>,
    elapsed_ms: u64,
    /// Active ticks left during which stop is ignored
    stop_debounce: u32,
    last_update: Option<DetectorUpdate>,
}

impl WorkoutSession {
    pub fn new(tracking: TrackingConfig) -> Self {
        Self {
            phase: WorkoutPhase::Idle,
            tracking,
            exercise: None,
            config: WorkoutConfig::default(),
            calibration: CalibrationSession::new(),
            calibrated: false,
            detector: None,
            reps_so_far: 0,
            sets_so_far: 0,
            active_since_ms: None,
            elapsed_ms: 0,
            stop_debounce: 0,
            last_update: None,
        }
    }

    /// Start a workout: Idle → Calibrating
    ///
    /// # Arguments
    /// * `exercise` - Exercise to calibrate and track
    /// * `config` - Sets, reps and tolerance for this session
    ///
    /// # Returns
    /// * `Ok(CalibrationProgress)` - Calibration walkthrough started
    /// * `Err(WorkoutError)` - Session not idle or config rejected; nothing changes
    pub fn begin(
        &mut self,
        exercise: ExerciseKind,
        config: WorkoutConfig,
    ) -> Result<CalibrationProgress, WorkoutError> {
        if self.phase != WorkoutPhase::Idle {
            let err = WorkoutError::InvalidPhase {
                expected: WorkoutPhase::Idle,
                actual: self.phase,
            };
            log_workout_error(&err, "begin");
            return Err(err);
        }
        config.validate().inspect_err(|err| {
            log_workout_error(err, "begin");
        })?;

        self.clear_progress();
        self.exercise = Some(exercise);
        self.config = config;
        self.calibrated = false;
        self.detector = None;
        self.phase = WorkoutPhase::Calibrating;

        tracing::info!(
            "[Workout] Starting {}: {} sets x {} reps, margin {:.1}°",
            exercise,
            config.sets,
            config.reps,
            config.margin_degrees
        );

        Ok(self.calibration.begin(exercise))
    }

    /// Advance the session by one tick
    pub fn tick(&mut self, input: &TickInput) -> TickOutcome {
        let sample = input.orientation.normalized();
        let mut events = Vec::new();

        match self.phase {
            WorkoutPhase::Idle => {}
            WorkoutPhase::Calibrating => self.tick_calibrating(sample, input.event, &mut events),
            WorkoutPhase::Active => self.tick_active(sample, input, &mut events),
            WorkoutPhase::Finished => {
                if input.event == Some(UserEvent::Confirm) {
                    self.reset();
                    events.push(WorkoutEvent::Reset);
                }
            }
        }

        TickOutcome {
            events,
            feedback: self.feedback(),
        }
    }

    fn tick_calibrating(
        &mut self,
        sample: NormalizedOrientation,
        event: Option<UserEvent>,
        events: &mut Vec<WorkoutEvent>,
    ) {
        if event != Some(UserEvent::Advance) {
            return;
        }

        match self.calibration.advance(sample) {
            Some(CalibrationEvent::StepAdvanced { step }) => {
                events.push(WorkoutEvent::CalibrationStep { step });
            }
            Some(CalibrationEvent::PoseCaptured { pose, orientation }) => {
                events.push(WorkoutEvent::PoseCaptured { pose, orientation });
            }
            Some(CalibrationEvent::Completed) => self.complete_calibration(events),
            None => {}
        }
    }

    fn complete_calibration(&mut self, events: &mut Vec<WorkoutEvent>) {
        let margin = self.config.margin_degrees;
        let detector = self.calibration.finalize().and_then(|state| {
            RepDetector::from_state(&state, margin).map(|detector| (state.exercise, detector))
        });

        match detector {
            Ok((exercise, detector)) => {
                self.detector = Some(detector);
                self.calibrated = true;
                self.last_update = None;
                self.stop_debounce = self.tracking.stop_debounce_ticks;
                self.phase = WorkoutPhase::Active;
                events.push(WorkoutEvent::CalibrationComplete { exercise });
            }
            Err(err) => {
                log_calibration_error(&err, "complete_calibration");
                if let Some(exercise) = self.exercise {
                    self.calibration.begin(exercise);
                }
            }
        }
    }

    fn tick_active(
        &mut self,
        sample: NormalizedOrientation,
        input: &TickInput,
        events: &mut Vec<WorkoutEvent>,
    ) {
        let Some(exercise) = self.exercise else {
            return;
        };
        if !self.calibrated || self.detector.is_none() {
            tracing::warn!("[Workout] No calibration for {}, recalibrating", exercise);
            self.detector = None;
            self.phase = WorkoutPhase::Calibrating;
            self.calibration.begin(exercise);
            events.push(WorkoutEvent::CalibrationRestarted { exercise });
            return;
        }

        let since = *self.active_since_ms.get_or_insert(input.timestamp_ms);
        self.elapsed_ms = self
            .elapsed_ms
            .max(input.timestamp_ms.saturating_sub(since));

        let debouncing = self.stop_debounce > 0;
        self.stop_debounce = self.stop_debounce.saturating_sub(1);

        if input.event == Some(UserEvent::Stop) {
            if debouncing {
                tracing::debug!("[Workout] Ignoring stop queued before the workout started");
            } else {
                self.finish(true, events);
                return;
            }
        }

        let Some(detector) = self.detector.as_mut() else {
            return;
        };
        let update = detector.observe(&sample);
        self.last_update = Some(update);

        if let Some(pose) = update.pose_reached {
            events.push(WorkoutEvent::PoseReached {
                pose,
                next_pose: update.next_pose,
            });
        }
        if !update.rep_completed {
            return;
        }

        self.reps_so_far += 1;
        events.push(WorkoutEvent::RepCompleted {
            reps_in_set: self.reps_so_far,
            set: self.sets_so_far + 1,
        });
        tracing::info!(
            "[Workout] Rep {}/{} of set {}",
            self.reps_so_far,
            self.config.reps,
            self.sets_so_far + 1
        );

        if self.reps_so_far >= self.config.reps {
            self.reps_so_far = 0;
            self.sets_so_far += 1;
            events.push(WorkoutEvent::SetCompleted {
                sets_completed: self.sets_so_far,
            });
            tracing::info!("[Workout] Set {}/{} done", self.sets_so_far, self.config.sets);

            if self.sets_so_far >= self.config.sets {
                self.finish(false, events);
            }
        }
    }

    fn finish(&mut self, early: bool, events: &mut Vec<WorkoutEvent>) {
        self.phase = WorkoutPhase::Finished;
        let stats = self.stats();
        tracing::info!(
            "[Workout] Finished{}: {} sets, {} reps, {:.2} kcal in {}",
            if early { " early" } else { "" },
            stats.sets_completed,
            stats.total_reps,
            stats.calories,
            stats.elapsed_text()
        );
        events.push(WorkoutEvent::Finished { stats, early });
    }

    /// Drop the calibration so the next active tick recalibrates
    ///
    /// Rep and set progress are kept.
    pub fn recalibrate(&mut self) {
        if self.phase == WorkoutPhase::Active {
            self.calibrated = false;
        }
    }

    /// Back to Idle from any phase, clearing progress and calibration
    pub fn reset(&mut self) {
        self.phase = WorkoutPhase::Idle;
        self.exercise = None;
        self.config = WorkoutConfig::default();
        self.calibration.reset();
        self.calibrated = false;
        self.detector = None;
        self.clear_progress();
    }

    fn clear_progress(&mut self) {
        self.reps_so_far = 0;
        self.sets_so_far = 0;
        self.active_since_ms = None;
        self.elapsed_ms = 0;
        self.stop_debounce = 0;
        self.last_update = None;
    }

    pub fn phase(&self) -> WorkoutPhase {
        self.phase
    }

    pub fn exercise(&self) -> Option<ExerciseKind> {
        self.exercise
    }

    pub fn config(&self) -> &WorkoutConfig {
        &self.config
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn calibration(&self) -> &CalibrationSession {
        &self.calibration
    }

    pub fn reps_so_far(&self) -> u32 {
        self.reps_so_far
    }

    pub fn sets_so_far(&self) -> u32 {
        self.sets_so_far
    }

    /// Pose the detector expects next, while active
    pub fn next_pose(&self) -> Option<u8> {
        match self.phase {
            WorkoutPhase::Active => self.detector.as_ref().map(RepDetector::next_pose),
            _ => None,
        }
    }

    /// Current aggregated stats
    pub fn stats(&self) -> WorkoutStats {
        WorkoutStats {
            exercise: self.exercise,
            sets_completed: self.sets_so_far,
            target_sets: self.config.sets,
            reps_in_set: self.reps_so_far,
            target_reps: self.config.reps,
            total_reps: total_reps(self.reps_so_far, self.sets_so_far, self.config.reps),
            calories: WorkoutStats::estimate_calories(
                self.config.calories_per_rep,
                self.reps_so_far,
                self.sets_so_far,
                self.config.reps,
            ),
            elapsed_ms: self.elapsed_ms,
        }
    }

    /// History record of a finished workout
    ///
    /// # Returns
    /// * `Ok(WorkoutRecord)` - One entry per finished set plus any partial set
    /// * `Err(WorkoutError::NotFinished)` - Session is not in the finished phase
    pub fn record(&self, recorded_at_ms: u64) -> Result<WorkoutRecord, WorkoutError> {
        let exercise = match (self.phase, self.exercise) {
            (WorkoutPhase::Finished, Some(exercise)) => exercise,
            _ => return Err(WorkoutError::NotFinished),
        };

        let mut set_reps = vec![self.config.reps; self.sets_so_far as usize];
        if self.reps_so_far > 0 {
            set_reps.push(self.reps_so_far);
        }

        Ok(WorkoutRecord {
            exercise,
            recorded_at_ms,
            set_reps,
        })
    }

    /// Render the HUD frame for the current state
    pub fn feedback(&self) -> FeedbackFrame {
        let stats = self.stats();
        let pose_count = self
            .exercise
            .and_then(|exercise| exercise.profile())
            .map(|profile| profile.pose_count)
            .unwrap_or(0);
        let calibrating = self.phase == WorkoutPhase::Calibrating;

        FeedbackFrame {
            phase: self.phase,
            stats_text: stats.stats_text(),
            elapsed_text: stats.elapsed_text(),
            percentage: match self.phase {
                WorkoutPhase::Active | WorkoutPhase::Finished => {
                    self.last_update.map(|u| u.percentage).unwrap_or(0.0)
                }
                _ => 0.0,
            },
            next_pose: self.next_pose(),
            pose_count,
            prompt: calibrating.then(|| self.calibration.prompt()).flatten(),
            preview_pose: calibrating
                .then(|| self.calibration.preview_pose())
                .flatten(),
        }
    }
}

impl Default for WorkoutSession {
    fn default() -> Self {
        Self::new(TrackingConfig::default())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
