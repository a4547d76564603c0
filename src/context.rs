// AppContext: Dependency Injection Container
// Owns the workout session and everything wired around it for one player

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::broadcast;

use crate::calibration::CalibrationProgress;
use crate::config::{AppConfig, WorkoutConfig};
use crate::error::WorkoutError;
use crate::exercise::ExerciseKind;
use crate::feedback::{FeedbackFrame, FeedbackSink};
use crate::input::{OrientationSource, TickInput, UserEvent};
use crate::telemetry::{MetricEvent, TelemetryCollector, TelemetrySnapshot};
use crate::workout::{PlayerProfile, TickOutcome, WorkoutSession};

/// AppContext: Dependency injection container for all application state
///
/// Replaces engine-global player state with one explicit owner:
/// - WorkoutSession state machine
/// - Telemetry collector (shareable with reporting threads)
/// - Feedback frame broadcast channel
/// - Player profile receiving finished workout records
pub struct AppContext {
    config: AppConfig,
    session: WorkoutSession,
    telemetry: Arc<TelemetryCollector>,
    feedback_tx: broadcast::Sender<FeedbackFrame>,
    profile: PlayerProfile,
}

impl AppContext {
    /// Create a context from configuration
    ///
    /// The session starts Idle; the profile is the default player until one
    /// is loaded with [`AppContext::set_profile`].
    pub fn new(config: AppConfig) -> Self {
        let (feedback_tx, _) = broadcast::channel(config.telemetry.channel_capacity.max(1));
        Self {
            session: WorkoutSession::new(config.tracking),
            telemetry: Arc::new(TelemetryCollector::from_config(&config.telemetry)),
            feedback_tx,
            profile: PlayerProfile::default(),
            config,
        }
    }

    // ========================================================================
    // BUSINESS LOGIC METHODS - WORKOUT
    // ========================================================================

    /// Start a workout and its calibration walkthrough
    ///
    /// # Arguments
    /// * `exercise` - Exercise to perform
    /// * `config` - Session parameters; `None` uses the configured defaults
    ///
    /// # Returns
    /// * `Ok(CalibrationProgress)` - Session is calibrating
    /// * `Err(WorkoutError)` - Session busy or config rejected
    pub fn start_workout(
        &mut self,
        exercise: ExerciseKind,
        config: Option<WorkoutConfig>,
    ) -> Result<CalibrationProgress, WorkoutError> {
        let config = config.unwrap_or(self.config.workout);
        self.session.begin(exercise, config).inspect_err(|err| {
            self.telemetry.record_error(err, "start_workout");
        })
    }

    /// Run one tick and fan its results out
    ///
    /// Session events go to telemetry, the feedback frame goes to feedback
    /// subscribers, and a finished workout is appended to the player profile.
    pub fn tick(&mut self, input: &TickInput) -> TickOutcome {
        let outcome = self.session.tick(input);

        self.telemetry
            .record_workout_events(&outcome.events, input.timestamp_ms);
        self.feedback_tx.publish(&outcome.feedback);

        if outcome.finished() {
            match self.session.record(now_timestamp_ms()) {
                Ok(record) => {
                    tracing::info!(
                        "[Context] Saved {} workout for {}: {} reps over {} sets",
                        record.exercise,
                        self.profile.name,
                        record.total_reps(),
                        record.sets()
                    );
                    self.profile.add_record(record);
                }
                Err(err) => self.telemetry.record_error(&err, "tick"),
            }
        }

        outcome
    }

    /// Sample an orientation source and tick
    pub fn poll<S: OrientationSource + ?Sized>(
        &mut self,
        source: &mut S,
        timestamp_ms: u64,
        event: Option<UserEvent>,
    ) -> TickOutcome {
        let mut input = TickInput::poll(source, timestamp_ms);
        input.event = event;
        self.tick(&input)
    }

    /// Force recalibration on the next active tick
    pub fn recalibrate(&mut self) {
        self.session.recalibrate();
    }

    /// Abandon any workout and return to Idle
    ///
    /// Records and telemetry history are kept.
    pub fn reset(&mut self) {
        self.session.reset();
        tracing::info!("[Context] Session reset");
    }

    // ========================================================================
    // STREAMS AND ACCESSORS
    // ========================================================================

    /// Subscribe to per-tick HUD frames
    pub fn subscribe_feedback(&self) -> broadcast::Receiver<FeedbackFrame> {
        self.feedback_tx.subscribe()
    }

    /// Subscribe to telemetry metrics
    pub fn subscribe_metrics(&self) -> broadcast::Receiver<MetricEvent> {
        self.telemetry.subscribe()
    }

    pub fn telemetry(&self) -> Arc<TelemetryCollector> {
        Arc::clone(&self.telemetry)
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    pub fn session(&self) -> &WorkoutSession {
        &self.session
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    /// Replace the player profile, e.g. after loading it from storage
    pub fn set_profile(&mut self, profile: PlayerProfile) {
        self.profile = profile;
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

fn now_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::angle::Orientation;
    use crate::workout::WorkoutPhase;

    fn sit_up_ticks() -> Vec<TickInput> {
        let advance = |pitch: f32, t: u64| {
            TickInput::new(Orientation::new(pitch, 0.0, 0.0), t).with_event(UserEvent::Advance)
        };
        let sample = |pitch: f32, t: u64| TickInput::new(Orientation::new(pitch, 0.0, 0.0), t);
        vec![
            advance(0.0, 0),
            advance(300.0, 100),
            advance(30.0, 200),
            advance(30.0, 300),
            sample(300.0, 400),
            sample(30.0, 500),
        ]
    }

    #[test]
    fn test_appcontext_new() {
        let ctx = AppContext::default();
        assert_eq!(ctx.session().phase(), WorkoutPhase::Idle);
        assert_eq!(ctx.profile().name, "Player");
        assert_eq!(ctx.telemetry_snapshot().total_events, 0);
    }

    #[test]
    fn test_start_workout_uses_configured_defaults() {
        let mut config = AppConfig::default();
        config.workout = WorkoutConfig::new(4, 12, 7.5);
        let mut ctx = AppContext::new(config);

        ctx.start_workout(ExerciseKind::SitUp, None).unwrap();
        assert_eq!(ctx.session().config().reps, 12);
        assert_eq!(ctx.session().phase(), WorkoutPhase::Calibrating);
    }

    #[test]
    fn test_rejected_start_reports_error_metric() {
        let mut ctx = AppContext::default();
        let result = ctx.start_workout(ExerciseKind::SitUp, Some(WorkoutConfig::new(1, 0, 5.0)));

        assert!(result.is_err());
        assert_eq!(ctx.session().phase(), WorkoutPhase::Idle);
        assert!(matches!(
            ctx.telemetry_snapshot().recent.last(),
            Some(MetricEvent::Error { code: 3001, .. })
        ));
    }

    #[test]
    fn test_finished_workout_is_recorded_in_profile() {
        let mut ctx = AppContext::default();
        ctx.start_workout(ExerciseKind::SitUp, Some(WorkoutConfig::new(1, 1, 5.0)))
            .unwrap();

        let mut finished = false;
        for input in sit_up_ticks() {
            finished |= ctx.tick(&input).finished();
        }

        assert!(finished);
        let record = ctx.profile().latest(ExerciseKind::SitUp).unwrap();
        assert_eq!(record.set_reps, vec![1]);
        assert!(ctx
            .telemetry_snapshot()
            .recent
            .iter()
            .any(|event| matches!(event, MetricEvent::SessionFinished { .. })));
    }

    #[test]
    fn test_feedback_subscribers_receive_frames() {
        let mut ctx = AppContext::default();
        let mut rx = ctx.subscribe_feedback();
        ctx.start_workout(ExerciseKind::TwistCrunch, None).unwrap();

        ctx.tick(&TickInput::new(Orientation::default(), 0));

        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.phase, WorkoutPhase::Calibrating);
        assert_eq!(frame.pose_count, 3);
    }

    #[test]
    fn test_poll_samples_source() {
        let mut ctx = AppContext::default();
        ctx.start_workout(ExerciseKind::SitUp, None).unwrap();
        let mut source = Orientation::new(300.0, 0.0, 0.0);

        ctx.poll(&mut source, 0, Some(UserEvent::Advance));
        let outcome = ctx.poll(&mut source, 10, Some(UserEvent::Advance));

        assert_eq!(ctx.session().calibration().references().get(1).unwrap().pitch, 120.0);
        assert!(outcome.feedback.prompt.is_some());
    }

    #[test]
    fn test_reset_keeps_history() {
        let mut ctx = AppContext::default();
        ctx.start_workout(ExerciseKind::SitUp, Some(WorkoutConfig::new(1, 1, 5.0)))
            .unwrap();
        for input in sit_up_ticks() {
            ctx.tick(&input);
        }

        ctx.reset();
        ctx.reset();

        assert_eq!(ctx.session().phase(), WorkoutPhase::Idle);
        assert_eq!(ctx.profile().records(ExerciseKind::SitUp).len(), 1);
    }
}
