// Synthetic trace generation
//
// Builds a plausible headset trace for an exercise: the calibration
// walkthrough at the exercise's key poses, then repeated cycles through the
// poses with linear movement between them and seeded uniform jitter. The same
// seed always yields the same trace.

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analysis::angle::{angular_delta, wrap_degrees, Orientation};
use crate::config::WorkoutConfig;
use crate::exercise::ExerciseKind;
use crate::input::{TickInput, UserEvent};
use crate::replay::WorkoutTrace;

/// Parameters for one synthetic trace
#[derive(Debug, Clone, Copy)]
pub struct SynthOptions {
    pub exercise: ExerciseKind,
    pub config: WorkoutConfig,
    /// Reps to perform; fewer than `sets × reps` ends the trace with a stop
    pub reps_performed: u32,
    /// Maximum jitter per axis (degrees)
    pub noise_degrees: f32,
    /// Samples spent moving from one pose to the next
    pub ticks_per_transition: u32,
    pub tick_interval_ms: u64,
    pub seed: u64,
}

impl SynthOptions {
    pub fn new(exercise: ExerciseKind, config: WorkoutConfig) -> Self {
        Self {
            exercise,
            config,
            reps_performed: config.sets.saturating_mul(config.reps),
            noise_degrees: 1.5,
            ticks_per_transition: 6,
            tick_interval_ms: 50,
            seed: 7,
        }
    }
}

/// Raw headset orientation at each key pose of an exercise
pub fn key_poses(exercise: ExerciseKind) -> Option<Vec<Orientation>> {
    match exercise {
        ExerciseKind::SitUp => Some(vec![
            Orientation::new(300.0, 0.0, 0.0),
            Orientation::new(30.0, 0.0, 0.0),
        ]),
        ExerciseKind::TwistCrunch => Some(vec![
            Orientation::new(300.0, 0.0, 0.0),
            Orientation::new(20.0, 35.0, 0.0),
            Orientation::new(20.0, 325.0, 0.0),
        ]),
        ExerciseKind::TwistLunge => Some(vec![
            Orientation::new(0.0, 0.0, 0.0),
            Orientation::new(15.0, 40.0, 0.0),
            Orientation::new(15.0, 320.0, 0.0),
        ]),
        ExerciseKind::JumpingJack => None,
    }
}

/// Generate a deterministic trace
///
/// # Returns
/// * `Ok(WorkoutTrace)` - Calibration ticks followed by the requested reps
/// * `Err` - Exercise has no key poses, the jitter would leave the pose window,
///   or `sets × reps` does not fit in a `u32`
pub fn synthesize(options: &SynthOptions) -> Result<WorkoutTrace> {
    let poses = key_poses(options.exercise)
        .ok_or_else(|| anyhow!("No key poses for {}", options.exercise.display_name()))?;
    if options.noise_degrees < 0.0 || options.noise_degrees >= options.config.margin_degrees {
        return Err(anyhow!(
            "Noise {:.2}° must be non-negative and below the {:.2}° margin",
            options.noise_degrees,
            options.config.margin_degrees
        ));
    }

    let planned = options
        .config
        .sets
        .checked_mul(options.config.reps)
        .ok_or_else(|| {
            anyhow!(
                "Workout of {} sets x {} reps is too large to synthesize",
                options.config.sets,
                options.config.reps
            )
        })?;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut ticks = Vec::new();
    let mut t = 0u64;
    let mut push = |ticks: &mut Vec<TickInput>, orientation: Orientation, event: Option<UserEvent>| {
        let mut tick = TickInput::new(orientation, t);
        tick.event = event;
        ticks.push(tick);
        t += options.tick_interval_ms;
    };

    // intro, one capture per pose, then the completion confirm
    let rest = poses[0];
    push(&mut ticks, rest, Some(UserEvent::Advance));
    for pose in &poses {
        push(&mut ticks, *pose, Some(UserEvent::Advance));
    }
    let last = poses[poses.len() - 1];
    push(&mut ticks, last, Some(UserEvent::Advance));

    let steps = options.ticks_per_transition.max(1);
    let mut from = last;
    for _ in 0..options.reps_performed {
        for target in &poses {
            for step in 1..=steps {
                let progress = step as f32 / steps as f32;
                let sample = jitter(&mut rng, lerp(from, *target, progress), options.noise_degrees);
                push(&mut ticks, sample, None);
            }
            from = *target;
        }
    }

    if options.reps_performed < planned {
        push(&mut ticks, from, Some(UserEvent::Stop));
    }

    Ok(WorkoutTrace {
        exercise: options.exercise,
        config: options.config,
        notes: Some(format!(
            "synthetic: {} reps, seed {}, noise {:.1}°",
            options.reps_performed, options.seed, options.noise_degrees
        )),
        ticks,
    })
}

/// Interpolate along the short way around the circle
fn lerp(from: Orientation, to: Orientation, progress: f32) -> Orientation {
    let axis = |a: f32, b: f32| wrap_degrees(a + angular_delta(b, a) * progress);
    Orientation::new(
        axis(from.pitch, to.pitch),
        axis(from.yaw, to.yaw),
        axis(from.roll, to.roll),
    )
}

fn jitter(rng: &mut StdRng, orientation: Orientation, noise: f32) -> Orientation {
    if noise <= 0.0 {
        return orientation;
    }
    let mut axis = |value: f32| wrap_degrees(value + rng.gen_range(-noise..noise));
    Orientation::new(
        axis(orientation.pitch),
        axis(orientation.yaw),
        axis(orientation.roll),
    )
}
