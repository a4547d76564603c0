//! Trace utilities for the deterministic CLI harness.
//!
//! This module discovers recorded orientation traces, parses optional
//! expectation JSON, and replays the ticks through a fresh `AppContext`.
//! It exists so CI and QA can exercise the full session state machine
//! without a headset.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, WorkoutConfig};
use crate::context::AppContext;
use crate::exercise::ExerciseKind;
use crate::input::TickInput;
use crate::workout::{WorkoutEvent, WorkoutPhase, WorkoutStats};

pub mod synth;

/// Default location for trace/expectation JSON assets.
pub const DEFAULT_TRACE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

const TRACE_SUFFIX: &str = ".trace.json";
const EXPECT_SUFFIX: &str = ".expect.json";

/// Recorded headset session: the workout that was started plus every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTrace {
    pub exercise: ExerciseKind,
    #[serde(default)]
    pub config: WorkoutConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub ticks: Vec<TickInput>,
}

/// Metadata describing an available trace.
#[derive(Clone, Debug)]
pub struct TraceMetadata {
    pub name: String,
    pub trace_path: PathBuf,
    pub expect_path: Option<PathBuf>,
}

/// Loaded trace with its expectations.
pub struct TraceData {
    pub metadata: TraceMetadata,
    pub trace: WorkoutTrace,
    pub expectations: Option<TraceExpectations>,
}

/// JSON expectation schema for trace verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceExpectations {
    #[serde(default)]
    pub notes: Option<String>,
    pub total_reps: u32,
    pub sets_completed: u32,
    pub finished: bool,
    /// Checked only when present
    #[serde(default)]
    pub early: Option<bool>,
    /// Checked only when present
    #[serde(default)]
    pub calories: Option<f32>,
    #[serde(default = "default_calorie_tolerance")]
    pub calorie_tolerance: f32,
}

fn default_calorie_tolerance() -> f32 {
    0.01
}

impl TraceExpectations {
    pub fn verify(&self, report: &ReplayReport) -> std::result::Result<(), ExpectationDiff> {
        let mut failures = Vec::new();
        let mut check = |field: &'static str, expected: serde_json::Value, actual: serde_json::Value| {
            if expected != actual {
                failures.push(ExpectationFailure {
                    field,
                    expected,
                    actual,
                });
            }
        };

        check(
            "total_reps",
            self.total_reps.into(),
            report.stats.total_reps.into(),
        );
        check(
            "sets_completed",
            self.sets_completed.into(),
            report.stats.sets_completed.into(),
        );
        check("finished", self.finished.into(), report.finished.into());
        if let Some(early) = self.early {
            check("early", early.into(), report.early.into());
        }

        if let Some(calories) = self.calories {
            if (report.stats.calories - calories).abs() > self.calorie_tolerance {
                failures.push(ExpectationFailure {
                    field: "calories",
                    expected: calories.into(),
                    actual: report.stats.calories.into(),
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExpectationDiff { failures })
        }
    }
}

/// Outcome of comparing a replay with expectations.
#[derive(Debug)]
pub struct ExpectationDiff {
    pub failures: Vec<ExpectationFailure>,
}

impl ExpectationDiff {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "failures": self.failures.iter().map(|failure| {
                serde_json::json!({
                    "field": failure.field,
                    "expected": failure.expected,
                    "actual": failure.actual,
                })
            }).collect::<Vec<_>>()
        })
    }
}

/// Detailed diff entry for a single mismatching field.
#[derive(Debug)]
pub struct ExpectationFailure {
    pub field: &'static str,
    pub expected: serde_json::Value,
    pub actual: serde_json::Value,
}

/// Catalog responsible for discovering traces on disk.
pub struct TraceCatalog {
    root: PathBuf,
}

impl TraceCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all traces by their metadata.
    pub fn discover(&self) -> Result<Vec<TraceMetadata>> {
        let mut traces = Vec::new();
        if !self.root.exists() {
            return Ok(traces);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(metadata) = metadata_for_path(&entry.path()) {
                    traces.push(metadata);
                }
            }
        }

        traces.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(traces)
    }

    /// Load a trace plus expectations for the provided name or path.
    pub fn load(&self, trace: &str, override_expect: Option<PathBuf>) -> Result<TraceData> {
        let trace_path = self.resolve_trace_path(trace)?;
        let metadata = metadata_for_path(&trace_path)
            .ok_or_else(|| anyhow!("Invalid trace file name {}", trace_path.display()))?;

        let json = fs::read_to_string(&trace_path)
            .with_context(|| format!("reading trace {}", trace_path.display()))?;
        let parsed: WorkoutTrace = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", trace_path.display()))?;

        let expectation_path = override_expect.or(metadata.expect_path.clone());
        let expectations = match expectation_path {
            Some(path) => {
                let json = fs::read_to_string(&path)
                    .with_context(|| format!("reading expectation {}", path.display()))?;
                Some(
                    serde_json::from_str(&json)
                        .with_context(|| format!("parsing {}", path.display()))?,
                )
            }
            None => None,
        };

        Ok(TraceData {
            metadata,
            trace: parsed,
            expectations,
        })
    }

    fn resolve_trace_path(&self, trace: &str) -> Result<PathBuf> {
        let as_path = Path::new(trace);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }

        let candidate = self.root.join(format!("{trace}{TRACE_SUFFIX}"));
        if candidate.exists() {
            Ok(candidate)
        } else {
            Err(anyhow!(
                "Trace '{trace}' not found in {}",
                self.root.display()
            ))
        }
    }
}

impl Default for TraceCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_ROOT)
    }
}

/// `<dir>/<name>.trace.json` → metadata with the sibling `<name>.expect.json`, if any
fn metadata_for_path(path: &Path) -> Option<TraceMetadata> {
    let file_name = path.file_name()?.to_str()?;
    let name = file_name.strip_suffix(TRACE_SUFFIX)?;
    if name.is_empty() {
        return None;
    }

    let expect_path = path.with_file_name(format!("{name}{EXPECT_SUFFIX}"));
    Some(TraceMetadata {
        name: name.to_string(),
        trace_path: path.to_path_buf(),
        expect_path: expect_path.exists().then_some(expect_path),
    })
}

/// Result of replaying one trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub trace: String,
    pub exercise: ExerciseKind,
    pub tick_count: usize,
    pub final_phase: WorkoutPhase,
    pub finished: bool,
    pub early: bool,
    /// Stats at finish, or at the last tick when the trace never finished
    pub stats: WorkoutStats,
    pub metric_count: u64,
    pub events: Vec<WorkoutEvent>,
}

/// Executes traces by feeding their ticks through a fresh context.
pub struct TraceRunner {
    app_config: AppConfig,
}

impl TraceRunner {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }

    pub fn run(&self, name: &str, trace: &WorkoutTrace) -> Result<ReplayReport> {
        let mut ctx = AppContext::new(self.app_config.clone());
        ctx.start_workout(trace.exercise, Some(trace.config))
            .with_context(|| format!("starting {} workout for trace {name}", trace.exercise))?;

        let mut events = Vec::new();
        let mut finished = None;
        for tick in &trace.ticks {
            let outcome = ctx.tick(tick);
            for event in outcome.events {
                if let WorkoutEvent::Finished { stats, early } = &event {
                    finished = Some((stats.clone(), *early));
                }
                events.push(event);
            }
        }

        let (stats, early) = finished
            .clone()
            .unwrap_or_else(|| (ctx.session().stats(), false));

        tracing::info!(
            "[Replay] {}: {} ticks, {} reps, {} sets, finished={}",
            name,
            trace.ticks.len(),
            stats.total_reps,
            stats.sets_completed,
            finished.is_some()
        );

        Ok(ReplayReport {
            trace: name.to_string(),
            exercise: trace.exercise,
            tick_count: trace.ticks.len(),
            final_phase: ctx.session().phase(),
            finished: finished.is_some(),
            early,
            stats,
            metric_count: ctx.telemetry_snapshot().total_events,
            events,
        })
    }

    /// Replay a loaded trace under its catalog name
    pub fn run_data(&self, data: &TraceData) -> Result<ReplayReport> {
        self.run(&data.metadata.name, &data.trace)
    }
}

impl Default for TraceRunner {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
