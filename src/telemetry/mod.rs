//! Workout telemetry collector.
//!
//! The collector records pose, rep, set, calibration and error metrics into a
//! bounded history plus a broadcast stream. It is owned by the application
//! context; there is no process-wide hub.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::config::TelemetryConfig;
use crate::error::ErrorCode;
use crate::workout::WorkoutEvent;

pub mod events;

pub use events::MetricEvent;

/// Snapshot of collector state for CLI reporting.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySnapshot {
    pub recent: Vec<MetricEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
}

/// Broadcast-based collector retaining a bounded history of metrics.
pub struct TelemetryCollector {
    tx: broadcast::Sender<MetricEvent>,
    history: Mutex<VecDeque<MetricEvent>>,
    history_capacity: usize,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
}

impl TelemetryCollector {
    pub fn new(buffer: usize, history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self {
            tx,
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::new(config.channel_capacity, config.history_capacity)
    }

    /// History survives a panicked publisher; the queue itself is always consistent
    fn lock_history(&self) -> MutexGuard<'_, VecDeque<MetricEvent>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn publish(&self, event: MetricEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        if self.history_capacity == 0 {
            self.dropped_history.fetch_add(1, Ordering::Relaxed);
        } else {
            let mut history = self.lock_history();
            if history.len() == self.history_capacity {
                history.pop_front();
                self.dropped_history.fetch_add(1, Ordering::Relaxed);
            }
            history.push_back(event.clone());
        }

        let _ = self.tx.send(event);
    }

    /// Publish the metric form of every session event from one tick
    pub fn record_workout_events(&self, events: &[WorkoutEvent], timestamp_ms: u64) {
        events
            .iter()
            .filter_map(|event| MetricEvent::from_workout_event(event, timestamp_ms))
            .for_each(|metric| self.publish(metric));
    }

    pub fn record_error<E: ErrorCode>(&self, err: &E, context: impl Into<String>) {
        self.publish(MetricEvent::Error {
            code: err.code(),
            context: context.into(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let history = self.lock_history();
        TelemetrySnapshot {
            recent: history.iter().cloned().collect(),
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::from_config(&TelemetryConfig::default())
    }
}
