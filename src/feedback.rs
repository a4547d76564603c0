//! Per-tick feedback for the presentation layer.
//!
//! The session renders everything a HUD needs into a [`FeedbackFrame`]: stats
//! and timer text, the rep-completion percentage, which pose guide to highlight and
//! the calibration prompt. Frames are pushed to a [`FeedbackSink`]; the
//! broadcast implementation fans them out to any number of UI subscribers
//! without blocking the tick.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::calibration::CalibrationPrompt;
use crate::workout::WorkoutPhase;

/// Everything the HUD renders for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackFrame {
    pub phase: WorkoutPhase,
    /// Sets/reps/calories panel
    pub stats_text: String,
    /// `mm:ss` since the workout became active
    pub elapsed_text: String,
    /// Rep-cycle position, 0-100
    pub percentage: f32,
    /// Pose guide to highlight as "next" (1-based)
    pub next_pose: Option<u8>,
    /// Number of pose guides for the exercise
    pub pose_count: u8,
    /// Calibration instruction, if calibrating
    pub prompt: Option<CalibrationPrompt>,
    /// Pose guide that mirrors the live orientation during calibration
    pub preview_pose: Option<u8>,
}

/// Consumer of feedback frames
pub trait FeedbackSink {
    fn publish(&mut self, frame: &FeedbackFrame);
}

/// Broadcast to live subscribers; frames are dropped when nobody listens
impl FeedbackSink for broadcast::Sender<FeedbackFrame> {
    fn publish(&mut self, frame: &FeedbackFrame) {
        let _ = self.send(frame.clone());
    }
}

/// Record every frame
impl FeedbackSink for Vec<FeedbackFrame> {
    fn publish(&mut self, frame: &FeedbackFrame) {
        self.push(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(percentage: f32) -> FeedbackFrame {
        FeedbackFrame {
            phase: WorkoutPhase::Active,
            stats_text: String::new(),
            elapsed_text: "00:00".to_string(),
            percentage,
            next_pose: Some(1),
            pose_count: 2,
            prompt: None,
            preview_pose: None,
        }
    }

    #[test]
    fn test_vec_sink_records_frames() {
        let mut sink: Vec<FeedbackFrame> = Vec::new();
        sink.publish(&frame(10.0));
        sink.publish(&frame(20.0));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].percentage, 20.0);
    }

    #[test]
    fn test_broadcast_sink_delivers_to_subscribers() {
        let (mut tx, mut rx) = broadcast::channel(4);
        tx.publish(&frame(42.0));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.percentage, 42.0);
    }

    #[test]
    fn test_broadcast_sink_without_subscribers_does_not_fail() {
        let (mut tx, rx) = broadcast::channel::<FeedbackFrame>(4);
        drop(rx);
        tx.publish(&frame(1.0));
    }
}
