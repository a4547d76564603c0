// Per-tick input: headset orientation plus discrete user events
//
// The presentation layer polls its sensor and button state once per frame
// and hands the result to the session as a TickInput. Only one discrete
// event is honoured per tick.

use serde::{Deserialize, Serialize};

use crate::analysis::angle::Orientation;

/// Edge-triggered user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserEvent {
    /// Headset button/trigger during calibration
    Advance,
    /// End the workout early
    Stop,
    /// Dismiss the results screen
    Confirm,
}

/// Source of live headset orientation
pub trait OrientationSource {
    /// Current raw orientation in degrees
    fn sample(&mut self) -> Orientation;
}

/// Fixed orientation, handy for tests and idle screens
impl OrientationSource for Orientation {
    fn sample(&mut self) -> Orientation {
        *self
    }
}

/// Everything the session reads during one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Raw headset orientation
    pub orientation: Orientation,
    /// Monotonic clock reading in milliseconds
    pub timestamp_ms: u64,
    /// At most one user event observed this tick
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<UserEvent>,
}

impl TickInput {
    pub fn new(orientation: Orientation, timestamp_ms: u64) -> Self {
        Self {
            orientation,
            timestamp_ms,
            event: None,
        }
    }

    /// Poll an orientation source
    pub fn poll<S: OrientationSource + ?Sized>(source: &mut S, timestamp_ms: u64) -> Self {
        Self::new(source.sample(), timestamp_ms)
    }

    pub fn with_event(mut self, event: UserEvent) -> Self {
        self.event = Some(event);
        self
    }

    /// Attach the first raised flag, in advance → stop → confirm order
    ///
    /// Additional flags raised during the same tick are dropped.
    pub fn with_flags(mut self, advance: bool, stop: bool, confirm: bool) -> Self {
        self.event = [
            (advance, UserEvent::Advance),
            (stop, UserEvent::Stop),
            (confirm, UserEvent::Confirm),
        ]
        .into_iter()
        .find_map(|(raised, event)| raised.then_some(event));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_flags_keeps_first_event() {
        let input = TickInput::new(Orientation::default(), 0).with_flags(false, true, true);
        assert_eq!(input.event, Some(UserEvent::Stop));

        let input = TickInput::new(Orientation::default(), 0).with_flags(true, true, true);
        assert_eq!(input.event, Some(UserEvent::Advance));

        let input = TickInput::new(Orientation::default(), 0).with_flags(false, false, false);
        assert_eq!(input.event, None);
    }

    #[test]
    fn test_poll_reads_source() {
        let mut source = Orientation::new(10.0, 20.0, 30.0);
        let input = TickInput::poll(&mut source, 42);
        assert_eq!(input.orientation, Orientation::new(10.0, 20.0, 30.0));
        assert_eq!(input.timestamp_ms, 42);
        assert!(input.event.is_none());
    }

    #[test]
    fn test_deserialize_without_event() {
        let json = r#"{ "orientation": { "pitch": 1.0, "yaw": 2.0, "roll": 3.0 }, "timestamp_ms": 5 }"#;
        let input: TickInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.event, None);
    }
}
