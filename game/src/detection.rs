use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use crate::phase::GameEffect;

/// Fire-and-forget signals to the external motion-detection subsystem.
/// The controller never waits for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSignal {
    StartDetection,
    StopDetection,
    ResetFeed,
}

impl DetectionSignal {
    /// Wire event name, matching what the detection service listens for.
    pub fn wire_name(self) -> &'static str {
        match self {
            DetectionSignal::StartDetection => "start_detection",
            DetectionSignal::StopDetection => "stop_detection",
            DetectionSignal::ResetFeed => "reset_video_feed",
        }
    }
}

impl GameEffect {
    /// The detection signal this effect maps to, if any.
    pub fn detection_signal(&self) -> Option<DetectionSignal> {
        match self {
            GameEffect::StartDetection => Some(DetectionSignal::StartDetection),
            GameEffect::StopDetection => Some(DetectionSignal::StopDetection),
            GameEffect::ResetFeed => Some(DetectionSignal::ResetFeed),
            GameEffect::Announce { .. } => None,
        }
    }
}

/// Inbound interrupt payload from the detection subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionEvent {
    pub message: String,
}

/// Transport seam for outbound signals. Implementations must not block
/// the game loop and must swallow transport failures.
pub trait DetectionLink {
    fn send(&self, signal: DetectionSignal);
}

/// Discards every signal; used when detection is disabled and in tests
/// that don't care about signal traffic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLink;

impl DetectionLink for NullLink {
    fn send(&self, _signal: DetectionSignal) {}
}

/// Forwards signals into an mpsc channel. The headful bridge consumes the
/// channel; tests use it to assert signal order.
#[derive(Debug, Clone)]
pub struct ChannelLink {
    tx: Sender<DetectionSignal>,
}

impl ChannelLink {
    pub fn new(tx: Sender<DetectionSignal>) -> Self {
        Self { tx }
    }
}

impl DetectionLink for ChannelLink {
    fn send(&self, signal: DetectionSignal) {
        // A closed receiver just means nobody is listening anymore.
        let _ = self.tx.send(signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn wire_names_match_the_detection_service() {
        assert_eq!(DetectionSignal::StartDetection.wire_name(), "start_detection");
        assert_eq!(DetectionSignal::StopDetection.wire_name(), "stop_detection");
        assert_eq!(DetectionSignal::ResetFeed.wire_name(), "reset_video_feed");
    }

    #[test]
    fn announce_is_not_a_detection_signal() {
        let announce = GameEffect::Announce {
            level: 0,
            message: None,
        };
        assert_eq!(announce.detection_signal(), None);
        assert_eq!(
            GameEffect::ResetFeed.detection_signal(),
            Some(DetectionSignal::ResetFeed)
        );
    }

    #[test]
    fn channel_link_forwards_and_survives_a_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        let link = ChannelLink::new(tx);
        link.send(DetectionSignal::StartDetection);
        assert_eq!(rx.recv().unwrap(), DetectionSignal::StartDetection);

        drop(rx);
        link.send(DetectionSignal::StopDetection); // must not panic
    }

    #[test]
    fn motion_event_parses_the_wire_payload() {
        let event: MotionEvent =
            serde_json::from_str(r#"{"message":"Motion detected in this Level!"}"#).unwrap();
        assert_eq!(event.message, "Motion detected in this Level!");
    }
}
