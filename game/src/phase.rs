use serde::{Deserialize, Serialize};

/// Where the game currently is. Level and segment indices live on
/// [`crate::trace_core::TraceCore`] next to the phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing is being traced; waiting for start.
    Idle,
    /// A segment of the current level is being traced against the clock.
    Running,
    /// The level finished; waiting for the player (or the auto-advance
    /// driver) to confirm before the next level begins.
    LevelTransition,
    /// Every level has been completed.
    AllLevelsComplete,
    /// Motion was detected mid-attempt; the message is shown until the
    /// player acknowledges it.
    Aborted { message: String },
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Idle
    }
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, GamePhase::Aborted { .. })
    }
}

/// Everything that can happen to the controller, from the UI, the clock
/// driver, or the detection subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Begin the game from level 0. Ignored outside Idle.
    Start,
    /// Freeze the current attempt without resetting indices.
    Stop,
    /// The player confirmed the level-complete notification.
    ConfirmLevel,
    /// External interrupt from the motion detector. Ignored unless a
    /// level is actively running.
    MotionDetected { message: String },
    /// The player dismissed the abort message.
    AcknowledgeError,
    /// Back to Idle with all indices zeroed.
    Reset,
    /// Re-enter the current level from its first segment.
    RestartLevel,
}

/// Side-effect requests returned by the controller. The controller never
/// performs them; the driver does, which keeps every transition a plain
/// function under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEffect {
    /// Tell the detection subsystem to start watching.
    StartDetection,
    /// Tell the detection subsystem to stop watching.
    StopDetection,
    /// Tell the detection subsystem to reset its video feed.
    ResetFeed,
    /// Present the level-complete notification for `level` (0-based).
    Announce {
        level: usize,
        message: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_phase_is_idle() {
        assert_eq!(GamePhase::default(), GamePhase::Idle);
    }

    #[test]
    fn phase_predicates() {
        assert!(GamePhase::Running.is_running());
        assert!(!GamePhase::Idle.is_running());
        assert!(
            GamePhase::Aborted {
                message: "moved".to_string()
            }
            .is_aborted()
        );
    }
}
