use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One level: a per-segment time budget plus an optional completion
/// message shown when the level is finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    #[serde(with = "crate::serde_duration")]
    pub duration: Duration,
    #[serde(default)]
    pub message: Option<String>,
}

impl LevelSpec {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            message: None,
        }
    }

    pub fn with_message(duration: Duration, message: impl Into<String>) -> Self {
        Self {
            duration,
            message: Some(message.into()),
        }
    }
}

/// The ordered level sequence. Index = level number - 1; immutable after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTable {
    levels: Vec<LevelSpec>,
}

impl LevelTable {
    pub fn new(levels: Vec<LevelSpec>) -> Self {
        Self { levels }
    }

    /// The default five-level run with its completion messages.
    pub fn classic() -> Self {
        Self::new(vec![
            LevelSpec::with_message(
                Duration::from_millis(1000),
                "Level 1 completed! Get ready for Level 2.",
            ),
            LevelSpec::with_message(
                Duration::from_millis(2000),
                "Level 2 completed! Level 3 is coming up.",
            ),
            LevelSpec::with_message(
                Duration::from_millis(3000),
                "Level 3 completed! Prepare for Level 4.",
            ),
            LevelSpec::with_message(
                Duration::from_millis(4000),
                "Level 4 completed! Final level ahead!",
            ),
            LevelSpec::with_message(
                Duration::from_millis(5000),
                "Congratulations! You've successfully completed all levels of the game!",
            ),
        ])
    }

    /// The longer message-free variant; levels advance without a dialog.
    pub fn marathon() -> Self {
        Self::new(
            [5u64, 10, 15, 20, 25, 30]
                .into_iter()
                .map(|secs| LevelSpec::new(Duration::from_secs(secs)))
                .collect(),
        )
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn spec(&self, level: usize) -> Option<&LevelSpec> {
        self.levels.get(level)
    }

    pub fn is_last(&self, level: usize) -> bool {
        level + 1 >= self.levels.len()
    }
}
