use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::{ClockTick, SegmentClock};
use crate::levels::LevelTable;
use crate::path::TracePath;
use crate::phase::{GameEffect, GameEvent, GamePhase};

/// The whole game state and its controller.
///
/// All mutation goes through [`handle`](TraceCore::handle) and
/// [`tick`](TraceCore::tick) on the driver thread; both return the side
/// effects the driver must perform (detection signals, announcements).
/// `level == level_count` means every level has been completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceCore {
    path: TracePath,
    levels: LevelTable,
    level: usize,
    segment: usize,
    phase: GamePhase,
    clock: SegmentClock,
}

impl TraceCore {
    pub fn new(path: TracePath, levels: LevelTable) -> Self {
        Self {
            path,
            levels,
            level: 0,
            segment: 0,
            phase: GamePhase::Idle,
            clock: SegmentClock::idle(),
        }
    }

    pub fn path(&self) -> &TracePath {
        &self.path
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn segment(&self) -> usize {
        self.segment
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn clock(&self) -> &SegmentClock {
        &self.clock
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn handle(&mut self, event: GameEvent) -> Vec<GameEffect> {
        match event {
            GameEvent::Start => self.start(),
            GameEvent::Stop => self.stop(),
            GameEvent::ConfirmLevel => self.confirm_level(),
            GameEvent::MotionDetected { message } => self.interrupt(message),
            GameEvent::AcknowledgeError => self.acknowledge_error(),
            GameEvent::Reset => self.reset(),
            GameEvent::RestartLevel => self.restart_level(),
        }
    }

    /// One clock tick of `dt`. Advances the in-progress segment and runs
    /// the segment-complete / level-complete transitions.
    pub fn tick(&mut self, dt: Duration) -> Vec<GameEffect> {
        if !self.phase.is_running() {
            return Vec::new();
        }

        match self.clock.tick(dt) {
            ClockTick::Idle | ClockTick::InProgress { .. } => Vec::new(),
            ClockTick::SegmentComplete => {
                if self.segment == self.path.last_segment() {
                    // Final segment of the level: the clock must stop
                    // before any further tick can fire.
                    self.clock.stop();
                    let message = self
                        .levels
                        .spec(self.level)
                        .and_then(|spec| spec.message.clone());
                    self.phase = GamePhase::LevelTransition;
                    vec![
                        GameEffect::StopDetection,
                        GameEffect::Announce {
                            level: self.level,
                            message,
                        },
                    ]
                } else {
                    // Each segment gets the full level budget again; the
                    // budget is per segment, not shared across the level.
                    self.segment += 1;
                    self.clock.rearm();
                    Vec::new()
                }
            }
        }
    }

    fn start(&mut self) -> Vec<GameEffect> {
        if self.phase != GamePhase::Idle {
            return Vec::new();
        }
        let Some(spec) = self.levels.spec(0) else {
            return Vec::new();
        };
        self.level = 0;
        self.segment = 0;
        self.phase = GamePhase::Running;
        self.clock.start(spec.duration);
        vec![
            GameEffect::StopDetection,
            GameEffect::ResetFeed,
            GameEffect::StartDetection,
        ]
    }

    fn stop(&mut self) -> Vec<GameEffect> {
        self.clock.stop();
        if self.phase.is_running() {
            self.phase = GamePhase::Idle;
        }
        vec![GameEffect::StopDetection]
    }

    fn confirm_level(&mut self) -> Vec<GameEffect> {
        if self.phase != GamePhase::LevelTransition {
            return Vec::new();
        }
        let next = self.level + 1;
        match self.levels.spec(next) {
            Some(spec) => {
                self.level = next;
                self.segment = 0;
                self.phase = GamePhase::Running;
                self.clock.start(spec.duration);
                vec![GameEffect::ResetFeed, GameEffect::StartDetection]
            }
            None => {
                self.level = self.levels.level_count();
                self.phase = GamePhase::AllLevelsComplete;
                self.clock.stop();
                vec![GameEffect::StopDetection]
            }
        }
    }

    fn interrupt(&mut self, message: String) -> Vec<GameEffect> {
        if !self.phase.is_running() {
            // Interrupts only matter while a level is actively running.
            return Vec::new();
        }
        self.clock.stop();
        self.phase = GamePhase::Aborted { message };
        vec![GameEffect::StopDetection]
    }

    fn acknowledge_error(&mut self) -> Vec<GameEffect> {
        if !self.phase.is_aborted() {
            return Vec::new();
        }
        self.clock.stop();
        self.phase = GamePhase::Idle;
        Vec::new()
    }

    fn reset(&mut self) -> Vec<GameEffect> {
        self.clock.stop();
        self.level = 0;
        self.segment = 0;
        self.phase = GamePhase::Idle;
        vec![GameEffect::StopDetection, GameEffect::ResetFeed]
    }

    fn restart_level(&mut self) -> Vec<GameEffect> {
        self.clock.stop();
        // After full completion, restart re-enters the final level.
        let level = self.level.min(self.levels.level_count().saturating_sub(1));
        let Some(spec) = self.levels.spec(level) else {
            return Vec::new();
        };
        self.level = level;
        self.segment = 0;
        self.phase = GamePhase::Running;
        self.clock.start(spec.duration);
        vec![
            GameEffect::StopDetection,
            GameEffect::ResetFeed,
            GameEffect::StartDetection,
        ]
    }

    pub fn snapshot(&self) -> TraceSnapshot {
        let (traced_segments, active_progress, seconds_remaining) = match &self.phase {
            GamePhase::Running => (
                self.segment,
                Some(self.clock.progress()),
                Some(self.clock.seconds_remaining()),
            ),
            // The confirmation banner sits over the fully traced level.
            GamePhase::LevelTransition => (self.path.len(), None, None),
            // Progress stays frozen on screen under the error panel.
            GamePhase::Aborted { .. } => (self.segment, Some(self.clock.progress()), None),
            GamePhase::Idle | GamePhase::AllLevelsComplete => (0, None, None),
        };

        let announcement = match self.phase {
            GamePhase::LevelTransition => self
                .levels
                .spec(self.level)
                .and_then(|spec| spec.message.clone()),
            _ => None,
        };

        TraceSnapshot {
            phase: self.phase.clone(),
            level: self.level,
            level_count: self.levels.level_count(),
            traced_segments,
            active_progress,
            seconds_remaining,
            announcement,
        }
    }
}

/// Read-only render model handed to the progress renderer and the level
/// indicator. Derived from [`TraceCore`]; never fed back into it.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSnapshot {
    pub phase: GamePhase,
    pub level: usize,
    pub level_count: usize,
    /// Number of segments drawn fully solid, starting from segment 0.
    pub traced_segments: usize,
    /// Fraction of the segment after the solid ones, if one is mid-trace.
    pub active_progress: Option<f32>,
    pub seconds_remaining: Option<u64>,
    /// Level-complete message to show during the transition, if the level
    /// defines one.
    pub announcement: Option<String>,
}
