use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What one tick of the clock observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockTick {
    /// The clock is not running; nothing happened.
    Idle,
    /// The segment is still being traced; `progress` is in [0, 1).
    InProgress { progress: f32 },
    /// The segment's budget is used up (immediately so for a zero budget).
    SegmentComplete,
}

/// Per-segment countdown clock.
///
/// Advanced by `tick(dt)` from the driver's fixed-interval loop rather than
/// reading wall time itself, which keeps every transition deterministic
/// under test. Only one segment is ever timed at once: `start` stops any
/// previous run before arming, and `stop` is idempotent, so the
/// stop-before-start discipline holds on every path by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentClock {
    #[serde(with = "crate::serde_duration")]
    elapsed: Duration,
    #[serde(with = "crate::serde_duration")]
    duration: Duration,
    running: bool,
}

impl SegmentClock {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Arms the clock for a fresh segment of `duration`, stopping any
    /// previous run first.
    pub fn start(&mut self, duration: Duration) {
        self.stop();
        self.duration = duration;
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    /// Restarts the current duration from zero elapsed (next segment of
    /// the same level).
    pub fn rearm(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn tick(&mut self, dt: Duration) -> ClockTick {
        if !self.running {
            return ClockTick::Idle;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.duration {
            ClockTick::SegmentComplete
        } else {
            ClockTick::InProgress {
                progress: self.progress(),
            }
        }
    }

    /// Fraction of the segment budget consumed, in [0, 1]. A zero budget
    /// counts as already complete.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Whole seconds left for the countdown display, clamped to
    /// `[0, ceil(duration)]` so boundaries never flash 0 early or go
    /// negative.
    pub fn seconds_remaining(&self) -> u64 {
        let remaining = self.duration.saturating_sub(self.elapsed);
        let ceil_secs = |d: Duration| (d.as_millis() as u64).div_ceil(1000);
        ceil_secs(remaining).min(ceil_secs(self.duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_while_running() {
        let mut clock = SegmentClock::idle();
        assert_eq!(clock.tick(Duration::from_secs(1)), ClockTick::Idle);
        assert_eq!(clock.elapsed(), Duration::ZERO);

        clock.start(Duration::from_secs(10));
        clock.tick(Duration::from_secs(2));
        assert_eq!(clock.elapsed(), Duration::from_secs(2));

        clock.stop();
        assert_eq!(clock.tick(Duration::from_secs(3)), ClockTick::Idle);
        assert_eq!(clock.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn progress_is_monotonic_until_complete() {
        let mut clock = SegmentClock::idle();
        clock.start(Duration::from_millis(1000));

        let mut last = 0.0;
        for _ in 0..33 {
            match clock.tick(Duration::from_millis(30)) {
                ClockTick::InProgress { progress } => {
                    assert!(progress >= last);
                    assert!(progress < 1.0);
                    last = progress;
                }
                ClockTick::SegmentComplete => return,
                ClockTick::Idle => panic!("clock stopped unexpectedly"),
            }
        }
        assert_eq!(clock.tick(Duration::from_millis(30)), ClockTick::SegmentComplete);
    }

    #[test]
    fn completes_exactly_at_the_budget() {
        let mut clock = SegmentClock::idle();
        clock.start(Duration::from_millis(100));
        assert_eq!(
            clock.tick(Duration::from_millis(100)),
            ClockTick::SegmentComplete
        );
    }

    #[test]
    fn zero_budget_completes_on_the_first_tick() {
        let mut clock = SegmentClock::idle();
        clock.start(Duration::ZERO);
        assert_eq!(clock.progress(), 1.0);
        assert_eq!(
            clock.tick(Duration::from_millis(30)),
            ClockTick::SegmentComplete
        );
    }

    #[test]
    fn start_discards_a_previous_run() {
        let mut clock = SegmentClock::idle();
        clock.start(Duration::from_secs(10));
        clock.tick(Duration::from_secs(9));

        clock.start(Duration::from_secs(10));
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert!(clock.is_running());
    }

    #[test]
    fn rearm_resets_elapsed_only() {
        let mut clock = SegmentClock::idle();
        clock.start(Duration::from_secs(5));
        clock.tick(Duration::from_secs(3));

        clock.rearm();
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert_eq!(clock.duration(), Duration::from_secs(5));
        assert!(clock.is_running());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut clock = SegmentClock::idle();
        clock.stop();
        clock.stop();
        assert!(!clock.is_running());

        clock.start(Duration::from_secs(1));
        clock.stop();
        clock.stop();
        assert!(!clock.is_running());
    }

    #[test]
    fn countdown_is_clamped_to_the_budget() {
        let mut clock = SegmentClock::idle();
        clock.start(Duration::from_millis(2500));
        assert_eq!(clock.seconds_remaining(), 3);

        clock.tick(Duration::from_millis(600));
        assert_eq!(clock.seconds_remaining(), 2);

        // Overshoot past the budget: never negative, never wraps.
        clock.tick(Duration::from_millis(10_000));
        assert_eq!(clock.seconds_remaining(), 0);
    }
}
