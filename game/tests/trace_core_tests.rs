use std::time::Duration;

use game::levels::{LevelSpec, LevelTable};
use game::path::TracePath;
use game::phase::{GameEffect, GameEvent, GamePhase};
use game::trace_core::TraceCore;

const SEGMENTS: usize = 4; // the rectangle path

fn uniform_levels(count: usize, millis: u64) -> LevelTable {
    LevelTable::new(
        (0..count)
            .map(|_| LevelSpec::new(Duration::from_millis(millis)))
            .collect(),
    )
}

fn started_core(levels: LevelTable) -> TraceCore {
    let mut core = TraceCore::new(TracePath::rectangle(), levels);
    core.handle(GameEvent::Start);
    core
}

/// Ticks through one whole level (all four segments) and returns every
/// effect produced along the way.
fn complete_level(core: &mut TraceCore, millis: u64) -> Vec<GameEffect> {
    let mut effects = Vec::new();
    for _ in 0..SEGMENTS {
        effects.extend(core.tick(Duration::from_millis(millis)));
    }
    effects
}

#[test]
fn starting_initializes_both_indices() {
    let mut core = TraceCore::new(TracePath::rectangle(), LevelTable::classic());
    core.handle(GameEvent::Start);

    assert_eq!(core.level(), 0);
    assert_eq!(core.segment(), 0);
    assert_eq!(core.phase(), &GamePhase::Running);
    assert!(core.is_running());
}

#[test]
fn progress_is_monotonic_within_a_segment() {
    let mut core = started_core(uniform_levels(1, 1000));

    let mut last = 0.0;
    for _ in 0..30 {
        core.tick(Duration::from_millis(30));
        if core.segment() > 0 {
            break;
        }
        let progress = core
            .snapshot()
            .active_progress
            .expect("running core exposes progress");
        assert!(progress >= last, "progress went backwards: {progress} < {last}");
        last = progress;
    }
}

#[test]
fn four_segment_completions_trigger_exactly_one_transition() {
    // 4 waypoints, 1000 ms budget, four full-budget ticks.
    let mut core = started_core(uniform_levels(2, 1000));

    for expected_segment in 1..SEGMENTS {
        let effects = core.tick(Duration::from_millis(1000));
        assert!(effects.is_empty(), "mid-level segments produce no effects");
        assert_eq!(core.segment(), expected_segment);
        assert_eq!(core.phase(), &GamePhase::Running);
    }

    let effects = core.tick(Duration::from_millis(1000));
    assert_eq!(core.phase(), &GamePhase::LevelTransition);
    assert!(!core.is_running());
    assert_eq!(core.snapshot().traced_segments, SEGMENTS);

    let announces = effects
        .iter()
        .filter(|e| matches!(e, GameEffect::Announce { .. }))
        .count();
    assert_eq!(announces, 1);
    assert_eq!(effects[0], GameEffect::StopDetection);
}

#[test]
fn zero_duration_completes_on_the_first_tick() {
    // A zero budget must not divide by zero or spin.
    let mut core = started_core(uniform_levels(1, 0));

    core.tick(Duration::from_millis(30));
    assert_eq!(core.segment(), 1);
    assert_eq!(core.phase(), &GamePhase::Running);
}

#[test]
fn interrupt_mid_segment_aborts_with_the_verbatim_message() {
    // Motion arrives at elapsed = 400 ms.
    let mut core = started_core(uniform_levels(1, 1000));
    core.tick(Duration::from_millis(400));

    let message = "Motion detected in this Level! Make sure you don't move while playing the game.";
    let effects = core.handle(GameEvent::MotionDetected {
        message: message.to_string(),
    });

    assert_eq!(effects, vec![GameEffect::StopDetection]);
    assert_eq!(
        core.phase(),
        &GamePhase::Aborted {
            message: message.to_string()
        }
    );
    assert!(!core.is_running());
}

#[test]
fn interrupts_are_ignored_unless_running() {
    let motion = || GameEvent::MotionDetected {
        message: "moved".to_string(),
    };

    // Idle.
    let mut core = TraceCore::new(TracePath::rectangle(), uniform_levels(2, 100));
    assert!(core.handle(motion()).is_empty());
    assert_eq!(core.phase(), &GamePhase::Idle);

    // LevelTransition.
    let mut core = started_core(uniform_levels(2, 100));
    complete_level(&mut core, 100);
    assert_eq!(core.phase(), &GamePhase::LevelTransition);
    assert!(core.handle(motion()).is_empty());
    assert_eq!(core.phase(), &GamePhase::LevelTransition);

    // AllLevelsComplete.
    let mut core = started_core(uniform_levels(1, 100));
    complete_level(&mut core, 100);
    core.handle(GameEvent::ConfirmLevel);
    assert_eq!(core.phase(), &GamePhase::AllLevelsComplete);
    assert!(core.handle(motion()).is_empty());
    assert_eq!(core.phase(), &GamePhase::AllLevelsComplete);
}

#[test]
fn reset_returns_to_idle_from_any_state() {
    let assert_reset = |core: &mut TraceCore| {
        let effects = core.handle(GameEvent::Reset);
        assert_eq!(
            effects,
            vec![GameEffect::StopDetection, GameEffect::ResetFeed]
        );
        assert_eq!(core.phase(), &GamePhase::Idle);
        assert_eq!(core.level(), 0);
        assert_eq!(core.segment(), 0);
        assert!(!core.is_running());
    };

    // Mid-run.
    let mut core = started_core(uniform_levels(3, 100));
    core.tick(Duration::from_millis(100));
    core.tick(Duration::from_millis(40));
    assert_reset(&mut core);

    // Aborted.
    let mut core = started_core(uniform_levels(3, 100));
    core.handle(GameEvent::MotionDetected {
        message: "moved".to_string(),
    });
    assert_reset(&mut core);

    // LevelTransition.
    let mut core = started_core(uniform_levels(3, 100));
    complete_level(&mut core, 100);
    assert_reset(&mut core);

    // AllLevelsComplete.
    let mut core = started_core(uniform_levels(1, 100));
    complete_level(&mut core, 100);
    core.handle(GameEvent::ConfirmLevel);
    assert_reset(&mut core);
}

#[test]
fn completing_the_final_level_ends_the_run_without_restarting_detection() {
    // Six levels; after the last confirm no start-detection
    // signal may ever be emitted again.
    let mut core = started_core(uniform_levels(6, 50));

    for level in 0..6 {
        assert_eq!(core.level(), level);
        complete_level(&mut core, 50);
        assert_eq!(core.phase(), &GamePhase::LevelTransition);

        let effects = core.handle(GameEvent::ConfirmLevel);
        if level < 5 {
            assert_eq!(
                effects,
                vec![GameEffect::ResetFeed, GameEffect::StartDetection]
            );
        } else {
            assert_eq!(effects, vec![GameEffect::StopDetection]);
        }
    }

    assert_eq!(core.phase(), &GamePhase::AllLevelsComplete);
    assert_eq!(core.level(), 6);

    // Nothing further happens: no ticks, no signals.
    assert!(core.tick(Duration::from_secs(1)).is_empty());
    assert!(core.handle(GameEvent::ConfirmLevel).is_empty());
}

#[test]
fn restart_level_resets_the_segment_and_reuses_the_budget() {
    // Restart while 400 ms into the third of four segments.
    let mut core = started_core(uniform_levels(2, 1000));
    core.tick(Duration::from_millis(1000));
    core.tick(Duration::from_millis(1000));
    core.tick(Duration::from_millis(400)); // 400 ms into segment index 2
    assert_eq!(core.segment(), 2);

    let effects = core.handle(GameEvent::RestartLevel);
    assert_eq!(
        effects,
        vec![
            GameEffect::StopDetection,
            GameEffect::ResetFeed,
            GameEffect::StartDetection,
        ]
    );
    assert_eq!(core.level(), 0);
    assert_eq!(core.segment(), 0);
    assert_eq!(core.clock().duration(), Duration::from_millis(1000));
    assert_eq!(core.clock().elapsed(), Duration::ZERO);
    assert!(core.is_running());
}

#[test]
fn restart_after_full_completion_reenters_the_final_level() {
    let mut core = started_core(uniform_levels(2, 50));
    for _ in 0..2 {
        complete_level(&mut core, 50);
        core.handle(GameEvent::ConfirmLevel);
    }
    assert_eq!(core.phase(), &GamePhase::AllLevelsComplete);

    core.handle(GameEvent::RestartLevel);
    assert_eq!(core.phase(), &GamePhase::Running);
    assert_eq!(core.level(), 1);
    assert_eq!(core.segment(), 0);
}

#[test]
fn confirm_starts_the_next_level_with_its_own_budget() {
    let levels = LevelTable::new(vec![
        LevelSpec::new(Duration::from_millis(100)),
        LevelSpec::new(Duration::from_millis(250)),
    ]);
    let mut core = started_core(levels);
    complete_level(&mut core, 100);

    core.handle(GameEvent::ConfirmLevel);
    assert_eq!(core.phase(), &GamePhase::Running);
    assert_eq!(core.level(), 1);
    assert_eq!(core.segment(), 0);
    assert_eq!(core.clock().duration(), Duration::from_millis(250));
}

#[test]
fn the_announcement_carries_the_level_message() {
    let mut core = started_core(LevelTable::classic());
    let effects = complete_level(&mut core, 1000);

    assert_eq!(
        effects.last(),
        Some(&GameEffect::Announce {
            level: 0,
            message: Some("Level 1 completed! Get ready for Level 2.".to_string()),
        })
    );
}

#[test]
fn acknowledge_returns_to_idle_and_is_otherwise_ignored() {
    let mut core = started_core(uniform_levels(1, 1000));

    // Not aborted yet: no-op.
    assert!(core.handle(GameEvent::AcknowledgeError).is_empty());
    assert_eq!(core.phase(), &GamePhase::Running);

    core.handle(GameEvent::MotionDetected {
        message: "moved".to_string(),
    });
    let effects = core.handle(GameEvent::AcknowledgeError);
    assert!(effects.is_empty());
    assert_eq!(core.phase(), &GamePhase::Idle);
    assert!(!core.is_running());

    // Idle after acknowledgment renders a clean board.
    let snap = core.snapshot();
    assert_eq!(snap.traced_segments, 0);
    assert_eq!(snap.active_progress, None);
}

#[test]
fn countdown_is_exposed_only_while_running() {
    let mut core = started_core(uniform_levels(1, 2500));
    assert_eq!(core.snapshot().seconds_remaining, Some(3));

    core.tick(Duration::from_millis(600));
    assert_eq!(core.snapshot().seconds_remaining, Some(2));

    core.handle(GameEvent::Stop);
    assert_eq!(core.snapshot().seconds_remaining, None);
}
