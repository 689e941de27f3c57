use std::time::Duration;

use game::levels::LevelTable;
use game::path::TracePath;
use game::phase::{GameEffect, GameEvent, GamePhase};
use game::trace_core::TraceCore;

const TICK: Duration = Duration::from_millis(30);
const MAX_TICKS: usize = 1_000_000;

/// Drives a core through the whole run with synthetic time, confirming
/// every level as soon as it is announced. Returns the tick count.
fn run_scripted(core: &mut TraceCore) -> usize {
    let mut effects = core.handle(GameEvent::Start);
    let mut ticks = 0;

    while core.phase() != &GamePhase::AllLevelsComplete && ticks < MAX_TICKS {
        let mut announced = false;
        for effect in effects.drain(..) {
            if let GameEffect::Announce { level, message } = effect {
                println!(
                    "level {} complete: {}",
                    level + 1,
                    message.as_deref().unwrap_or("-")
                );
                announced = true;
            }
        }

        effects = if announced {
            core.handle(GameEvent::ConfirmLevel)
        } else {
            ticks += 1;
            core.tick(TICK)
        };
    }

    ticks
}

fn main() {
    let mut core = TraceCore::new(TracePath::rectangle(), LevelTable::classic());
    let ticks = run_scripted(&mut core);

    println!(
        "finished: phase {:?}, level {}/{}, {} ticks of {:?}",
        core.phase(),
        core.level(),
        core.levels().level_count(),
        ticks,
        TICK
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_run_completes_every_level() {
        let mut core = TraceCore::new(TracePath::rectangle(), LevelTable::classic());
        let ticks = run_scripted(&mut core);

        assert_eq!(core.phase(), &GamePhase::AllLevelsComplete);
        assert_eq!(core.level(), core.levels().level_count());
        assert!(ticks < MAX_TICKS);
    }
}
