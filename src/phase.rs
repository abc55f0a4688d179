/// Game-phase state machine.
///
/// Approach → Intro → Battle → Victory | Defeat.  Timed phases count down
/// one per frame; Battle ends only on a knockout.  Nothing is re-entered.

use crate::entities::GamePhase;

/// Frame counts for every timed phase.  `approach: None` opens on Intro.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseTimers {
    pub approach: Option<u32>,
    pub intro: u32,
    pub victory: u32,
    pub defeat: u32,
}

/// Outcome of one frame of phase bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseStep {
    Stay { timer: u32 },
    Advance(GamePhase),
    Finished,
}

fn rank(phase: GamePhase) -> u8 {
    match phase {
        GamePhase::Approach => 0,
        GamePhase::Intro => 1,
        GamePhase::Battle => 2,
        GamePhase::Victory | GamePhase::Defeat => 3,
    }
}

/// The phase a session opens on, with its timer.
pub fn opening_phase(timers: &PhaseTimers) -> (GamePhase, u32) {
    match timers.approach {
        Some(frames) => (GamePhase::Approach, frames),
        None => (GamePhase::Intro, timers.intro),
    }
}

pub fn duration(phase: GamePhase, timers: &PhaseTimers) -> u32 {
    match phase {
        GamePhase::Approach => timers.approach.unwrap_or(0),
        GamePhase::Intro => timers.intro,
        GamePhase::Battle => 0,
        GamePhase::Victory => timers.victory,
        GamePhase::Defeat => timers.defeat,
    }
}

/// Where a timed phase goes when its countdown ends.
pub fn successor(phase: GamePhase) -> Option<GamePhase> {
    match phase {
        GamePhase::Approach => Some(GamePhase::Intro),
        GamePhase::Intro => Some(GamePhase::Battle),
        _ => None,
    }
}

/// Strictly forward, and never out of a terminal phase.
pub fn can_transition(from: GamePhase, to: GamePhase) -> bool {
    !from.is_terminal() && rank(to) > rank(from)
}

/// Count a timed phase down by one frame.  Battle is left untouched.
pub fn step_timer(phase: GamePhase, timer: u32) -> PhaseStep {
    if phase == GamePhase::Battle {
        return PhaseStep::Stay { timer };
    }
    let timer = timer.saturating_sub(1);
    if timer > 0 {
        return PhaseStep::Stay { timer };
    }
    match successor(phase) {
        Some(next) => PhaseStep::Advance(next),
        None => PhaseStep::Finished,
    }
}

/// 0.0 on entering a timed phase, 1.0 when it is about to end.
pub fn progress(phase: GamePhase, timer: u32, timers: &PhaseTimers) -> f32 {
    let total = duration(phase, timers);
    if total == 0 {
        return 1.0;
    }
    1.0 - timer.min(total) as f32 / total as f32
}
