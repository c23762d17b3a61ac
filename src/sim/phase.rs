//! Gameplay phases
//!
//! ```text
//!   Start --fire|pause--> Play --pause--> Pause --fire--> Play
//!                          |                |
//!                          |              pause (quit)
//!                          v                v
//!            (ship lost / invaded) ----> GameOver
//! ```
//!
//! Only `Play` lets the formation, projectiles and collisions advance.

use super::bounds::Bounds;
use super::state::{GameEvent, GameOverReason, GamePhase, GameState};

/// The queries and mutators the simulation components need from the session
pub trait Invasion {
    fn current_phase(&self) -> GamePhase;

    fn borders(&self) -> Bounds;

    /// Enter GameOver; returns false if it had already been reported
    fn report_game_over(&mut self, reason: GameOverReason) -> bool;

    fn is_in_play(&self) -> bool {
        self.current_phase() == GamePhase::Play
    }
}

impl Invasion for GameState {
    fn current_phase(&self) -> GamePhase {
        self.phase
    }

    fn borders(&self) -> Bounds {
        self.bounds
    }

    fn report_game_over(&mut self, reason: GameOverReason) -> bool {
        if self.game_over_reported {
            return false;
        }
        self.game_over_reported = true;
        log::info!("Game over at level {}: {:?}", self.level, reason);
        self.set_phase(GamePhase::GameOver);
        self.events.push(GameEvent::GameOver { reason });
        true
    }
}

/// Phase-relevant input edges of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseInput {
    pub fire: bool,
    pub pause: bool,
}

/// Where an input moves the phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    To(GamePhase),
    Quit,
}

/// Pure transition table; None when the input does not change the phase
pub fn next_phase(current: GamePhase, input: PhaseInput) -> Option<Transition> {
    match current {
        GamePhase::Start if input.fire || input.pause => Some(Transition::To(GamePhase::Play)),
        GamePhase::Play if input.pause => Some(Transition::To(GamePhase::Pause)),
        // Quit wins if both arrive together
        GamePhase::Pause if input.pause => Some(Transition::Quit),
        GamePhase::Pause if input.fire => Some(Transition::To(GamePhase::Play)),
        _ => None,
    }
}

/// Apply the input to the session phase; returns true if the input was consumed
pub fn apply_input(state: &mut GameState, input: PhaseInput) -> bool {
    match next_phase(state.phase, input) {
        Some(Transition::To(phase)) => {
            state.set_phase(phase);
            true
        }
        Some(Transition::Quit) => {
            state.report_game_over(GameOverReason::Quit);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_support::*;

    const FIRE: PhaseInput = PhaseInput {
        fire: true,
        pause: false,
    };
    const PAUSE: PhaseInput = PhaseInput {
        fire: false,
        pause: true,
    };
    const NONE: PhaseInput = PhaseInput {
        fire: false,
        pause: false,
    };

    #[test]
    fn test_transition_table() {
        use GamePhase::*;
        assert_eq!(next_phase(Start, FIRE), Some(Transition::To(Play)));
        assert_eq!(next_phase(Start, PAUSE), Some(Transition::To(Play)));
        assert_eq!(next_phase(Start, NONE), None);
        assert_eq!(next_phase(Play, PAUSE), Some(Transition::To(Pause)));
        assert_eq!(next_phase(Play, FIRE), None);
        assert_eq!(next_phase(Pause, FIRE), Some(Transition::To(Play)));
        assert_eq!(next_phase(Pause, PAUSE), Some(Transition::Quit));
        assert_eq!(
            next_phase(Pause, PhaseInput { fire: true, pause: true }),
            Some(Transition::Quit)
        );
        assert_eq!(next_phase(GameOver, FIRE), None);
        assert_eq!(next_phase(GameOver, PAUSE), None);
    }

    #[test]
    fn test_apply_records_phase_change() {
        let mut state = state();
        assert!(apply_input(&mut state, FIRE));
        assert_eq!(state.phase, GamePhase::Play);
        assert_eq!(
            state.events,
            vec![GameEvent::PhaseChanged {
                from: GamePhase::Start,
                to: GamePhase::Play
            }]
        );
        assert!(!apply_input(&mut state, FIRE));
    }

    #[test]
    fn test_quit_from_pause() {
        let mut state = playing();
        apply_input(&mut state, PAUSE);
        assert_eq!(state.phase, GamePhase::Pause);
        apply_input(&mut state, PAUSE);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver {
            reason: GameOverReason::Quit
        }));
    }

    #[test]
    fn test_game_over_reported_once() {
        let mut state = playing();
        assert!(state.report_game_over(GameOverReason::Invaded));
        assert!(!state.report_game_over(GameOverReason::Collision));
        let reports = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(reports, 1);
        assert!(!state.is_in_play());
    }

    #[test]
    fn test_restart_returns_to_start() {
        let mut state = playing();
        state.report_game_over(GameOverReason::Invaded);
        state.restart(99);
        assert_eq!(state.current_phase(), GamePhase::Start);
        assert_eq!(state.level, 1);
        assert!(state.report_game_over(GameOverReason::Quit));
    }
}
