//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically. Order within a
//! tick: phase input, ship, formation, projectiles, collisions, level clear.

use super::collision;
use super::formation::StepOutcome;
use super::phase::{self, Invasion, PhaseInput};
use super::projectile;
use super::state::{GameEvent, GameOverReason, GameState};
use crate::consts::*;
use crate::error::SimError;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal ship control in [-1, 1]
    pub axis: f32,
    /// Fire button pressed since the last tick
    pub fire: bool,
    /// Pause/quit button pressed since the last tick
    pub pause: bool,
}

/// Receives score-relevant signals; the core itself keeps no score
pub trait ScoreSink {
    fn add_points(&mut self, amount: u32);

    fn game_over(&mut self, reason: GameOverReason);

    fn level_cleared(&mut self, level: u32);
}

/// Sink for hosts that read the returned events instead
impl ScoreSink for () {
    fn add_points(&mut self, _amount: u32) {}

    fn game_over(&mut self, _reason: GameOverReason) {}

    fn level_cleared(&mut self, _level: u32) {}
}

/// Advance the session by one fixed timestep
///
/// Returns every event raised during the tick, after the score-relevant ones
/// have been forwarded to `sink`.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    sink: &mut dyn ScoreSink,
) -> Result<Vec<GameEvent>, SimError> {
    state.events.clear();
    advance(state, input)?;
    let events = std::mem::take(&mut state.events);
    dispatch(&events, sink);
    Ok(events)
}

fn advance(state: &mut GameState, input: &TickInput) -> Result<(), SimError> {
    let consumed = phase::apply_input(
        state,
        PhaseInput {
            fire: input.fire,
            pause: input.pause,
        },
    );

    // Nothing moves outside of Play
    if !state.is_in_play() {
        return Ok(());
    }

    state.time_ticks += 1;

    move_ship(state, input.axis);
    projectile::reload(state);
    if input.fire && !consumed {
        projectile::fire_ship(state);
    }

    state.sweep_countdown -= SIM_DT;
    if state.sweep_countdown <= 0.0 {
        state.sweep_countdown += state.difficulty.sweep_period();
        let outcome = state.formation.step();
        if on_formation_step(state, outcome) {
            return Ok(());
        }
    }
    let bounds = state.borders();
    state.formation.observe_borders(&bounds);

    projectile::fire_volley(state)?;
    projectile::advance(state);

    collision::resolve(state)?;
    if !state.is_in_play() {
        return Ok(());
    }

    if state.formation.is_cleared() {
        let cleared = state.level;
        log::info!("Level {cleared} cleared");
        state.events.push(GameEvent::LevelCleared { level: cleared });
        state.start_level(cleared + 1);
    }
    Ok(())
}

/// Returns true when the step ended the game
fn on_formation_step(state: &mut GameState, outcome: StepOutcome) -> bool {
    if let Some(direction) = outcome.reversed {
        state.events.push(GameEvent::DirectionReversed { direction });
    }
    if outcome.breached {
        state.report_game_over(GameOverReason::Invaded);
        return true;
    }
    false
}

fn move_ship(state: &mut GameState, axis: f32) {
    let axis = axis.clamp(-1.0, 1.0);
    if axis.abs() <= SHIP_AXIS_DEAD_ZONE {
        return;
    }
    let bounds = state.borders();
    let x = state.ship.pos.x + axis / SHIP_SPEED_REDUCER;
    state.ship.pos.x = x.clamp(bounds.left, bounds.right);
}

fn dispatch(events: &[GameEvent], sink: &mut dyn ScoreSink) {
    for event in events {
        match *event {
            GameEvent::AlienDestroyed { points, .. } => sink.add_points(points),
            GameEvent::LevelCleared { level } => sink.level_cleared(level),
            GameEvent::GameOver { reason } => sink.game_over(reason),
            _ => {}
        }
    }
}
