//! Projectile spawning, movement and retirement
//!
//! Hostile fire: every Play tick each frontline alien rolls
//! `0..shoot_denominator` and fires on 0. Player fire: one shot per input edge,
//! gated by a reload countdown.

use rand::Rng;

use super::state::{Faction, GamePhase, GameState};
use crate::consts::*;
use crate::error::SimError;

/// Roll the dice for every frontline alien, returns the number of shots
pub fn fire_volley(state: &mut GameState) -> Result<usize, SimError> {
    if state.phase != GamePhase::Play {
        return Err(SimError::InvariantViolation(format!(
            "alien volley requested in {:?}",
            state.phase
        )));
    }

    let denominator = state.difficulty.shoot_denominator.max(1);
    let mut shooters = Vec::new();
    for unit in state.columns.frontlines() {
        if !state.columns.is_frontline(unit)? {
            continue;
        }
        if state.rng.random_range(0..denominator) == 0 {
            let alien = state.formation.get(unit).ok_or_else(|| {
                SimError::InvariantViolation(format!("frontline unit {} not in formation", unit.0))
            })?;
            shooters.push(alien.pos);
        }
    }

    for &pos in &shooters {
        state.spawn_projectile(Faction::Hostile, pos);
    }
    if !shooters.is_empty() {
        log::debug!("{} aliens fired", shooters.len());
    }
    Ok(shooters.len())
}

/// Count the reload down by one tick
pub fn reload(state: &mut GameState) {
    state.ship.reload = state.ship.reload.saturating_sub(1);
}

/// Fire from the ship if loaded, returns whether a shot left
pub fn fire_ship(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Play || !state.ship.is_loaded() {
        return false;
    }
    let pos = state.ship.pos;
    state.spawn_projectile(Faction::Friendly, pos);
    state.ship.reload = SHIP_RELOAD_TICKS;
    true
}

/// Move every projectile and drop the ones that crossed their exit border
///
/// Returns the number of projectiles retired.
pub fn advance(state: &mut GameState) -> usize {
    let bounds = state.bounds;
    let before = state.projectiles.len();
    state.projectiles.retain_mut(|p| {
        p.pos.y += p.vel;
        match p.faction {
            Faction::Hostile => p.pos.y >= bounds.lower,
            Faction::Friendly => p.pos.y <= bounds.upper,
        }
    });
    before - state.projectiles.len()
}
