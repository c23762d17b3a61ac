//! Collision resolution
//!
//! Runs once per tick after everything has moved. Each projectile is matched
//! against the rules below in order and the first match consumes it:
//!
//! 1. hostile shot vs block: the block absorbs it
//! 2. friendly shot vs block: blocks stop the player's own fire
//! 3. hostile shot vs ship: a life is lost
//! 4. friendly shot vs alien: the alien dies and scores
//!
//! Then every living alien is checked against the blocks (both are destroyed,
//! no score) and against the ship (game over).

use super::phase::Invasion;
use super::state::{
    BlockHit, Faction, GameEvent, GameOverReason, GamePhase, GameState, Projectile, UnitId,
};
use crate::consts::*;
use crate::error::SimError;

/// What consumed a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Impact {
    Block(usize),
    Ship,
    Alien(UnitId),
}

fn find_impact(state: &GameState, projectile: &Projectile) -> Option<Impact> {
    let hitbox = projectile.hitbox();

    if let Some(i) = state
        .blocks
        .iter()
        .position(|b| !b.is_destroyed() && b.hitbox().overlaps(&hitbox))
    {
        return Some(Impact::Block(i));
    }

    match projectile.faction {
        Faction::Hostile => state
            .ship
            .hitbox()
            .overlaps(&hitbox)
            .then_some(Impact::Ship),
        Faction::Friendly => state
            .formation
            .living()
            .find(|a| a.hitbox().overlaps(&hitbox))
            .map(|a| Impact::Alien(a.id)),
    }
}

/// Resolve all overlaps for this tick
pub fn resolve(state: &mut GameState) -> Result<(), SimError> {
    if state.current_phase() != GamePhase::Play {
        return Err(SimError::InvariantViolation(format!(
            "collisions resolved in {:?}",
            state.current_phase()
        )));
    }

    let mut projectiles = std::mem::take(&mut state.projectiles);
    let mut consumed = vec![false; projectiles.len()];

    for (i, projectile) in projectiles.iter().enumerate() {
        let Some(impact) = find_impact(state, projectile) else {
            continue;
        };
        consumed[i] = true;

        match (projectile.faction, impact) {
            (Faction::Hostile, Impact::Block(b)) => {
                let block = &mut state.blocks[b];
                let id = block.id;
                match block.absorb_hit() {
                    BlockHit::Damaged { resistance } => {
                        state.events.push(GameEvent::BlockHit {
                            block: id,
                            resistance,
                        });
                    }
                    BlockHit::Destroyed => {
                        log::debug!("Block {id} destroyed by alien fire");
                        state.events.push(GameEvent::BlockDestroyed { block: id });
                    }
                }
            }
            // Blocks soak up the player's shots unharmed
            (Faction::Friendly, Impact::Block(_)) => {}
            (_, Impact::Ship) => {
                state.ship.lives = state.ship.lives.saturating_sub(1);
                let lives_left = state.ship.lives;
                state.events.push(GameEvent::ShipHit { lives_left });
                if lives_left == 0 {
                    state.report_game_over(GameOverReason::ShipDestroyed);
                    break;
                }
            }
            (_, Impact::Alien(unit)) => {
                let died = state
                    .formation
                    .get_mut(unit)
                    .map(|a| a.take_damage(SHIP_PROJECTILE_DAMAGE))
                    .unwrap_or(false);
                if died && state.kill_alien(unit)? {
                    state.events.push(GameEvent::AlienDestroyed {
                        unit,
                        points: ALIEN_POINTS,
                    });
                }
            }
        }
    }

    let mut flags = consumed.into_iter();
    projectiles.retain(|_| !flags.next().unwrap_or(false));
    state.projectiles = projectiles;

    if state.current_phase() == GamePhase::Play {
        resolve_aliens(state)?;
    }
    state.blocks.retain(|b| !b.is_destroyed());
    Ok(())
}

/// Aliens that physically reached a block or the ship
fn resolve_aliens(state: &mut GameState) -> Result<(), SimError> {
    let ship = state.ship.hitbox();
    for index in 0..state.formation.aliens.len() {
        let alien = &state.formation.aliens[index];
        if !alien.alive {
            continue;
        }
        let unit = alien.id;
        let hitbox = alien.hitbox();

        let crashed = state
            .blocks
            .iter()
            .position(|b| !b.is_destroyed() && b.hitbox().overlaps(&hitbox));
        if let Some(b) = crashed {
            state.blocks[b].demolish();
            let block = state.blocks[b].id;
            state.kill_alien(unit)?;
            log::debug!("Alien {} crashed into block {block}", unit.0);
            state.events.push(GameEvent::BlockDestroyed { block });
            state.events.push(GameEvent::AlienCrashed { unit, block });
            continue;
        }

        if ship.overlaps(&hitbox) {
            state.report_game_over(GameOverReason::Collision);
            return Ok(());
        }
    }
    Ok(())
}
