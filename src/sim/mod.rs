//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (row-major unit IDs, spawn-ordered projectiles)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod collision;
pub mod columns;
pub mod formation;
pub mod phase;
pub mod projectile;
pub mod rect;
pub mod state;
pub mod tick;

pub use bounds::{Bounds, BoundsProvider, Viewport, ViewportBounds};
pub use columns::ColumnRegistry;
pub use formation::{Formation, StepOutcome};
pub use phase::{Invasion, PhaseInput, Transition, next_phase};
pub use rect::Aabb;
pub use state::{
    Alien, Block, BlockHit, Direction, Faction, GameEvent, GameOverReason, GamePhase, GameState,
    Projectile, Ship, UnitId,
};
pub use tick::{ScoreSink, TickInput, tick};
