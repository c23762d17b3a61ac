//! Invasion - combat simulation core of a Space Invaders style shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation, projectiles, collisions, phases)
//! - `tuning`: Data-driven difficulty scaling
//! - `highscores`: Session score keeping and the top-K leaderboard
//! - `persistence`: JSON load/save helpers for config and leaderboard files
//! - `error`: Error taxonomy shared by the modules above

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use error::{PersistenceError, SimError};
pub use highscores::{Leaderboard, ScoreKeeper};
pub use tuning::{Difficulty, DifficultyConfig};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;

    /// Formation grid
    pub const ALIEN_ROWS: usize = 5;
    pub const ALIEN_COLUMNS: usize = 11;
    /// Share of the border width covered by the formation at spawn
    pub const ALIENS_HORIZONTAL_OCCUPATION: f32 = 0.7;
    /// Share of the border height covered by the formation at spawn
    pub const ALIENS_VERTICAL_OCCUPATION: f32 = 0.35;
    /// Horizontal steps needed to cross the free horizontal space
    pub const ALIENS_HORIZONTAL_MOVEMENTS: f32 = 15.0;
    /// Descent steps needed to cross the free vertical space
    pub const ALIENS_VERTICAL_MOVEMENTS: f32 = 10.0;
    /// Spawn height of the top row
    pub const ALIENS_INITIAL_VERTICAL_POSITION: f32 = 3.0;
    pub const ALIEN_HALF_EXTENTS: (f32, f32) = (0.35, 0.25);
    pub const ALIEN_POINTS: u32 = 100;
    pub const ALIEN_HEALTH: i32 = 100;
    /// Damage dealt by one friendly projectile (lethal in one hit)
    pub const SHIP_PROJECTILE_DAMAGE: i32 = 100;

    /// Height of the header strip above the playfield
    pub const HEADER_HEIGHT: f32 = 1.4;
    /// Height of the block line above the lower border
    pub const BLOCKS_HEIGHT: f32 = 1.8;
    pub const BLOCK_COUNT: usize = 4;
    pub const BLOCK_RESISTANCE: u8 = 4;
    pub const BLOCK_WIDTH: f32 = 1.2;
    pub const BLOCK_THICKNESS: f32 = 0.8;
    /// Thickness lost on each absorbed hit
    pub const BLOCK_THICKNESS_LOSS: f32 = 0.16;
    /// Downward shift applied on each absorbed hit
    pub const BLOCK_POSITION_ADJUSTMENT: f32 = 0.08;

    /// Ship height above the lower border
    pub const SHIP_HEIGHT_OFFSET: f32 = 0.6;
    pub const SHIP_HALF_WIDTH: f32 = 0.4;
    pub const SHIP_HALF_HEIGHT: f32 = 0.25;
    /// Divides the input axis into a per-tick ship displacement
    pub const SHIP_SPEED_REDUCER: f32 = 4.0;
    /// Axis values inside this band are ignored
    pub const SHIP_AXIS_DEAD_ZONE: f32 = 0.01;
    /// Ticks between two player shots (0.4 s)
    pub const SHIP_RELOAD_TICKS: u32 = 20;
    pub const SHIP_STARTING_LIVES: u8 = 1;

    /// Hostile projectile velocity is formation speed divided by this
    pub const ALIEN_PROJECTILE_SPEED_REDUCTOR: f32 = 100.0;
    /// Friendly projectile velocity is formation speed divided by this
    pub const SHIP_PROJECTILE_SPEED_REDUCTOR: f32 = 20.0;
    pub const PROJECTILE_HALF_EXTENTS: (f32, f32) = (0.05, 0.15);
}
