//! Game state and core simulation types
//!
//! `GameState` is the single simulation context: the host loop owns it and
//! passes it to `tick`. Everything that must survive a snapshot lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::{Bounds, BoundsProvider};
use super::columns::ColumnRegistry;
use super::formation::Formation;
use super::rect::Aabb;
use crate::consts::*;
use crate::error::SimError;
use crate::tuning::{Difficulty, DifficultyConfig};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Formation spawned, waiting for the first input
    Start,
    /// Active gameplay
    Play,
    /// Simulation frozen
    Pause,
    /// Session ended, nothing mutates until restart
    GameOver,
}

/// Horizontal direction of the formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// -1 for Left, +1 for Right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    /// Fired by an alien, travels down
    Hostile,
    /// Fired by the ship, travels up
    Friendly,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Last life lost to alien fire
    ShipDestroyed,
    /// An alien descended below the block line
    Invaded,
    /// An alien touched the ship
    Collision,
    /// Player quit from the pause menu
    Quit,
}

/// Index of an alien in the formation grid (row-major)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub usize);

/// A hostile unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    pub id: UnitId,
    pub row: usize,
    pub column: usize,
    pub pos: Vec2,
    pub health: i32,
    pub alive: bool,
}

impl Alien {
    pub fn new(id: UnitId, row: usize, column: usize, pos: Vec2) -> Self {
        Self {
            id,
            row,
            column,
            pos,
            health: ALIEN_HEALTH,
            alive: true,
        }
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::from(ALIEN_HALF_EXTENTS))
    }

    /// Apply damage, returns true when the alien has no health left
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        self.health <= 0
    }
}

/// Outcome of a block absorbing a hostile projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHit {
    Damaged { resistance: u8 },
    Destroyed,
}

/// A defensive block between the formation and the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub resistance: u8,
}

impl Block {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(BLOCK_WIDTH, BLOCK_THICKNESS),
            resistance: BLOCK_RESISTANCE,
        }
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos, self.size / 2.0)
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.resistance == 0
    }

    /// Absorb one hostile hit: thinner and lower while resistance remains
    pub fn absorb_hit(&mut self) -> BlockHit {
        self.resistance = self.resistance.saturating_sub(1);
        if self.resistance == 0 {
            return BlockHit::Destroyed;
        }
        self.size.y = (self.size.y - BLOCK_THICKNESS_LOSS).max(0.0);
        self.pos.y -= BLOCK_POSITION_ADJUSTMENT;
        BlockHit::Damaged {
            resistance: self.resistance,
        }
    }

    /// Destroyed outright by an alien crashing into it
    pub fn demolish(&mut self) {
        self.resistance = 0;
    }
}

/// A projectile of either faction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub faction: Faction,
    pub pos: Vec2,
    /// Vertical displacement per tick (negative = downward)
    pub vel: f32,
}

impl Projectile {
    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::from(PROJECTILE_HALF_EXTENTS))
    }
}

/// The player unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub half: Vec2,
    /// Ticks until the next shot is allowed (0 = loaded)
    pub reload: u32,
    pub lives: u8,
}

impl Ship {
    pub fn new(bounds: &Bounds, lives: u8) -> Self {
        Self {
            pos: Vec2::new(0.0, bounds.lower + SHIP_HEIGHT_OFFSET),
            half: Vec2::new(SHIP_HALF_WIDTH, SHIP_HALF_HEIGHT),
            reload: 0,
            lives,
        }
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos, self.half)
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.reload == 0
    }
}

/// Something that happened during a tick, for the host and the score sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    DirectionReversed { direction: Direction },
    ProjectileFired { faction: Faction, pos: Vec2 },
    AlienDestroyed { unit: UnitId, points: u32 },
    AlienCrashed { unit: UnitId, block: u32 },
    BlockHit { block: u32, resistance: u8 },
    BlockDestroyed { block: u32 },
    ShipHit { lives_left: u8 },
    LevelCleared { level: u32 },
    GameOver { reason: GameOverReason },
}

/// Complete simulation context (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Firing RNG, advanced only by hostile volleys
    pub(crate) rng: Pcg32,
    pub config: DifficultyConfig,
    /// Current level (1-based)
    pub level: u32,
    pub difficulty: Difficulty,
    pub phase: GamePhase,
    /// Play ticks simulated this session
    pub time_ticks: u64,
    /// Borders, fixed for the whole session
    pub bounds: Bounds,
    pub formation: Formation,
    pub columns: ColumnRegistry,
    pub blocks: Vec<Block>,
    pub projectiles: Vec<Projectile>,
    pub ship: Ship,
    /// Seconds until the next formation step
    pub sweep_countdown: f32,
    /// Events raised during the current tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    pub(crate) game_over_reported: bool,
    next_id: u32,
}

impl GameState {
    /// Create a session at level 1 in the Start phase
    pub fn new(
        config: DifficultyConfig,
        provider: &dyn BoundsProvider,
        seed: u64,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let bounds = provider.borders()?;

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            level: 1,
            difficulty: Difficulty::for_level(&config, 1),
            phase: GamePhase::Start,
            time_ticks: 0,
            bounds,
            formation: Formation::spawn(&bounds),
            columns: ColumnRegistry::new(ALIEN_ROWS, ALIEN_COLUMNS),
            blocks: Vec::new(),
            projectiles: Vec::new(),
            ship: Ship::new(&bounds, SHIP_STARTING_LIVES),
            sweep_countdown: 0.0,
            events: Vec::new(),
            game_over_reported: false,
            next_id: 1,
        };
        state.start_level(1);
        Ok(state)
    }

    /// Build a fresh formation, blocks and empty sky for `level`, back in Start
    pub fn start_level(&mut self, level: u32) {
        self.level = level.max(1);
        self.difficulty = Difficulty::for_level(&self.config, self.level);
        self.formation = Formation::spawn(&self.bounds);
        self.columns = ColumnRegistry::new(self.formation.rows, self.formation.columns);
        self.projectiles.clear();
        self.spawn_blocks();
        self.ship.pos.x = 0.0;
        self.ship.reload = 0;
        self.sweep_countdown = 0.0;
        self.phase = GamePhase::Start;

        log::info!(
            "Level {}: speed {:.2}, shoot 1/{}",
            self.level,
            self.difficulty.speed,
            self.difficulty.shoot_denominator
        );
    }

    /// Discard the session and begin again at level 1 with a new seed
    ///
    /// Passing the previous seed replays the same alien fire sequence.
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.time_ticks = 0;
        self.ship = Ship::new(&self.bounds, SHIP_STARTING_LIVES);
        self.game_over_reported = false;
        self.events.clear();
        self.start_level(1);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Blocks are spread over half of the visible width, centered
    fn spawn_blocks(&mut self) {
        self.blocks.clear();
        let half_width = (self.bounds.right - self.bounds.left) / 2.0 + SHIP_HALF_WIDTH;
        let spacing = half_width / (BLOCK_COUNT - 1) as f32;
        let x0 = -half_width / 2.0;
        let y = self.bounds.lower + BLOCKS_HEIGHT;
        for i in 0..BLOCK_COUNT {
            let id = self.next_entity_id();
            self.blocks
                .push(Block::new(id, Vec2::new(x0 + i as f32 * spacing, y)));
        }
    }

    /// Spawn a projectile and record the event
    pub fn spawn_projectile(&mut self, faction: Faction, pos: Vec2) {
        let reductor = match faction {
            Faction::Hostile => -ALIEN_PROJECTILE_SPEED_REDUCTOR,
            Faction::Friendly => SHIP_PROJECTILE_SPEED_REDUCTOR,
        };
        let id = self.next_entity_id();
        self.projectiles.push(Projectile {
            id,
            faction,
            pos,
            vel: self.difficulty.speed / reductor,
        });
        self.events.push(GameEvent::ProjectileFired { faction, pos });
    }

    /// Mark an alien dead and relink its column; false if it was already dead
    pub fn kill_alien(&mut self, unit: UnitId) -> Result<bool, SimError> {
        if !self.formation.kill(unit)? {
            return Ok(false);
        }
        self.columns.remove(unit)?;
        Ok(true)
    }

    /// Phase change that is not a game over
    pub(crate) fn set_phase(&mut self, to: GamePhase) {
        if self.phase == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", self.phase, to);
        self.events.push(GameEvent::PhaseChanged {
            from: self.phase,
            to,
        });
        self.phase = to;
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_new_session_layout() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.level, 1);
        assert_eq!(state.formation.alive, ALIEN_ROWS * ALIEN_COLUMNS);
        assert_eq!(state.blocks.len(), BLOCK_COUNT);
        assert!(state.projectiles.is_empty());
        assert!(state.blocks.iter().all(|b| b.resistance == BLOCK_RESISTANCE));
        let block_line = state.bounds.lower + BLOCKS_HEIGHT;
        assert!(state.blocks.iter().all(|b| (b.pos.y - block_line).abs() < 1e-5));
        assert!(state.ship.pos.y < block_line);
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let bounds = Bounds::from_viewport(&crate::sim::bounds::Viewport::default()).unwrap();
        let config = DifficultyConfig {
            speed_cap: 0.5,
            ..DifficultyConfig::default()
        };
        assert!(matches!(
            GameState::new(config, &bounds, 1),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_bounds_is_fatal() {
        let provider = crate::sim::bounds::ViewportBounds::default();
        assert_eq!(
            GameState::new(DifficultyConfig::default(), &provider, 1).err(),
            Some(SimError::MissingBounds)
        );
    }

    #[test]
    fn test_block_absorbs_four_hits() {
        let mut block = Block::new(1, Vec2::ZERO);
        let height = block.size.y;
        assert_eq!(block.absorb_hit(), BlockHit::Damaged { resistance: 3 });
        assert!((block.size.y - (height - BLOCK_THICKNESS_LOSS)).abs() < 1e-6);
        assert!((block.pos.y + BLOCK_POSITION_ADJUSTMENT).abs() < 1e-6);
        assert_eq!(block.absorb_hit(), BlockHit::Damaged { resistance: 2 });
        assert_eq!(block.absorb_hit(), BlockHit::Damaged { resistance: 1 });
        assert!(!block.is_destroyed());
        assert_eq!(block.absorb_hit(), BlockHit::Destroyed);
        assert!(block.is_destroyed());
    }

    #[test]
    fn test_projectile_velocity_by_faction() {
        let mut state = state();
        state.spawn_projectile(Faction::Hostile, Vec2::ZERO);
        state.spawn_projectile(Faction::Friendly, Vec2::ZERO);
        let speed = state.difficulty.speed;
        assert!((state.projectiles[0].vel + speed / ALIEN_PROJECTILE_SPEED_REDUCTOR).abs() < 1e-6);
        assert!((state.projectiles[1].vel - speed / SHIP_PROJECTILE_SPEED_REDUCTOR).abs() < 1e-6);
        // Friendly fire is the faster one
        assert!(state.projectiles[1].vel.abs() > state.projectiles[0].vel.abs());
    }

    #[test]
    fn test_kill_alien_is_idempotent() {
        let mut state = state();
        let unit = UnitId(0);
        assert!(state.kill_alien(unit).unwrap());
        assert!(!state.kill_alien(unit).unwrap());
        assert_eq!(state.formation.alive, ALIEN_ROWS * ALIEN_COLUMNS - 1);
        assert!(state.kill_alien(UnitId(10_000)).is_err());
    }

    #[test]
    fn test_restart_reseeds_fire_stream() {
        use rand::Rng;

        let mut state = state();
        let first: Vec<u32> = (0..8).map(|_| state.rng.random()).collect();

        state.restart(state.seed);
        let replay: Vec<u32> = (0..8).map(|_| state.rng.random()).collect();
        assert_eq!(replay, first);

        state.restart(54321);
        assert_eq!(state.seed, 54321);
        let fresh: Vec<u32> = (0..8).map(|_| state.rng.random()).collect();
        assert_ne!(fresh, first);
    }

    #[test]
    fn test_snapshot_roundtrip_keeps_rng_stream() {
        use rand::Rng;

        let mut state = state();
        let _: u32 = state.rng.random();
        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        let a: u32 = state.rng.random();
        let b: u32 = restored.rng.random();
        assert_eq!(a, b);
    }
}
