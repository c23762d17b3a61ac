//! Formation movement
//!
//! The formation never moves as a block. A cursor sweeps the rows from the
//! bottom to the top, one row per step, and only the cursor row moves. The
//! direction is decided between sweeps: if any alien touched a border during
//! the sweep, the next sweep goes the other way and every row drops once as
//! the cursor reaches it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use super::state::{Alien, Direction, UnitId};
use crate::consts::*;
use crate::error::SimError;

/// Result of one formation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// Row that moved this step
    pub row: usize,
    /// Whether that row also descended
    pub descended: bool,
    /// Direction adopted for the next sweep, if it changed at this wrap
    pub reversed: Option<Direction>,
    /// An alien dropped below the block line
    pub breached: bool,
}

/// The alien grid and its movement state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub rows: usize,
    pub columns: usize,
    /// Row-major, rows top to bottom, columns left to right
    pub aliens: Vec<Alien>,
    /// Direction used by the current sweep
    pub direction: Direction,
    /// Latest direction requested by an alien at a border
    pub requested: Direction,
    /// Row that moves on the next step
    pub cursor: usize,
    /// Every row of the current sweep descends when it moves
    pub descending: bool,
    /// Horizontal displacement per step
    pub step: f32,
    /// Vertical displacement per descent
    pub descent: f32,
    /// Living aliens
    pub alive: usize,
    /// Aliens at or below this height have invaded
    pub block_line: f32,
    /// Horizontal borders that trigger a reversal request
    pub left: f32,
    pub right: f32,
}

impl Formation {
    /// Lay out a full grid centered horizontally, top row near the upper border
    pub fn spawn(bounds: &Bounds) -> Self {
        let rows = ALIEN_ROWS;
        let columns = ALIEN_COLUMNS;

        let horizontal_space = bounds.width() * ALIENS_HORIZONTAL_OCCUPATION;
        let vertical_space = bounds.height() * ALIENS_VERTICAL_OCCUPATION;
        let dx = horizontal_space / (columns - 1) as f32;
        let dy = vertical_space / (rows - 1) as f32;
        let x0 = -horizontal_space / 2.0;
        let y0 = ALIENS_INITIAL_VERTICAL_POSITION.min(bounds.upper - ALIEN_HALF_EXTENTS.1);

        let mut aliens = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for column in 0..columns {
                let pos = Vec2::new(x0 + column as f32 * dx, y0 - row as f32 * dy);
                aliens.push(Alien::new(UnitId(aliens.len()), row, column, pos));
            }
        }

        Self {
            rows,
            columns,
            aliens,
            direction: Direction::Right,
            requested: Direction::Right,
            cursor: rows - 1,
            descending: false,
            step: bounds.width() * (1.0 - ALIENS_HORIZONTAL_OCCUPATION)
                / ALIENS_HORIZONTAL_MOVEMENTS,
            descent: bounds.height() * (1.0 - ALIENS_VERTICAL_OCCUPATION)
                / ALIENS_VERTICAL_MOVEMENTS,
            alive: rows * columns,
            block_line: bounds.lower + BLOCKS_HEIGHT,
            left: bounds.left,
            right: bounds.right,
        }
    }

    pub fn get(&self, unit: UnitId) -> Option<&Alien> {
        self.aliens.get(unit.0)
    }

    pub fn get_mut(&mut self, unit: UnitId) -> Option<&mut Alien> {
        self.aliens.get_mut(unit.0)
    }

    #[inline]
    pub fn unit_at(&self, row: usize, column: usize) -> UnitId {
        UnitId(row * self.columns + column)
    }

    pub fn row(&self, row: usize) -> &[Alien] {
        let start = row * self.columns;
        &self.aliens[start..start + self.columns]
    }

    pub fn living(&self) -> impl Iterator<Item = &Alien> {
        self.aliens.iter().filter(|a| a.alive)
    }

    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.alive == 0
    }

    /// Mark a unit dead; false if it already was
    pub fn kill(&mut self, unit: UnitId) -> Result<bool, SimError> {
        let alien = self.aliens.get_mut(unit.0).ok_or_else(|| {
            SimError::InvariantViolation(format!("unknown unit {} in formation", unit.0))
        })?;
        if !alien.alive {
            return Ok(false);
        }
        alien.alive = false;
        self.alive -= 1;
        Ok(true)
    }

    /// Record a reversal request from any living alien sitting on a border
    ///
    /// Runs every tick over the whole grid, not only the row that just moved.
    /// The last alien scanned wins.
    pub fn observe_borders(&mut self, bounds: &Bounds) {
        for alien in self.aliens.iter().filter(|a| a.alive) {
            if let Some(direction) = border_request(alien.pos.x, bounds.left, bounds.right) {
                self.requested = direction;
            }
        }
    }

    /// Move the cursor row one step, then advance the cursor
    pub fn step(&mut self) -> StepOutcome {
        let row = self.cursor;
        let dx = self.step * self.direction.sign();
        let descend = self.descending;
        let mut breached = false;
        let mut request = None;

        let start = row * self.columns;
        for alien in self.aliens[start..start + self.columns]
            .iter_mut()
            .filter(|a| a.alive)
        {
            alien.pos.x += dx;
            if descend {
                alien.pos.y -= self.descent;
                breached |= alien.pos.y <= self.block_line;
            }
            request = border_request(alien.pos.x, self.left, self.right).or(request);
        }
        // A move onto a border counts before this step's wrap
        if let Some(direction) = request {
            self.requested = direction;
        }

        let mut reversed = None;
        if self.cursor == 0 {
            self.cursor = self.rows - 1;
            if self.requested != self.direction {
                self.direction = self.requested;
                self.descending = true;
                reversed = Some(self.direction);
                log::debug!("Formation reverses to {:?}", self.direction);
            } else {
                self.descending = false;
            }
        } else {
            self.cursor -= 1;
        }

        StepOutcome {
            row,
            descended: descend,
            reversed,
            breached,
        }
    }
}

/// Direction an alien at `x` asks for, if it sits on or beyond a border
fn border_request(x: f32, left: f32, right: f32) -> Option<Direction> {
    if x <= left {
        Some(Direction::Right)
    } else if x >= right {
        Some(Direction::Left)
    } else {
        None
    }
}
