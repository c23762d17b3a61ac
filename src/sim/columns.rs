//! Per-column adjacency of living aliens
//!
//! Each alien has a node holding the indices of the nearest living alien above
//! and below it in the same column. Deaths splice the node out, so the lowest
//! living alien of a column (the frontline, the only one allowed to fire) is
//! always one lookup away.

use serde::{Deserialize, Serialize};

use super::state::UnitId;
use crate::error::SimError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Link {
    above: Option<usize>,
    below: Option<usize>,
    alive: bool,
}

/// Column adjacency for a row-major alien grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRegistry {
    columns: usize,
    links: Vec<Link>,
    /// Lowest living alien of each column
    frontline: Vec<Option<usize>>,
}

impl ColumnRegistry {
    /// Fully populated grid, rows ordered top to bottom
    pub fn new(rows: usize, columns: usize) -> Self {
        let links = (0..rows * columns)
            .map(|index| {
                let row = index / columns;
                Link {
                    above: (row > 0).then(|| index - columns),
                    below: (row + 1 < rows).then(|| index + columns),
                    alive: true,
                }
            })
            .collect();
        let frontline = (0..columns)
            .map(|column| (rows > 0).then(|| (rows - 1) * columns + column))
            .collect();
        Self {
            columns,
            links,
            frontline,
        }
    }

    fn link(&self, unit: UnitId) -> Result<&Link, SimError> {
        self.links.get(unit.0).ok_or_else(|| {
            SimError::InvariantViolation(format!("unknown unit {} in column registry", unit.0))
        })
    }

    /// True iff the unit is alive and nothing living is below it
    pub fn is_frontline(&self, unit: UnitId) -> Result<bool, SimError> {
        let link = self.link(unit)?;
        Ok(link.alive && link.below.is_none())
    }

    /// Lowest living alien of a column, None once the column is exhausted
    pub fn frontline(&self, column: usize) -> Option<UnitId> {
        self.frontline.get(column).copied().flatten().map(UnitId)
    }

    /// Iterate the frontline of every column that still has one
    pub fn frontlines(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.frontline.iter().filter_map(|f| f.map(UnitId))
    }

    /// Nearest living alien below the unit
    pub fn below(&self, unit: UnitId) -> Result<Option<UnitId>, SimError> {
        Ok(self.link(unit)?.below.map(UnitId))
    }

    /// Nearest living alien above the unit
    pub fn above(&self, unit: UnitId) -> Result<Option<UnitId>, SimError> {
        Ok(self.link(unit)?.above.map(UnitId))
    }

    /// Splice a dead unit out of its column in O(1)
    ///
    /// Returns false if the unit had already been removed.
    pub fn remove(&mut self, unit: UnitId) -> Result<bool, SimError> {
        let link = *self.link(unit)?;
        if !link.alive {
            return Ok(false);
        }
        if let Some(above) = link.above {
            self.links[above].below = link.below;
        }
        if let Some(below) = link.below {
            self.links[below].above = link.above;
        }
        let column = unit.0 % self.columns;
        if self.frontline[column] == Some(unit.0) {
            self.frontline[column] = link.above;
        }
        self.links[unit.0] = Link {
            above: None,
            below: None,
            alive: false,
        };
        Ok(true)
    }
}
