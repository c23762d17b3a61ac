//! Axis-aligned boxes for hit testing
//!
//! Every entity in the playfield is a box defined by:
//! - center: world position
//! - half: half width / half height

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Boxes that only touch along an edge count as overlapping
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half + other.half;
        delta.x <= reach.x && delta.y <= reach.y
    }
}
