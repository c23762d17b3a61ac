//! Playfield borders
//!
//! The camera is centered on the origin with +y up. Left/right borders are
//! inset by half the ship sprite so the ship never leaves the screen; the upper
//! border sits below the header strip.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::consts::{HEADER_HEIGHT, SHIP_HALF_WIDTH};
use crate::error::SimError;

/// Orthographic viewport the borders are derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Half of the visible height in world units
    pub ortho_size: f32,
    /// Width / height
    pub aspect: f32,
    /// Width of the player ship sprite
    pub ship_width: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            ortho_size: 5.0,
            aspect: 16.0 / 9.0,
            ship_width: 2.0 * SHIP_HALF_WIDTH,
        }
    }
}

impl Viewport {
    /// Half of the visible width in world units
    pub fn half_width(&self) -> f32 {
        self.ortho_size * self.aspect
    }
}

/// The four playfield borders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub upper: f32,
    pub lower: f32,
}

impl Bounds {
    pub fn from_viewport(viewport: &Viewport) -> Result<Self, SimError> {
        if !(viewport.ortho_size > 0.0 && viewport.aspect > 0.0) {
            return Err(SimError::Configuration(format!(
                "degenerate viewport {viewport:?}"
            )));
        }
        let half_ship = viewport.ship_width / 2.0;
        let bounds = Self {
            left: -viewport.half_width() + half_ship,
            right: viewport.half_width() - half_ship,
            upper: viewport.ortho_size - HEADER_HEIGHT,
            lower: -viewport.ortho_size,
        };
        if bounds.left >= bounds.right || bounds.lower >= bounds.upper {
            return Err(SimError::Configuration(format!(
                "viewport {viewport:?} leaves no playfield"
            )));
        }
        Ok(bounds)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.upper - self.lower
    }
}

/// Source of the playfield borders
pub trait BoundsProvider {
    fn borders(&self) -> Result<Bounds, SimError>;
}

impl BoundsProvider for Bounds {
    fn borders(&self) -> Result<Bounds, SimError> {
        Ok(*self)
    }
}

/// Computes borders from a viewport on first use and caches them
#[derive(Debug, Default)]
pub struct ViewportBounds {
    viewport: Option<Viewport>,
    cached: OnceCell<Bounds>,
}

impl ViewportBounds {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Some(viewport),
            cached: OnceCell::new(),
        }
    }

    /// Set the viewport; ignored once borders have been computed
    pub fn init(&mut self, viewport: Viewport) {
        if self.cached.get().is_some() {
            log::warn!("Viewport changed after borders were cached, keeping old borders");
            return;
        }
        self.viewport = Some(viewport);
    }
}

impl BoundsProvider for ViewportBounds {
    fn borders(&self) -> Result<Bounds, SimError> {
        if let Some(bounds) = self.cached.get() {
            return Ok(*bounds);
        }
        let viewport = self.viewport.as_ref().ok_or(SimError::MissingBounds)?;
        let bounds = Bounds::from_viewport(viewport)?;
        Ok(*self.cached.get_or_init(|| bounds))
    }
}
