//! Isometric projection: converts between world/grid and screen space.
//!
//! `ix = (x - y) * tile_w / 2`, `iy = (x + y) * tile_h / 2`.

use serde::{Deserialize, Serialize};

use cyberops_core::types::Position;

/// Default tile footprint in screen pixels.
const DEFAULT_TILE_WIDTH: f64 = 64.0;
const DEFAULT_TILE_HEIGHT: f64 = 32.0;

/// A point in isometric screen space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IsoPoint {
    pub x: f64,
    pub y: f64,
}

/// Isometric projection for a fixed tile footprint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IsoProjection {
    pub tile_width: f64,
    pub tile_height: f64,
}

impl Default for IsoProjection {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_WIDTH, DEFAULT_TILE_HEIGHT)
    }
}

impl IsoProjection {
    pub fn new(tile_width: f64, tile_height: f64) -> Self {
        Self {
            tile_width,
            tile_height,
        }
    }

    /// World/grid position to isometric screen point.
    pub fn world_to_iso(&self, pos: &Position) -> IsoPoint {
        IsoPoint {
            x: (pos.x - pos.y) * self.tile_width / 2.0,
            y: (pos.x + pos.y) * self.tile_height / 2.0,
        }
    }

    /// Isometric screen point back to world/grid position.
    pub fn iso_to_world(&self, iso: &IsoPoint) -> Position {
        let a = iso.x / (self.tile_width / 2.0);
        let b = iso.y / (self.tile_height / 2.0);
        Position::new((a + b) / 2.0, (b - a) / 2.0)
    }
}
