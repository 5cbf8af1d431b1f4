//! Map system for CyberOps.
//!
//! Tile grid, isometric projection, Bresenham line-of-sight with a
//! windowed cache, and the fog-of-war grid.

pub use cyberops_core as core;

pub mod fog;
pub mod grid;
pub mod iso;
pub mod los;

// Re-export key types for convenience.
pub use fog::{FogGrid, Observer};
pub use grid::{Tile, TileMap};
pub use iso::IsoProjection;
pub use los::{has_line_of_sight, LosCache};
