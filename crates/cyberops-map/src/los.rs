//! Line-of-sight on the tile grid.
//!
//! Integer Bresenham walk from the observer cell to the target cell.
//! Walls and out-of-map cells block; the target cell itself never blocks,
//! so a wall can be seen but not seen through.

use std::collections::HashMap;

use cyberops_core::constants::LOS_STEP_MARGIN;
use cyberops_core::types::{GridPoint, Position};

use crate::grid::TileMap;

/// Check line-of-sight between two world positions (uncached).
///
/// Non-finite coordinates never have line-of-sight.
pub fn has_line_of_sight(map: &TileMap, from: &Position, to: &Position) -> bool {
    if !from.is_finite() || !to.is_finite() {
        return false;
    }
    cell_line_of_sight(map, from.cell(), to.cell())
}

/// Bresenham walk between two cells.
pub fn cell_line_of_sight(map: &TileMap, from: GridPoint, to: GridPoint) -> bool {
    let (x1, y1) = (from.x as i64, from.y as i64);
    let (x2, y2) = (to.x as i64, to.y as i64);
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };
    let max_steps = dx + dy + LOS_STEP_MARGIN as i64;

    let mut err = dx - dy;
    let (mut x, mut y) = (x1, y1);

    for _ in 0..=max_steps {
        if x == x2 && y == y2 {
            return true;
        }
        // Coordinates along the walk stay between the endpoints, both of which fit in i32.
        if map.is_blocking(GridPoint::new(x as i32, y as i32)) {
            return false;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }

    false
}

/// Memoised LOS results keyed by (observer cell, target cell).
///
/// Entries live for a window of ticks and are dropped wholesale when the
/// window expires, when `invalidate` is called, or when the map revision
/// changes (a door opened).
#[derive(Debug, Clone)]
pub struct LosCache {
    entries: HashMap<(GridPoint, GridPoint), bool>,
    window_ticks: u64,
    window_start: u64,
    map_revision: u64,
}

impl LosCache {
    pub fn new(window_ticks: u64) -> Self {
        Self {
            entries: HashMap::new(),
            window_ticks,
            window_start: 0,
            map_revision: 0,
        }
    }

    /// Called once per tick; expires the cache at the end of each window.
    pub fn begin_tick(&mut self, tick: u64) {
        if tick < self.window_start || tick - self.window_start >= self.window_ticks {
            self.entries.clear();
            self.window_start = tick;
        }
    }

    /// Drop every cached result.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    /// Cached LOS between two world positions.
    pub fn query(&mut self, map: &TileMap, from: &Position, to: &Position) -> bool {
        if !from.is_finite() || !to.is_finite() {
            return false;
        }
        self.query_cells(map, from.cell(), to.cell())
    }

    /// Cached LOS between two cells.
    pub fn query_cells(&mut self, map: &TileMap, from: GridPoint, to: GridPoint) -> bool {
        if map.revision() != self.map_revision {
            self.entries.clear();
            self.map_revision = map.revision();
        }
        if let Some(&clear) = self.entries.get(&(from, to)) {
            return clear;
        }
        let clear = cell_line_of_sight(map, from, to);
        self.entries.insert((from, to), clear);
        clear
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
