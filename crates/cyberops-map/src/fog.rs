//! Fog-of-war grid.
//!
//! A per-cell visibility layer parallel to the tile map. Every update
//! first resets (tactical) or downgrades (permanent) the grid, then each
//! observer reveals the cells inside its vision circle that it has
//! line-of-sight to. Reveals only ever upgrade a cell, so the result does
//! not depend on observer order.

use cyberops_core::enums::{FogMode, Visibility};
use cyberops_core::types::{GridPoint, Position};

use crate::grid::TileMap;
use crate::los::LosCache;

/// Something that reveals fog: a living agent and its vision radius.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
    pub position: Position,
    /// Vision radius in whole cells.
    pub radius: i32,
}

#[derive(Debug, Clone)]
pub struct FogGrid {
    width: u32,
    height: u32,
    cells: Vec<Visibility>,
    mode: FogMode,
    enabled: bool,
}

impl FogGrid {
    /// A fully unexplored grid.
    pub fn new(width: u32, height: u32, mode: FogMode) -> Self {
        Self {
            width,
            height,
            cells: vec![Visibility::Unexplored; (width * height) as usize],
            mode,
            enabled: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling reveals the whole map until fog is enabled again;
    /// re-enabling starts from an unexplored grid.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.cells.fill(Visibility::Visible);
        } else if !self.enabled {
            self.cells.fill(Visibility::Unexplored);
        }
        self.enabled = enabled;
    }

    fn index(&self, cell: GridPoint) -> Option<usize> {
        let in_bounds = cell.x >= 0
            && cell.y >= 0
            && (cell.x as u32) < self.width
            && (cell.y as u32) < self.height;
        in_bounds.then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Visibility of a cell; out-of-grid cells read as unexplored.
    pub fn visibility(&self, cell: GridPoint) -> Visibility {
        self.index(cell)
            .map(|i| self.cells[i])
            .unwrap_or(Visibility::Unexplored)
    }

    /// Whether the cell under a position is currently visible.
    pub fn is_visible(&self, pos: &Position) -> bool {
        pos.is_finite() && self.visibility(pos.cell()) == Visibility::Visible
    }

    fn upgrade(&mut self, cell: GridPoint, to: Visibility) {
        if let Some(i) = self.index(cell) {
            if self.cells[i] < to {
                self.cells[i] = to;
            }
        }
    }

    /// Recompute visibility from the current observers.
    pub fn update(&mut self, observers: &[Observer], map: &TileMap, los: &mut LosCache) {
        if !self.enabled {
            return;
        }

        match self.mode {
            FogMode::Tactical => self.cells.fill(Visibility::Unexplored),
            FogMode::Permanent => {
                for cell in &mut self.cells {
                    if *cell == Visibility::Visible {
                        *cell = Visibility::Explored;
                    }
                }
            }
        }

        for observer in observers {
            self.reveal(observer, map, los);
        }
    }

    fn reveal(&mut self, observer: &Observer, map: &TileMap, los: &mut LosCache) {
        if !observer.position.is_finite() {
            return;
        }
        let origin = observer.position.cell();
        let r = observer.radius.max(0);
        let r_sq = (r as i64) * (r as i64);

        for dy in -r..=r {
            for dx in -r..=r {
                if (dx as i64) * (dx as i64) + (dy as i64) * (dy as i64) > r_sq {
                    continue;
                }
                let cell = GridPoint::new(origin.x + dx, origin.y + dy);
                if self.index(cell).is_none() {
                    continue;
                }
                if los.query_cells(map, origin, cell) {
                    self.upgrade(cell, Visibility::Visible);
                }
            }
        }
    }

    /// Row-major export: 0 = unexplored, 1 = explored, 2 = visible.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells.iter().map(|v| *v as u8).collect()
    }
}
