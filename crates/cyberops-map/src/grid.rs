//! TileMap: the walkable/blocking grid a mission is played on.

use cyberops_core::mission::MapDefinition;
use cyberops_core::types::{GridPoint, Position};
use cyberops_core::MissionDataError;

/// A single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Wall,
}

/// Mission tile grid, row-major. Immutable during a mission apart from
/// door unlocks.
#[derive(Debug, Clone)]
pub struct TileMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    /// Bumped on every tile write so caches can notice.
    revision: u64,
}

impl TileMap {
    /// A map with every cell set to `fill`.
    pub fn filled(width: u32, height: u32, fill: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; (width * height) as usize],
            revision: 0,
        }
    }

    /// Build from a mission map definition, validating its shape.
    pub fn from_definition(def: &MapDefinition) -> Result<Self, MissionDataError> {
        def.validate()?;
        let tiles = def
            .tiles
            .iter()
            .flat_map(|row| row.iter())
            .map(|&v| if v == 0 { Tile::Floor } else { Tile::Wall })
            .collect();
        Ok(Self {
            width: def.width,
            height: def.height,
            tiles,
            revision: 0,
        })
    }

    /// Parse an ASCII layout: `#` is a wall, anything else is floor.
    #[cfg(test)]
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut map = Self::filled(width, height, Tile::Floor);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    map.tiles[y * width as usize + x] = Tile::Wall;
                }
            }
        }
        map
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn in_bounds(&self, cell: GridPoint) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    fn index(&self, cell: GridPoint) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Tile at a cell, `None` outside the grid.
    pub fn tile(&self, cell: GridPoint) -> Option<Tile> {
        self.index(cell).map(|i| self.tiles[i])
    }

    /// Walls and out-of-map cells block.
    pub fn is_blocking(&self, cell: GridPoint) -> bool {
        !matches!(self.tile(cell), Some(Tile::Floor))
    }

    /// A finite position on a floor cell.
    pub fn is_walkable(&self, pos: &Position) -> bool {
        pos.is_finite() && !self.is_blocking(pos.cell())
    }

    /// Overwrite a cell. Returns true if the tile actually changed.
    pub fn set_tile(&mut self, cell: GridPoint, tile: Tile) -> bool {
        match self.index(cell) {
            Some(i) if self.tiles[i] != tile => {
                self.tiles[i] = tile;
                self.revision += 1;
                true
            }
            _ => false,
        }
    }

    /// Open a door: flips a wall cell to floor.
    pub fn unlock(&mut self, cell: GridPoint) -> bool {
        self.set_tile(cell, Tile::Floor)
    }
}
