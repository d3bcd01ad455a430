//! Tile grid maze
//!
//! Levels are rows of numeric tile codes. Walls are static; pellets and
//! special items are cleared when consumed and never come back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// The built-in 15x15 store layout.
///
/// 1 = Wall, 2 = Pellet, 0 = Empty, 8 = adversary start, 9 = player start
pub const DEFAULT_LEVEL: [[u8; 15]; 15] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 1, 1, 2, 1, 2, 1, 1, 1, 1, 2, 1],
    [1, 2, 1, 0, 0, 1, 2, 1, 2, 1, 0, 0, 1, 2, 1],
    [1, 2, 1, 1, 1, 1, 2, 1, 2, 1, 1, 1, 1, 2, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 2, 1, 1, 8, 1, 1, 2, 1, 1, 2, 1],
    [1, 2, 1, 1, 2, 1, 0, 0, 0, 1, 2, 1, 1, 2, 1],
    [1, 2, 2, 2, 2, 1, 0, 0, 0, 1, 2, 2, 2, 2, 1],
    [1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 1, 1, 2, 1, 2, 1, 1, 1, 1, 2, 1],
    [1, 2, 2, 2, 1, 1, 2, 9, 2, 1, 1, 2, 2, 2, 1],
    [1, 1, 1, 2, 2, 2, 2, 1, 2, 2, 2, 2, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Cell contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Wall,
    Pellet,
    /// Power pellet, or a shopping-list item when labelled
    SpecialItem,
    PlayerStart,
    AdversaryStart,
}

impl CellKind {
    /// Parse a level tile code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellKind::Empty),
            1 => Some(CellKind::Wall),
            2 => Some(CellKind::Pellet),
            3 => Some(CellKind::SpecialItem),
            8 => Some(CellKind::AdversaryStart),
            9 => Some(CellKind::PlayerStart),
            _ => None,
        }
    }
}

/// Rectangular tile maze, row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GridCells")]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_size: f32,
    cells: Vec<CellKind>,
    /// Live counts so win checks don't rescan the grid
    pellets_left: usize,
    specials_left: usize,
}

/// Serialized cell layout. Live counts are always rebuilt from the cells.
#[derive(Deserialize)]
struct GridCells {
    width: usize,
    height: usize,
    tile_size: f32,
    cells: Vec<CellKind>,
}

impl TryFrom<GridCells> for TileGrid {
    type Error = GridError;

    fn try_from(raw: GridCells) -> Result<Self, GridError> {
        if raw.width == 0 || raw.height == 0 {
            return Err(GridError::Empty);
        }
        if raw.cells.len() != raw.width * raw.height {
            return Err(GridError::SizeMismatch {
                width: raw.width,
                height: raw.height,
                found: raw.cells.len(),
            });
        }
        Ok(Self::with_counts(raw.width, raw.height, raw.tile_size, raw.cells))
    }
}

impl TileGrid {
    fn with_counts(width: usize, height: usize, tile_size: f32, cells: Vec<CellKind>) -> Self {
        let pellets_left = cells.iter().filter(|&&c| c == CellKind::Pellet).count();
        let specials_left = cells.iter().filter(|&&c| c == CellKind::SpecialItem).count();
        Self {
            width,
            height,
            tile_size,
            cells,
            pellets_left,
            specials_left,
        }
    }

    /// Build a grid from rows of tile codes
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R], tile_size: f32) -> Result<Self, GridError> {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, codes) in rows.iter().enumerate() {
            let codes = codes.as_ref();
            if codes.len() != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found: codes.len(),
                });
            }
            for (col, &code) in codes.iter().enumerate() {
                let kind =
                    CellKind::from_code(code).ok_or(GridError::UnknownCode { code, col, row })?;
                cells.push(kind);
            }
        }

        Ok(Self::with_counts(width, rows.len(), tile_size, cells))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Width of the maze in world units
    pub fn world_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    /// Height of the maze in world units
    pub fn world_height(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    #[inline]
    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    fn index(&self, col: i32, row: i32) -> Result<usize, GridError> {
        if self.contains(col, row) {
            Ok(row as usize * self.width + col as usize)
        } else {
            Err(GridError::OutOfBounds {
                col,
                row,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Bounds-checked cell lookup
    pub fn cell_at(&self, col: i32, row: i32) -> Result<CellKind, GridError> {
        self.index(col, row).map(|i| self.cells[i])
    }

    pub fn is_wall(&self, col: i32, row: i32) -> Result<bool, GridError> {
        Ok(self.cell_at(col, row)? == CellKind::Wall)
    }

    /// Read and clear a pellet or special item.
    ///
    /// Returns what was consumed, or `Empty` when there was nothing to eat.
    /// Calling it twice on the same cell is harmless.
    pub fn consume(&mut self, col: i32, row: i32) -> Result<CellKind, GridError> {
        let i = self.index(col, row)?;
        let kind = self.cells[i];
        match kind {
            CellKind::Pellet => self.pellets_left -= 1,
            CellKind::SpecialItem => self.specials_left -= 1,
            _ => return Ok(CellKind::Empty),
        }
        self.cells[i] = CellKind::Empty;
        Ok(kind)
    }

    /// Turn a pellet into a special item (item placement, before play starts)
    pub(crate) fn promote_to_special(&mut self, col: i32, row: i32) -> Result<bool, GridError> {
        let i = self.index(col, row)?;
        if self.cells[i] != CellKind::Pellet {
            return Ok(false);
        }
        self.cells[i] = CellKind::SpecialItem;
        self.pellets_left -= 1;
        self.specials_left += 1;
        Ok(true)
    }

    /// Cell containing a world position
    #[inline]
    pub fn world_to_cell(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.tile_size).floor() as i32,
            (pos.y / self.tile_size).floor() as i32,
        )
    }

    /// World position of a cell's center
    #[inline]
    pub fn cell_center(&self, col: i32, row: i32) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.tile_size,
            (row as f32 + 0.5) * self.tile_size,
        )
    }

    /// All cells of a kind, in row-major order
    pub fn cells_of(&self, kind: CellKind) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, c)| **c == kind)
            .map(move |(i, _)| ((i % self.width) as i32, (i / self.width) as i32))
    }

    pub fn find_first(&self, kind: CellKind) -> Option<(i32, i32)> {
        self.cells_of(kind).next()
    }

    /// Full scan count
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Live remaining count for consumable kinds
    pub fn remaining(&self, kind: CellKind) -> usize {
        match kind {
            CellKind::Pellet => self.pellets_left,
            CellKind::SpecialItem => self.specials_left,
            other => self.count(other),
        }
    }
}
