use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::fixed_math::{FixedNum, FixedVec2};

/// The 10×14 sample maze. Row 8, column 12 holds the only marker.
pub const DEFAULT_LAYOUT: [&str; 10] = [
    "--------------",
    "-     --     -",
    "- ---    --- -",
    "-  -  --     -",
    "--   --- - - -",
    "-- - ---     -",
    "-  -  -- - - -",
    "- ---    - - -",
    "-     --    p-",
    "--------------",
];

/// Grid coordinate. Ordered row-major so that ties resolve the same way on every run.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance. Admissible for 4-directional unit-cost moves.
    pub fn manhattan(self, other: Cell) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }

    /// Adjacent in one of the four cardinal directions.
    pub fn is_cardinal_neighbor(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Map symbol. Closed set: anything else is rejected while parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Open,
    /// Collectible spot. Walkable like `Open`.
    Marker,
}

impl Tile {
    pub fn from_symbol(symbol: char) -> Option<Tile> {
        match symbol {
            '-' => Some(Tile::Wall),
            ' ' => Some(Tile::Open),
            'p' => Some(Tile::Marker),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Tile::Wall => '-',
            Tile::Open => ' ',
            Tile::Marker => 'p',
        }
    }

    #[inline]
    pub fn is_passable(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    /// Traversal cost of entering the tile, `None` for walls.
    #[inline]
    pub fn weight(self) -> Option<u32> {
        match self {
            Tile::Wall => None,
            Tile::Open | Tile::Marker => Some(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMapError {
    #[error("map has no cells")]
    Empty,
    #[error("map is not rectangular: row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("unrecognized map symbol {symbol:?} at ({row}, {col})")]
    UnknownSymbol { row: usize, col: usize, symbol: char },
}

/// Rectangular tile grid parsed from symbol rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeMap {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl MazeMap {
    /// Parse rows of `'-'` (wall), `' '` (open) and `'p'` (marker).
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, InvalidMapError> {
        let parsed = rows
            .iter()
            .enumerate()
            .map(|(row, line)| {
                line.as_ref()
                    .chars()
                    .enumerate()
                    .map(|(col, symbol)| {
                        Tile::from_symbol(symbol).ok_or(InvalidMapError::UnknownSymbol { row, col, symbol })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_tiles(parsed)
    }

    pub fn from_tiles(rows: Vec<Vec<Tile>>) -> Result<Self, InvalidMapError> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || cols == 0 {
            return Err(InvalidMapError::Empty);
        }

        let height = rows.len();
        let mut tiles = Vec::with_capacity(height * cols);
        for (row, line) in rows.into_iter().enumerate() {
            if line.len() != cols {
                return Err(InvalidMapError::Ragged { row, expected: cols, found: line.len() });
            }
            tiles.extend(line);
        }

        Ok(Self { rows: height, cols, tiles })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        self.contains(cell).then(|| self.tiles[cell.row * self.cols + cell.col])
    }

    /// Every cell holding `tile`, row-major.
    pub fn cells_of(&self, tile: Tile) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.cols;
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, t)| **t == tile)
            .map(move |(i, _)| Cell::new(i / cols, i % cols))
    }

    /// Render back to symbol rows.
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.cols)
            .map(|row| row.iter().map(|t| t.symbol()).collect())
            .collect()
    }
}

/// Maps cells to continuous positions. Screen-style axes: x grows with the
/// column, y grows with the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellGeometry {
    pub cell_size: FixedNum,
}

impl CellGeometry {
    pub fn new(cell_size: FixedNum) -> Self {
        Self { cell_size }
    }

    pub fn center(&self, cell: Cell) -> FixedVec2 {
        let offset = self.cell_size / FixedNum::from_num(2);
        FixedVec2::new(
            FixedNum::from_num(cell.col) * self.cell_size + offset,
            FixedNum::from_num(cell.row) * self.cell_size + offset,
        )
    }

    /// Top-left corner of the cell.
    pub fn origin(&self, cell: Cell) -> FixedVec2 {
        FixedVec2::new(
            FixedNum::from_num(cell.col) * self.cell_size,
            FixedNum::from_num(cell.row) * self.cell_size,
        )
    }

    pub fn cell_at(&self, pos: FixedVec2) -> Option<Cell> {
        if pos.x < FixedNum::ZERO || pos.y < FixedNum::ZERO {
            return None;
        }
        let col = (pos.x / self.cell_size).to_num::<usize>();
        let row = (pos.y / self.cell_size).to_num::<usize>();
        Some(Cell::new(row, col))
    }
}
