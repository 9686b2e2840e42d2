//! Cell positions and neighbourhood geometry on the 7x7 board.
//!
//! Cells are linearized row-major: `index = row * 7 + col`. All helpers are
//! pure integer arithmetic over `0..49`.

use super::action::MoveError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of rows and columns on the board.
pub const SIDE: usize = 7;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = SIDE * SIDE;

/// A cell on the 7x7 board.
///
/// Always in range; construct through [`Position::from_index`],
/// [`Position::from_row_col`] or `TryFrom<usize>`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "usize", into = "usize")]
#[display("{_0}")]
pub struct Position(u8);

impl Position {
    /// The center cell (row 3, col 3). Every match opens here.
    pub const CENTER: Position = Position(24);

    /// Creates a position from a linear index (0-48).
    pub fn from_index(index: usize) -> Option<Self> {
        (index < CELL_COUNT).then(|| Position(index as u8))
    }

    /// Creates a position from row and column (each 0-6).
    pub fn from_row_col(row: usize, col: usize) -> Option<Self> {
        if row < SIDE && col < SIDE {
            Some(Position((row * SIDE + col) as u8))
        } else {
            None
        }
    }

    /// Linear board index (0-48).
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Row of this cell (0-6).
    pub fn row(self) -> usize {
        self.index() / SIDE
    }

    /// Column of this cell (0-6).
    pub fn col(self) -> usize {
        self.index() % SIDE
    }

    /// Returns true for the center cell.
    pub fn is_center(self) -> bool {
        self == Self::CENTER
    }

    /// Moves `steps` cells along `(d_row, d_col)`, or `None` past the edge.
    pub fn step(self, d_row: isize, d_col: isize, steps: isize) -> Option<Self> {
        let row = self.row() as isize + d_row * steps;
        let col = self.col() as isize + d_col * steps;
        if row < 0 || col < 0 {
            return None;
        }
        Self::from_row_col(row as usize, col as usize)
    }

    /// The in-bounds Moore neighbourhood of this cell (3 to 8 cells).
    pub fn surrounding(self) -> Vec<Position> {
        surrounding_indices(self.index())
            .into_iter()
            .map(|i| Position(i as u8))
            .collect()
    }

    /// True iff `other` is within Chebyshev distance 1.
    pub fn is_adjacent(self, other: Position) -> bool {
        is_adjacent(self.index(), other.index())
    }

    /// Iterates every cell in index order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELL_COUNT as u8).map(Position)
    }
}

impl TryFrom<usize> for Position {
    type Error = MoveError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(MoveError::OutOfBounds(index))
    }
}

impl From<Position> for usize {
    fn from(position: Position) -> Self {
        position.index()
    }
}

/// Returns the valid Moore neighbours of cell `index`, excluding the cell
/// itself and anything outside the 7x7 bounds.
///
/// Out-of-range indices have no neighbours.
#[instrument]
pub fn surrounding_indices(index: usize) -> Vec<usize> {
    if index >= CELL_COUNT {
        return Vec::new();
    }
    let row = (index / SIDE) as isize;
    let col = (index % SIDE) as isize;
    let mut indices = Vec::with_capacity(8);
    for r in row - 1..=row + 1 {
        for c in col - 1..=col + 1 {
            let in_bounds = r >= 0 && c >= 0 && r < SIDE as isize && c < SIDE as isize;
            if in_bounds && (r != row || c != col) {
                indices.push(r as usize * SIDE + c as usize);
            }
        }
    }
    indices
}

/// True iff `max(|row_a - row_b|, |col_a - col_b|) <= 1`.
pub fn is_adjacent(a: usize, b: usize) -> bool {
    let d_row = (a / SIDE).abs_diff(b / SIDE);
    let d_col = (a % SIDE).abs_diff(b % SIDE);
    d_row.max(d_col) <= 1
}

/// The four line axes checked for four-in-a-row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Direction {
    /// Along a row.
    Horizontal,
    /// Along a column.
    Vertical,
    /// Top-left to bottom-right.
    Diagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

impl Direction {
    /// `(d_row, d_col)` step for the forward sense of this axis.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Diagonal => (1, 1),
            Direction::AntiDiagonal => (1, -1),
        }
    }
}
