//! Core domain types for Block Four.

use super::action::MoveError;
use super::position::{CELL_COUNT, Position, SIDE};
use serde::{Deserialize, Serialize};

/// Pieces Red starts with, not counting the free center block.
pub const RED_SUPPLY: u8 = 23;

/// Pieces Blue starts with.
pub const BLUE_SUPPLY: u8 = 24;

/// Player colour.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    /// Red (moves first and places the center block).
    #[display("red")]
    Red,
    /// Blue.
    #[display("blue")]
    Blue,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    /// Number of pieces this colour starts a match with.
    pub fn starting_supply(self) -> u8 {
        match self {
            Player::Red => RED_SUPPLY,
            Player::Blue => BLUE_SUPPLY,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell holding a player's piece.
    Occupied(Player),
}

impl Cell {
    /// The occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }

    /// True for an empty cell.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// The 7x7 board, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Gets the cell at `pos`.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    /// Sets the cell at `pos`.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.index()] = cell;
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_empty()
    }

    /// True if `pos` holds a piece of `player`.
    pub fn is_owned_by(&self, pos: Position, player: Player) -> bool {
        self.get(pos) == Cell::Occupied(player)
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Number of cells holding `player`'s pieces.
    pub fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .filter(|c| **c == Cell::Occupied(player))
            .count()
    }

    /// Number of occupied cells.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// True once the center block is down.
    pub fn center_placed(&self) -> bool {
        !self.is_empty(Position::CENTER)
    }

    /// Formats the board as a human-readable grid (`.`, `R`, `B`).
    pub fn display(&self) -> String {
        let mut result = String::with_capacity(CELL_COUNT * 2);
        for row in 0..SIDE {
            for col in 0..SIDE {
                let symbol = match self.cells[row * SIDE + col] {
                    Cell::Empty => '.',
                    Cell::Occupied(Player::Red) => 'R',
                    Cell::Occupied(Player::Blue) => 'B',
                };
                result.push(symbol);
                if col + 1 < SIDE {
                    result.push(' ');
                }
            }
            if row + 1 < SIDE {
                result.push('\n');
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Remaining placeable pieces per colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Supply {
    red: u8,
    blue: u8,
}

impl Supply {
    /// Full starting supply (23 red, 24 blue).
    pub fn new() -> Self {
        Self {
            red: RED_SUPPLY,
            blue: BLUE_SUPPLY,
        }
    }

    /// Creates a supply with explicit counts, clamped to the starting amounts.
    pub fn with_counts(red: u8, blue: u8) -> Self {
        Self {
            red: red.min(RED_SUPPLY),
            blue: blue.min(BLUE_SUPPLY),
        }
    }

    /// Red pieces remaining.
    pub fn red(&self) -> u8 {
        self.red
    }

    /// Blue pieces remaining.
    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// Pieces remaining for `player`.
    pub fn remaining(&self, player: Player) -> u8 {
        match player {
            Player::Red => self.red,
            Player::Blue => self.blue,
        }
    }

    /// Removes one piece from `player`'s supply.
    pub fn take(&mut self, player: Player) -> Result<(), MoveError> {
        let slot = self.slot(player);
        *slot = slot
            .checked_sub(1)
            .ok_or(MoveError::SupplyExhausted(player))?;
        Ok(())
    }

    /// Returns one piece to `player`'s supply, never above the starting count.
    pub fn restore(&mut self, player: Player) {
        let slot = self.slot(player);
        *slot = (*slot + 1).min(player.starting_supply());
    }

    /// True when both colours are out of pieces.
    pub fn is_exhausted(&self) -> bool {
        self.red == 0 && self.blue == 0
    }

    fn slot(&mut self, player: Player) -> &mut u8 {
        match player {
            Player::Red => &mut self.red,
            Player::Blue => &mut self.blue,
        }
    }
}

impl Default for Supply {
    fn default() -> Self {
        Self::new()
    }
}
