//! First-class action types for Block Four.
//!
//! Moves are domain events, not side effects. They represent
//! the player's intent and can be validated independently of execution.

use super::position::Position;
use super::types::Player;
use serde::{Deserialize, Serialize};

/// A move: a player placing a piece at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player making the move.
    pub player: Player,
    /// The cell where the piece lands.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    pub fn new(player: Player, position: Position) -> Self {
        Self { player, position }
    }

    /// Returns the player making this move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Returns the position of this move.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.position)
    }
}

/// Error that can occur when validating or applying a move or an undo.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The first piece of a match must go on the center cell.
    #[display("must place center first")]
    CenterRequired,

    /// The center block is already on the board.
    #[display("center block has already been placed")]
    CenterAlreadyPlaced,

    /// The target cell already holds a piece.
    #[display("cell {_0} is occupied")]
    Occupied(Position),

    /// The target cell violates the frontier rule.
    #[display("cannot place at cell {_0}")]
    OffFrontier(Position),

    /// The index does not name a cell.
    #[display("cell index {_0} is off the board")]
    OutOfBounds(usize),

    /// The player has no pieces left.
    #[display("{_0} has no pieces left")]
    SupplyExhausted(Player),

    /// It's not this player's turn.
    #[display("it's not {_0}'s turn")]
    WrongPlayer(Player),

    /// The request named a colour other than the sender's own.
    #[display("you are playing {_0}")]
    ColourMismatch(Player),

    /// The game is already over.
    #[display("game is already over")]
    GameOver,

    /// History is empty.
    #[display("nothing to undo")]
    NothingToUndo,

    /// Only the center block remains and it is permanent.
    #[display("the center block cannot be undone")]
    CenterImmutable,

    /// An invariant was violated (postcondition failure).
    #[display("invariant violation: {_0}")]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

impl MoveError {
    /// True for errors that reject a placement attempt (wrong phase, occupied
    /// cell, rule violation).
    pub fn is_invalid_placement(&self) -> bool {
        matches!(
            self,
            MoveError::CenterRequired
                | MoveError::CenterAlreadyPlaced
                | MoveError::Occupied(_)
                | MoveError::OffFrontier(_)
                | MoveError::OutOfBounds(_)
                | MoveError::SupplyExhausted(_)
                | MoveError::ColourMismatch(_)
        )
    }
}
