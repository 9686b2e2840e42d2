//! Append-only move log with pop-based undo.

use super::action::{Move, MoveError};
use super::types::Player;
use tracing::{debug, instrument};

/// Moves in play order.
///
/// The first entry, when present, is the center block. It can never be
/// popped: undo is refused once the history is down to that single move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<Move>,
}

impl MoveHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of moves played.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// True before the center block is placed.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// All moves, oldest first.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The most recent move.
    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// The player who made the most recent move.
    pub fn last_mover(&self) -> Option<Player> {
        self.last().map(|m| m.player)
    }

    /// Appends a move.
    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// Checks whether [`MoveHistory::pop_undoable`] would succeed.
    pub fn check_undoable(&self) -> Result<(), MoveError> {
        match self.moves.len() {
            0 => Err(MoveError::NothingToUndo),
            1 => Err(MoveError::CenterImmutable),
            _ => Ok(()),
        }
    }

    /// Removes and returns the most recent move.
    ///
    /// # Errors
    ///
    /// `NothingToUndo` on an empty history, `CenterImmutable` when only the
    /// center block remains.
    #[instrument(skip(self), fields(len = self.moves.len()))]
    pub fn pop_undoable(&mut self) -> Result<Move, MoveError> {
        self.check_undoable()?;
        let mv = self.moves.pop().ok_or(MoveError::NothingToUndo)?;
        debug!(%mv, "Popped move from history");
        Ok(mv)
    }
}
