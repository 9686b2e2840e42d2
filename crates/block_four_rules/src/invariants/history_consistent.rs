//! History consistency: the board is exactly the replay of the history.

use super::Invariant;
use crate::game::Game;
use crate::types::Cell;

/// Invariant: every history entry is on the board with its owner, and the
/// board holds no other pieces.
pub struct HistoryConsistentInvariant;

impl Invariant<Game> for HistoryConsistentInvariant {
    fn holds(game: &Game) -> bool {
        let moves = game.history().moves();
        game.board().filled() == moves.len()
            && moves
                .iter()
                .all(|mv| game.board().get(mv.position) == Cell::Occupied(mv.player))
    }

    fn description() -> &'static str {
        "Board state matches move history"
    }
}
