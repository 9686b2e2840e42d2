//! Placement legality: center-first and the frontier rule.

use crate::action::MoveError;
use crate::history::MoveHistory;
use crate::position::Position;
use crate::types::{Board, Player};
use tracing::{debug, instrument};

/// True if the last move still has at least one empty neighbour.
///
/// While the frontier is open, the next piece must touch the last move.
pub fn frontier_is_open(board: &Board, last: Position) -> bool {
    last.surrounding().into_iter().any(|p| board.is_empty(p))
}

/// Validates a proposed placement.
///
/// 1. With no history, only the center cell is legal.
/// 2. Occupied cells are never legal.
/// 3. Let `L` be the last move and `P` its player. If `L` has an empty
///    neighbour the target must be adjacent to `L`; otherwise it must be
///    adjacent to any cell held by `P`.
///
/// Turn order and supply are checked by the caller.
#[instrument(skip(board, history), fields(position = %position, player = %player))]
pub fn validate_placement(
    board: &Board,
    history: &MoveHistory,
    position: Position,
    player: Player,
) -> Result<(), MoveError> {
    let Some(last) = history.last() else {
        return if position.is_center() {
            Ok(())
        } else {
            debug!("Rejected: center must be placed first");
            Err(MoveError::CenterRequired)
        };
    };

    if !board.is_empty(position) {
        debug!("Rejected: cell occupied");
        return Err(MoveError::Occupied(position));
    }

    let legal = if frontier_is_open(board, last.position) {
        position.is_adjacent(last.position)
    } else {
        position
            .surrounding()
            .into_iter()
            .any(|p| board.is_owned_by(p, last.player))
    };

    if legal {
        Ok(())
    } else {
        debug!(last = %last.position, "Rejected: off the frontier");
        Err(MoveError::OffFrontier(position))
    }
}

/// Every cell a piece could legally be placed on right now.
#[instrument(skip(board, history))]
pub fn legal_positions(board: &Board, history: &MoveHistory, player: Player) -> Vec<Position> {
    Position::all()
        .filter(|p| validate_placement(board, history, *p, player).is_ok())
        .collect()
}
