//! Draw detection for Block Four.

use super::win::check_win;
use crate::action::Move;
use crate::types::{Board, Supply};
use tracing::instrument;

/// A draw: both supplies are spent and the final move made no line.
#[instrument(skip(board))]
pub fn is_draw(board: &Board, supply: &Supply, last: &Move) -> bool {
    supply.is_exhausted() && !check_win(board, last.position, last.player)
}
