//! Four-in-a-row detection through the last placed cell.

use crate::position::{Direction, Position};
use crate::types::{Board, Player};
use strum::IntoEnumIterator;
use tracing::instrument;

/// Run length that wins.
pub const WIN_LENGTH: usize = 4;

/// Contiguous `player` cells through `last` along `direction`.
///
/// Counts `last` itself plus up to three cells each way, stopping at the
/// board edge or the first cell not held by `player`.
pub fn run_length(board: &Board, last: Position, player: Player, direction: Direction) -> usize {
    let (d_row, d_col) = direction.delta();
    let mut count = 1;
    for sense in [1, -1] {
        for step in 1..WIN_LENGTH as isize {
            match last.step(d_row * sense, d_col * sense, step) {
                Some(p) if board.is_owned_by(p, player) => count += 1,
                _ => break,
            }
        }
    }
    count
}

/// True if a line of at least four `player` cells passes through `last`.
#[instrument(skip(board), fields(last = %last, player = %player))]
pub fn check_win(board: &Board, last: Position, player: Player) -> bool {
    Direction::iter().any(|d| run_length(board, last, player, d) >= WIN_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn board_with(player: Player, indices: &[usize]) -> Board {
        let mut board = Board::new();
        for &i in indices {
            board.set(Position::from_index(i).unwrap(), Cell::Occupied(player));
        }
        board
    }

    fn at(index: usize) -> Position {
        Position::from_index(index).unwrap()
    }

    #[test]
    fn test_row_at_top_edge() {
        let board = board_with(Player::Red, &[0, 1, 2, 3]);
        assert!(check_win(&board, at(3), Player::Red));
        assert!(check_win(&board, at(1), Player::Red));
        assert!(!check_win(&board, at(3), Player::Blue));
    }

    #[test]
    fn test_three_is_not_enough() {
        let board = board_with(Player::Red, &[0, 1, 2]);
        assert!(!check_win(&board, at(2), Player::Red));
    }

    #[test]
    fn test_vertical() {
        let board = board_with(Player::Blue, &[3, 10, 17, 24]);
        assert!(check_win(&board, at(10), Player::Blue));
    }

    #[test]
    fn test_diagonal_down_right() {
        let board = board_with(Player::Red, &[0, 8, 16, 24]);
        assert!(check_win(&board, at(16), Player::Red));
    }

    #[test]
    fn test_anti_diagonal_at_corner() {
        // 6, 12, 18, 24 run from the top-right corner toward the center.
        let board = board_with(Player::Blue, &[6, 12, 18, 24]);
        assert!(check_win(&board, at(6), Player::Blue));
        assert_eq!(run_length(&board, at(6), Player::Blue, Direction::AntiDiagonal), 4);
    }

    #[test]
    fn test_line_does_not_wrap_rows() {
        // 5, 6 end row 0; 7, 8 start row 1.
        let board = board_with(Player::Red, &[5, 6, 7, 8]);
        assert!(!check_win(&board, at(6), Player::Red));
        assert!(!check_win(&board, at(7), Player::Red));
    }

    #[test]
    fn test_gap_breaks_run() {
        let board = board_with(Player::Red, &[0, 1, 3, 4]);
        assert!(!check_win(&board, at(1), Player::Red));
        assert!(!check_win(&board, at(3), Player::Red));
    }

    #[test]
    fn test_opponent_piece_breaks_run() {
        let mut board = board_with(Player::Red, &[21, 22, 24, 25]);
        board.set(at(23), Cell::Occupied(Player::Blue));
        assert!(!check_win(&board, at(22), Player::Red));
    }

    #[test]
    fn test_long_line_counts_from_middle() {
        let board = board_with(Player::Red, &[21, 22, 23, 24, 25, 26, 27]);
        assert!(check_win(&board, at(24), Player::Red));
        // Only three steps each way are examined.
        assert_eq!(run_length(&board, at(24), Player::Red, Direction::Horizontal), 7);
    }
}
