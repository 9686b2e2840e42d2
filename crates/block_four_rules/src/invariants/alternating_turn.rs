//! Alternating turn invariant: Red, Blue, Red, Blue, ...

use super::Invariant;
use crate::game::Game;
use crate::types::Player;

/// Invariant: the history alternates starting with Red, and while the game
/// is live `to_move` is the player after the last mover.
pub struct AlternatingTurnInvariant;

impl Invariant<Game> for AlternatingTurnInvariant {
    fn holds(game: &Game) -> bool {
        let moves = game.history().moves();

        if let Some(first) = moves.first()
            && first.player != Player::Red
        {
            return false;
        }

        if moves.windows(2).any(|w| w[0].player == w[1].player) {
            return false;
        }

        // A finished game keeps the winner as `to_move`.
        if game.is_over() {
            return true;
        }

        let expected = if moves.len() % 2 == 0 {
            Player::Red
        } else {
            Player::Blue
        };
        game.to_move() == expected
    }

    fn description() -> &'static str {
        "Players alternate turns (Red, Blue, Red, ...)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Move, Position};

    fn at(index: usize) -> Position {
        Position::from_index(index).unwrap()
    }

    #[test]
    fn test_alternating_sequence_holds() {
        let mut game = Game::new();
        for i in [24, 23, 22] {
            game.place(at(i)).unwrap();
        }
        assert!(AlternatingTurnInvariant::holds(&game));
        assert_eq!(game.to_move(), Player::Blue);
    }

    #[test]
    fn test_same_player_twice_violates() {
        let mut game = Game::new();
        game.place(Position::CENTER).unwrap();
        game.history.push(Move::new(Player::Red, at(23)));
        game.to_move = Player::Blue;
        assert!(!AlternatingTurnInvariant::holds(&game));
    }

    #[test]
    fn test_wrong_to_move_violates() {
        let mut game = Game::new();
        game.place(Position::CENTER).unwrap();
        game.to_move = Player::Red;
        assert!(!AlternatingTurnInvariant::holds(&game));
    }
}
