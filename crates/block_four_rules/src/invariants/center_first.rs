//! Center-first invariant: the opening move is the center block.

use super::Invariant;
use crate::game::{Game, Phase};
use crate::position::Position;

/// Invariant: the first history entry sits on the center cell, and the
/// phase is `AwaitingCenter` exactly while the history is empty.
pub struct CenterFirstInvariant;

impl Invariant<Game> for CenterFirstInvariant {
    fn holds(game: &Game) -> bool {
        match game.history().moves().first() {
            None => game.phase() == Phase::AwaitingCenter,
            Some(first) => {
                first.position == Position::CENTER && game.phase() != Phase::AwaitingCenter
            }
        }
    }

    fn description() -> &'static str {
        "The center block is placed first and only once"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Move, Player};

    #[test]
    fn test_empty_game_holds() {
        assert!(CenterFirstInvariant::holds(&Game::new()));
    }

    #[test]
    fn test_off_center_opening_violates() {
        let mut game = Game::new();
        game.history.push(Move::new(Player::Red, Position::from_index(0).unwrap()));
        game.phase = Phase::InPlay;
        assert!(!CenterFirstInvariant::holds(&game));
    }

    #[test]
    fn test_stale_phase_violates() {
        let mut game = Game::new();
        game.place(Position::CENTER).unwrap();
        game.phase = Phase::AwaitingCenter;
        assert!(!CenterFirstInvariant::holds(&game));
    }
}
