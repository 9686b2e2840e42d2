//! Supply accounting: starting supply minus regular placements.

use super::Invariant;
use crate::game::Game;
use crate::types::Player;
use strum::IntoEnumIterator;

/// Invariant: for each player, remaining supply equals the starting supply
/// less that player's non-center placements.
pub struct SupplyConsistentInvariant;

impl Invariant<Game> for SupplyConsistentInvariant {
    fn holds(game: &Game) -> bool {
        let moves = game.history().moves();
        Player::iter().all(|player| {
            let spent = moves
                .iter()
                .skip(1)
                .filter(|mv| mv.player == player)
                .count();
            usize::from(player.starting_supply()).checked_sub(spent)
                == Some(usize::from(game.supply().remaining(player)))
        })
    }

    fn description() -> &'static str {
        "Supply equals starting count minus regular placements"
    }
}
