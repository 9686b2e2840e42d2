//! Contract-based validation for Block Four.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use super::action::{Move, MoveError};
use super::game::Game;
use super::invariants::{BlockFourInvariants, InvariantSet};
use super::rules::validate_placement;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the game has not finished.
pub struct GameNotOver;

impl GameNotOver {
    /// Fails with `GameOver` on a finished game.
    pub fn check(game: &Game) -> Result<(), MoveError> {
        if game.is_over() {
            Err(MoveError::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: it must be the mover's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Fails with `WrongPlayer` when `mov` is out of turn.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &Game) -> Result<(), MoveError> {
        if mov.player != game.to_move() {
            Err(MoveError::WrongPlayer(mov.player))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the mover has a piece to place. The center block is free.
pub struct HasSupply;

impl HasSupply {
    /// Fails with `SupplyExhausted` for a regular move with no pieces left.
    pub fn check(mov: &Move, game: &Game) -> Result<(), MoveError> {
        if game.center_placed() && game.supply().remaining(mov.player) == 0 {
            Err(MoveError::SupplyExhausted(mov.player))
        } else {
            Ok(())
        }
    }
}

/// Precondition: center-first and frontier rules.
pub struct LegalPlacement;

impl LegalPlacement {
    /// Delegates to [`validate_placement`].
    pub fn check(mov: &Move, game: &Game) -> Result<(), MoveError> {
        validate_placement(game.board(), game.history(), mov.position, mov.player)
    }
}

fn invariant_check(after: &Game) -> Result<(), MoveError> {
    BlockFourInvariants::check_all(after).map_err(|violations| {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        warn!(%descriptions, "Postcondition failed");
        MoveError::InvariantViolation(descriptions)
    })
}

// ─────────────────────────────────────────────────────────────
//  Place Contract
// ─────────────────────────────────────────────────────────────

/// Contract for placements.
///
/// Preconditions: game not over, mover's turn, legal cell, supply left.
/// Postconditions: exactly one more piece on the board, invariants hold.
pub struct PlaceContract;

impl Contract<Game, Move> for PlaceContract {
    fn pre(game: &Game, action: &Move) -> Result<(), MoveError> {
        GameNotOver::check(game)?;
        PlayersTurn::check(action, game)?;
        LegalPlacement::check(action, game)?;
        HasSupply::check(action, game)?;
        Ok(())
    }

    fn post(before: &Game, after: &Game) -> Result<(), MoveError> {
        if after.board().filled() != before.board().filled() + 1 {
            return Err(MoveError::InvariantViolation(
                "placement must add exactly one piece".to_string(),
            ));
        }
        invariant_check(after)
    }
}

// ─────────────────────────────────────────────────────────────
//  Undo Contract
// ─────────────────────────────────────────────────────────────

/// Marker action for an undo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRequest;

/// Contract for undo.
///
/// Preconditions: game not over, something other than the center to take
/// back. Postconditions: exactly one fewer piece, invariants hold.
pub struct UndoContract;

impl Contract<Game, UndoRequest> for UndoContract {
    fn pre(game: &Game, _action: &UndoRequest) -> Result<(), MoveError> {
        GameNotOver::check(game)?;
        game.history().check_undoable()
    }

    fn post(before: &Game, after: &Game) -> Result<(), MoveError> {
        if after.board().filled() + 1 != before.board().filled() {
            return Err(MoveError::InvariantViolation(
                "undo must remove exactly one piece".to_string(),
            ));
        }
        invariant_check(after)
    }
}
