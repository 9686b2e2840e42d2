//! The Block Four engine shared by offline and online play.
//!
//! A [`Game`] owns one board, supply, history and turn. It is a small state
//! machine: `AwaitingCenter -> InPlay -> Finished`.

use super::action::{Move, MoveError};
use super::contracts::{Contract, PlaceContract, UndoContract, UndoRequest};
use super::history::MoveHistory;
use super::position::Position;
use super::rules;
use super::types::{Board, Cell, Player, Supply};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player completed four in a row.
    Winner(Player),
    /// Both supplies ran out with no line.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "{} wins", player.to_string().to_uppercase()),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Where a match is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No piece yet; only the center block is legal.
    AwaitingCenter,
    /// Normal play under the frontier rule.
    InPlay,
    /// Won or drawn. No further moves.
    Finished(Outcome),
}

/// Result of an accepted placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// The move that was applied.
    pub mv: Move,
    /// True for the opening center block.
    pub central: bool,
    /// Supply after the move.
    pub supply: Supply,
    /// Set when this move ended the game.
    pub outcome: Option<Outcome>,
    /// Player to move next (unchanged when the game ended).
    pub to_move: Player,
}

/// Result of an accepted undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undone {
    /// The move that was taken back.
    pub mv: Move,
    /// Supply after the piece was returned.
    pub supply: Supply,
    /// Player to move next.
    pub to_move: Player,
}

/// Block Four game engine.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) board: Board,
    pub(crate) supply: Supply,
    pub(crate) history: MoveHistory,
    pub(crate) to_move: Player,
    pub(crate) phase: Phase,
}

impl Game {
    /// Creates a new game. Red moves first.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            supply: Supply::new(),
            history: MoveHistory::new(),
            to_move: Player::Red,
            phase: Phase::AwaitingCenter,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the remaining supply.
    pub fn supply(&self) -> &Supply {
        &self.supply
    }

    /// Returns the move history.
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Returns the player to move.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The outcome once finished.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// True once won or drawn.
    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    /// True once the center block is down.
    pub fn center_placed(&self) -> bool {
        !self.history.is_empty()
    }

    /// The most recent move.
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// Cells the player to move may use now. Empty once the game is over.
    #[instrument(skip(self))]
    pub fn legal_positions(&self) -> Vec<Position> {
        if self.is_over() {
            return Vec::new();
        }
        rules::legal_positions(&self.board, &self.history, self.to_move)
    }

    /// Places a piece for the player to move (center or regular).
    pub fn place(&mut self, position: Position) -> Result<Placement, MoveError> {
        self.place_as(Move::new(self.to_move, position))
    }

    /// Places the opening center block for `player`.
    #[instrument(skip(self))]
    pub fn place_center(&mut self, player: Player) -> Result<Placement, MoveError> {
        if self.center_placed() {
            return Err(MoveError::CenterAlreadyPlaced);
        }
        self.place_as(Move::new(player, Position::CENTER))
    }

    /// Places a regular (non-center) piece. Refused until the center is down.
    #[instrument(skip(self))]
    pub fn place_block(&mut self, mv: Move) -> Result<Placement, MoveError> {
        if !self.center_placed() {
            return Err(MoveError::CenterRequired);
        }
        self.place_as(mv)
    }

    /// Applies a move after checking the placement contract.
    ///
    /// The center block is free; every other piece costs one from the
    /// mover's supply. A winning line or an exhausted supply finishes the
    /// game; otherwise the turn passes.
    #[instrument(skip(self), fields(mv = %mv))]
    pub fn place_as(&mut self, mv: Move) -> Result<Placement, MoveError> {
        #[cfg(debug_assertions)]
        let before = self.clone();

        PlaceContract::pre(self, &mv)?;

        let central = self.history.is_empty();
        if !central {
            self.supply.take(mv.player)?;
        }
        self.board.set(mv.position, Cell::Occupied(mv.player));
        self.history.push(mv);

        let outcome = if rules::check_win(&self.board, mv.position, mv.player) {
            Some(Outcome::Winner(mv.player))
        } else if rules::is_draw(&self.board, &self.supply, &mv) {
            Some(Outcome::Draw)
        } else {
            None
        };

        if let Some(outcome) = outcome {
            info!(%outcome, moves = self.history.len(), "Game finished");
            self.phase = Phase::Finished(outcome);
        } else {
            self.to_move = self.to_move.opponent();
            self.phase = Phase::InPlay;

            #[cfg(debug_assertions)]
            PlaceContract::post(&before, self)?;
        }

        debug!(
            red = self.supply.red(),
            blue = self.supply.blue(),
            to_move = %self.to_move,
            "Placement applied"
        );

        Ok(Placement {
            mv,
            central,
            supply: self.supply,
            outcome,
            to_move: self.to_move,
        })
    }

    /// Takes back the most recent move.
    ///
    /// Clears the cell, returns the piece to its owner's supply and toggles
    /// the turn. The center block is never undone.
    #[instrument(skip(self), fields(len = self.history.len()))]
    pub fn undo(&mut self) -> Result<Undone, MoveError> {
        #[cfg(debug_assertions)]
        let before = self.clone();

        UndoContract::pre(self, &UndoRequest)?;

        let mv = self.history.pop_undoable()?;
        self.board.set(mv.position, Cell::Empty);
        self.supply.restore(mv.player);
        self.to_move = self.to_move.opponent();

        #[cfg(debug_assertions)]
        UndoContract::post(&before, self)?;

        debug!(%mv, to_move = %self.to_move, "Move undone");

        Ok(Undone {
            mv,
            supply: self.supply,
            to_move: self.to_move,
        })
    }

    /// Replays moves from a fresh game.
    #[instrument(skip(moves), fields(count = moves.len()))]
    pub fn replay(moves: &[Move]) -> Result<Game, MoveError> {
        let mut game = Game::new();
        for mv in moves {
            game.place_as(*mv)?;
        }
        Ok(game)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
