//! Block Four rules - pure game logic for the 7x7 placement game.
//!
//! Two players take turns placing pieces on a 7x7 grid. Red opens with the
//! center block; afterwards every piece must touch the previous one while
//! that piece still has an empty neighbour. Four in a row wins, and running
//! both supplies dry without a line is a draw.
//!
//! # Example
//!
//! ```
//! use block_four_rules::{Game, Player, Position};
//!
//! let mut game = Game::new();
//! game.place(Position::CENTER).unwrap();
//! assert_eq!(game.to_move(), Player::Blue);
//! assert_eq!(game.legal_positions().len(), 8);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod contracts;
mod game;
mod history;
pub mod invariants;
mod position;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use contracts::{
    Contract, GameNotOver, HasSupply, LegalPlacement, PlaceContract, PlayersTurn, UndoContract,
    UndoRequest,
};
pub use game::{Game, Outcome, Phase, Placement, Undone};
pub use history::MoveHistory;
pub use invariants::{BlockFourInvariants, Invariant, InvariantSet, InvariantViolation};
pub use position::{CELL_COUNT, Direction, Position, SIDE, is_adjacent, surrounding_indices};
pub use types::{BLUE_SUPPLY, Board, Cell, Player, RED_SUPPLY, Supply};
