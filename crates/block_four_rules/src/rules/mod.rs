//! Game rules for Block Four.
//!
//! Pure functions over board, supply and history. Rules are separated from
//! the [`Game`](crate::Game) engine so offline and online play share them.

pub mod draw;
pub mod placement;
pub mod win;

pub use draw::is_draw;
pub use placement::{frontier_is_open, legal_positions, validate_placement};
pub use win::{WIN_LENGTH, check_win, run_length};
