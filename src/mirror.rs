//! Client-side view of an online match.
//!
//! A [`BoardMirror`] applies server deltas to a local board. It is not
//! authoritative: legality checks here only avoid sending moves the server
//! would refuse anyway.

use crate::error::SessionError;
use crate::protocol::{ClientMsg, RoomId, ServerMsg, Winner};
use block_four_rules::{
    BLUE_SUPPLY, Board, Cell, Move, MoveError, MoveHistory, Player, Position, RED_SUPPLY, rules,
};
use tracing::{debug, instrument, warn};

/// Local mirror of one match.
#[derive(Debug, Clone)]
pub struct BoardMirror {
    board: Board,
    history: MoveHistory,
    room_id: Option<RoomId>,
    my_color: Option<Player>,
    opponent_nickname: Option<String>,
    current_player: Player,
    red_count: u8,
    blue_count: u8,
    winner: Option<Winner>,
    opponent_left: bool,
}

impl Default for BoardMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardMirror {
    /// An empty mirror, not yet in a match.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            history: MoveHistory::new(),
            room_id: None,
            my_color: None,
            opponent_nickname: None,
            current_player: Player::Red,
            red_count: RED_SUPPLY,
            blue_count: BLUE_SUPPLY,
            winner: None,
            opponent_left: false,
        }
    }

    /// Mirrored board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Room of the current match.
    pub fn room_id(&self) -> Option<&RoomId> {
        self.room_id.as_ref()
    }

    /// Colour assigned by the server.
    pub fn my_color(&self) -> Option<Player> {
        self.my_color
    }

    /// Opponent's display name.
    pub fn opponent_nickname(&self) -> Option<&str> {
        self.opponent_nickname.as_deref()
    }

    /// Colour to move.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// True while the match is live and it is this client's move.
    pub fn is_my_turn(&self) -> bool {
        self.winner.is_none() && !self.opponent_left && self.my_color == Some(self.current_player)
    }

    /// Supplies as last reported, `(red, blue)`.
    pub fn counts(&self) -> (u8, u8) {
        (self.red_count, self.blue_count)
    }

    /// True once the center block is down.
    pub fn center_placed(&self) -> bool {
        !self.history.is_empty()
    }

    /// Result once `gameOver` arrived.
    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    /// True once `opponentDisconnected` arrived.
    pub fn opponent_left(&self) -> bool {
        self.opponent_left
    }

    /// Applies one server message. Returns true if the mirror changed.
    #[instrument(skip(self, msg))]
    pub fn apply(&mut self, msg: &ServerMsg) -> bool {
        match msg {
            ServerMsg::MatchAccepted {
                room_id,
                color,
                opponent_nickname,
            } => {
                *self = Self::new();
                self.room_id = Some(room_id.clone());
                self.my_color = Some(*color);
                self.opponent_nickname = Some(opponent_nickname.clone());
                debug!(room = %room_id, %color, "Match joined");
                true
            }
            ServerMsg::CentralBlockPlaced {
                index,
                player,
                red_count,
                blue_count,
            }
            | ServerMsg::BlockPlaced {
                index,
                player,
                red_count,
                blue_count,
            } => {
                let Some(position) = Position::from_index(*index) else {
                    warn!(index, "Ignoring placement outside the board");
                    return false;
                };
                self.board.set(position, Cell::Occupied(*player));
                self.history.push(Move::new(*player, position));
                self.red_count = *red_count;
                self.blue_count = *blue_count;
                true
            }
            ServerMsg::TurnChange { current_player } => {
                self.current_player = *current_player;
                true
            }
            ServerMsg::MoveUndone {
                index,
                red_count,
                blue_count,
                current_player,
            } => {
                if let Some(position) = Position::from_index(*index) {
                    self.board.set(position, Cell::Empty);
                }
                let last = self.history.last().map(|m| m.position.index());
                if last == Some(*index) {
                    // The server never undoes the center, so this only fails
                    // on a desynchronized mirror.
                    if let Err(e) = self.history.pop_undoable() {
                        warn!(error = %e, "Mirror history out of step");
                    }
                } else {
                    warn!(index, ?last, "Undo does not match the mirrored last move");
                }
                self.red_count = *red_count;
                self.blue_count = *blue_count;
                self.current_player = *current_player;
                true
            }
            ServerMsg::GameOver { winner } => {
                self.winner = Some(*winner);
                true
            }
            ServerMsg::OpponentDisconnected => {
                self.opponent_left = true;
                true
            }
            _ => false,
        }
    }

    /// Builds the command for clicking `index`, or explains why not.
    pub fn place_intent(&self, index: usize) -> Result<ClientMsg, SessionError> {
        let (Some(room_id), Some(color)) = (self.room_id.clone(), self.my_color) else {
            return Err(SessionError::NotYourTurn);
        };
        if !self.is_my_turn() {
            return Err(SessionError::NotYourTurn);
        }
        let position = Position::from_index(index).ok_or(SessionError::InvalidPlacement {
            reason: MoveError::OutOfBounds(index),
        })?;
        rules::validate_placement(&self.board, &self.history, position, color)?;
        Ok(if self.center_placed() {
            ClientMsg::PlaceBlock {
                room_id,
                index,
                color,
            }
        } else {
            ClientMsg::PlaceCentralBlock {
                room_id,
                index,
                color,
            }
        })
    }

    /// Builds an undo command for the current room.
    pub fn undo_intent(&self) -> Option<ClientMsg> {
        self.room_id.clone().map(|room_id| ClientMsg::UndoMove { room_id })
    }
}
