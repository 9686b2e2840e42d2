//! One online match: two seats around a shared [`Game`].
//!
//! A room turns accepted commands into the messages both participants must
//! see. It knows nothing about connections or the lobby, so it can be driven
//! directly in tests.

use crate::error::SessionError;
use crate::protocol::{ParticipantId, RoomId, ServerMsg, Winner};
use block_four_rules::{Game, Move, MoveError, Placement, Player, Position};
use tracing::{debug, info, instrument, warn};

/// Which participant holds which colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seats {
    /// Red seat (moves first).
    pub red: ParticipantId,
    /// Blue seat.
    pub blue: ParticipantId,
}

impl Seats {
    /// The colour `id` plays, if seated.
    pub fn colour_of(&self, id: ParticipantId) -> Option<Player> {
        if id == self.red {
            Some(Player::Red)
        } else if id == self.blue {
            Some(Player::Blue)
        } else {
            None
        }
    }

    /// The participant playing `colour`.
    pub fn holder(&self, colour: Player) -> ParticipantId {
        match colour {
            Player::Red => self.red,
            Player::Blue => self.blue,
        }
    }

    /// Both participants, red first.
    pub fn both(&self) -> [ParticipantId; 2] {
        [self.red, self.blue]
    }
}

/// Which placement command was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceKind {
    /// `placeCentralBlock`.
    Central,
    /// `placeBlock`.
    Regular,
}

/// Messages for both seats after an accepted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomUpdate {
    /// In delivery order.
    pub messages: Vec<ServerMsg>,
    /// True once the game ended; the room should be torn down.
    pub finished: bool,
}

/// An online match.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    seats: Seats,
    game: Game,
}

impl Room {
    /// Opens a room with a fresh game.
    #[instrument(skip_all, fields(red = %seats.red, blue = %seats.blue))]
    pub fn new(id: RoomId, seats: Seats) -> Self {
        info!(room = %id, "Room opened");
        Self {
            id,
            seats,
            game: Game::new(),
        }
    }

    /// Room id.
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Seat assignment.
    pub fn seats(&self) -> &Seats {
        &self.seats
    }

    /// The authoritative game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The other seat, if `id` is seated.
    pub fn opponent_of(&self, id: ParticipantId) -> Option<ParticipantId> {
        self.seats
            .colour_of(id)
            .map(|colour| self.seats.holder(colour.opponent()))
    }

    /// Checks `from` holds the colour to move and returns it.
    fn mover(&self, from: ParticipantId) -> Result<Player, SessionError> {
        let to_move = self.game.to_move();
        match self.seats.colour_of(from) {
            Some(colour) if colour == to_move => Ok(colour),
            colour => {
                debug!(%from, ?colour, %to_move, "Out of turn");
                Err(SessionError::NotYourTurn)
            }
        }
    }

    /// Applies a placement from `from`.
    ///
    /// `claimed` must match the sender's seat. On success both seats get
    /// the placement delta, then `gameOver` or `turnChange`.
    #[instrument(skip(self), fields(room = %self.id))]
    pub fn place(
        &mut self,
        from: ParticipantId,
        kind: PlaceKind,
        index: usize,
        claimed: Player,
    ) -> Result<RoomUpdate, SessionError> {
        if self.game.is_over() {
            return Err(MoveError::GameOver.into());
        }
        let colour = self.mover(from)?;
        if claimed != colour {
            warn!(%claimed, %colour, "Claimed colour does not match seat");
            return Err(SessionError::InvalidPlacement {
                reason: MoveError::ColourMismatch(colour),
            });
        }
        let position = Position::from_index(index).ok_or(SessionError::InvalidPlacement {
            reason: MoveError::OutOfBounds(index),
        })?;

        let placement = match kind {
            PlaceKind::Central if !position.is_center() && !self.game.center_placed() => {
                return Err(SessionError::InvalidPlacement {
                    reason: MoveError::CenterRequired,
                });
            }
            PlaceKind::Central => self.game.place_center(colour)?,
            PlaceKind::Regular => self.game.place_block(Move::new(colour, position))?,
        };

        Ok(self.placement_update(placement))
    }

    fn placement_update(&self, placement: Placement) -> RoomUpdate {
        let Placement {
            mv,
            central,
            supply,
            outcome,
            to_move,
        } = placement;
        let index = mv.position.index();
        let (red_count, blue_count) = (supply.red(), supply.blue());
        let delta = if central {
            ServerMsg::CentralBlockPlaced {
                index,
                player: mv.player,
                red_count,
                blue_count,
            }
        } else {
            ServerMsg::BlockPlaced {
                index,
                player: mv.player,
                red_count,
                blue_count,
            }
        };

        match outcome {
            Some(outcome) => {
                info!(room = %self.id, %outcome, "Match finished");
                RoomUpdate {
                    messages: vec![
                        delta,
                        ServerMsg::GameOver {
                            winner: Winner::from(outcome),
                        },
                    ],
                    finished: true,
                }
            }
            None => RoomUpdate {
                messages: vec![
                    delta,
                    ServerMsg::TurnChange {
                        current_player: to_move,
                    },
                ],
                finished: false,
            },
        }
    }

    /// Takes back the latest move. Only the colour to move may ask.
    #[instrument(skip(self), fields(room = %self.id))]
    pub fn undo(&mut self, from: ParticipantId) -> Result<RoomUpdate, SessionError> {
        if self.game.is_over() {
            return Err(MoveError::GameOver.into());
        }
        self.mover(from)?;
        let undone = self.game.undo()?;
        Ok(RoomUpdate {
            messages: vec![
                ServerMsg::MoveUndone {
                    index: undone.mv.position.index(),
                    red_count: undone.supply.red(),
                    blue_count: undone.supply.blue(),
                    current_player: undone.to_move,
                },
                ServerMsg::TurnChange {
                    current_player: undone.to_move,
                },
            ],
            finished: false,
        })
    }

    /// Relays a reaction from a seated participant.
    pub fn emoji(&self, from: ParticipantId, symbol: &str) -> Result<ServerMsg, SessionError> {
        if self.seats.colour_of(from).is_none() {
            return Err(SessionError::UnknownParticipant { id: from });
        }
        Ok(ServerMsg::ReceiveEmoji {
            symbol: symbol.to_string(),
        })
    }
}
