//! Server-authoritative command handling.
//!
//! The [`Coordinator`] is transport-agnostic: it takes one client command at
//! a time and returns the addressed messages to deliver. Each command is
//! processed to completion before the next.

use crate::config::ServerConfig;
use crate::error::SessionError;
use crate::lobby::Pairing;
use crate::protocol::{ClientMsg, ParticipantId, RoomId, ServerMsg};
use crate::registry::SessionRegistry;
use crate::room::{PlaceKind, Room, RoomUpdate, Seats};
use block_four_rules::Player;
use derive_new::new;
use tracing::{debug, info, instrument, warn};

/// A message addressed to one participant.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Envelope {
    /// Recipient.
    pub to: ParticipantId,
    /// Payload.
    pub msg: ServerMsg,
}

type Handled = Result<Vec<Envelope>, SessionError>;

/// Owns the registry and applies commands against it.
#[derive(Debug)]
pub struct Coordinator {
    registry: SessionRegistry,
    config: ServerConfig,
}

impl Coordinator {
    /// Creates a coordinator with an empty registry.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_registry(SessionRegistry::new(), config)
    }

    /// Creates a coordinator over an existing registry.
    pub fn with_registry(registry: SessionRegistry, config: ServerConfig) -> Self {
        Self { registry, config }
    }

    /// The registry.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Registers a new connection.
    pub fn connect(&mut self) -> ParticipantId {
        self.registry.connect()
    }

    /// Handles a dropped connection.
    ///
    /// A seated participant's room is destroyed and the opponent is told.
    /// Lobby members see the updated roster.
    #[instrument(skip(self))]
    pub fn disconnect(&mut self, id: ParticipantId) -> Vec<Envelope> {
        let was_member = self.registry.lobby().contains(id);
        let room = self
            .registry
            .participant(id)
            .and_then(|p| p.room().cloned());
        self.registry.disconnect(id);

        let mut out = Vec::new();
        if let Some(room) = room {
            out.extend(self.teardown(&room, id));
        }
        if was_member {
            out.extend(self.roster_broadcast());
        }
        out
    }

    /// Applies one command from `from`.
    ///
    /// Refused commands produce a single `error` for the sender, except for
    /// unknown rooms, which are dropped.
    #[instrument(skip(self, msg), fields(%from))]
    pub fn handle(&mut self, from: ParticipantId, msg: ClientMsg) -> Vec<Envelope> {
        debug!(?msg, "Handling command");
        let result = match msg {
            ClientMsg::Login { nickname } => self.login(from, &nickname),
            ClientMsg::EnterLobby => self.enter_lobby(from),
            ClientMsg::LeaveLobby => self.leave_lobby(from),
            ClientMsg::ChatMessage { text } => self.chat(from, &text),
            ClientMsg::SendMatchRequest { target_id } => self.request_match(from, target_id),
            ClientMsg::AcceptMatch { requester_id } => self.accept_match(from, requester_id),
            ClientMsg::DeclineMatch { requester_id } => self.decline_match(from, requester_id),
            ClientMsg::FindMatch => self.find_match(from),
            ClientMsg::PlaceCentralBlock {
                room_id,
                index,
                color,
            } => self.in_room(&room_id, |room| {
                room.place(from, PlaceKind::Central, index, color)
            }),
            ClientMsg::PlaceBlock {
                room_id,
                index,
                color,
            } => self.in_room(&room_id, |room| {
                room.place(from, PlaceKind::Regular, index, color)
            }),
            ClientMsg::UndoMove { room_id } => self.in_room(&room_id, |room| room.undo(from)),
            ClientMsg::SendEmoji { room_id, symbol } => self.emoji(from, &room_id, &symbol),
            ClientMsg::ExitGame { room_id } => self.exit(from, &room_id),
        };

        match result {
            Ok(out) => out,
            Err(e) if e.is_silent() => {
                debug!(error = %e, "Command ignored");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Command refused");
                vec![Envelope::new(
                    from,
                    ServerMsg::Error {
                        message: e.to_string(),
                    },
                )]
            }
        }
    }

    fn login(&mut self, from: ParticipantId, nickname: &str) -> Handled {
        let nickname = nickname.trim();
        let max = *self.config.max_nickname_len();
        let len = nickname.chars().count();
        if len == 0 || len > max {
            return Err(SessionError::InvalidNickname { max });
        }
        self.registry.set_nickname(from, nickname.to_string());
        info!(%from, nickname, "Logged in");
        if self.registry.lobby().contains(from) {
            Ok(self.roster_broadcast())
        } else {
            Ok(Vec::new())
        }
    }

    fn require_nickname(&self, id: ParticipantId) -> Result<(), SessionError> {
        match self.registry.participant(id).and_then(|p| p.nickname()) {
            Some(_) => Ok(()),
            None => Err(SessionError::NotLoggedIn),
        }
    }

    fn enter_lobby(&mut self, from: ParticipantId) -> Handled {
        self.require_nickname(from)?;
        if !self.registry.is_available(from) {
            return Err(SessionError::AlreadyPlaying);
        }
        self.registry.lobby_mut().enter(from);
        Ok(self.roster_broadcast())
    }

    fn leave_lobby(&mut self, from: ParticipantId) -> Handled {
        if !self.registry.lobby_mut().leave(from) {
            return Err(SessionError::NotInLobby);
        }
        Ok(self.roster_broadcast())
    }

    fn chat(&mut self, from: ParticipantId, text: &str) -> Handled {
        let policy = self.config.chat().clone();
        let Some(text) = self.registry.lobby_mut().chat(from, text, &policy)? else {
            return Ok(Vec::new());
        };
        let nickname = self.registry.display_name(from);
        let msg = ServerMsg::ChatMessage { nickname, text };
        Ok(self
            .registry
            .lobby()
            .members()
            .map(|to| Envelope::new(to, msg.clone()))
            .collect())
    }

    fn request_match(&mut self, from: ParticipantId, target: ParticipantId) -> Handled {
        self.registry.lobby_mut().invite(from, target)?;
        debug!(%from, %target, "Match requested");
        Ok(vec![Envelope::new(
            target,
            ServerMsg::MatchRequest {
                requester_id: from,
                requester_nickname: self.registry.display_name(from),
            },
        )])
    }

    fn accept_match(&mut self, from: ParticipantId, requester: ParticipantId) -> Handled {
        if !self.registry.lobby().contains(from) {
            return Err(SessionError::NotInLobby);
        }
        self.registry.lobby_mut().take_invite(from, requester)?;
        if !self.registry.lobby().contains(requester) || !self.registry.is_available(requester) {
            return Err(SessionError::UnknownParticipant { id: requester });
        }
        Ok(self.start_match(Seats {
            red: requester,
            blue: from,
        }))
    }

    fn decline_match(&mut self, from: ParticipantId, requester: ParticipantId) -> Handled {
        self.registry.lobby_mut().take_invite(from, requester)?;
        debug!(%from, %requester, "Match declined");
        Ok(vec![Envelope::new(
            requester,
            ServerMsg::MatchDeclined {
                target_nickname: self.registry.display_name(from),
            },
        )])
    }

    fn find_match(&mut self, from: ParticipantId) -> Handled {
        if !self.registry.is_available(from) {
            return Err(SessionError::AlreadyPlaying);
        }
        match self.registry.lobby_mut().enqueue(from) {
            Pairing::Queued | Pairing::AlreadyWaiting => {
                debug!(%from, "Waiting for an opponent");
                Ok(vec![Envelope::new(from, ServerMsg::Waiting)])
            }
            // The joiner completes the pair and plays red.
            Pairing::Paired { waiter } => Ok(self.start_match(Seats {
                red: from,
                blue: waiter,
            })),
        }
    }

    /// Opens a room, tells both seats, and refreshes the roster if needed.
    fn start_match(&mut self, seats: Seats) -> Vec<Envelope> {
        let roster_changed = seats
            .both()
            .iter()
            .any(|id| self.registry.lobby().contains(*id));
        let room_id = self.registry.open_room(seats);
        info!(room = %room_id, "Match started");

        let mut out: Vec<Envelope> = [
            (seats.red, Player::Red, seats.blue),
            (seats.blue, Player::Blue, seats.red),
        ]
        .into_iter()
        .map(|(to, color, opponent)| {
            Envelope::new(
                to,
                ServerMsg::MatchAccepted {
                    room_id: room_id.clone(),
                    color,
                    opponent_nickname: self.registry.display_name(opponent),
                },
            )
        })
        .collect();

        if roster_changed {
            out.extend(self.roster_broadcast());
        }
        out
    }

    /// Runs a room command and fans the result out to both seats.
    fn in_room<F>(&mut self, room_id: &RoomId, apply: F) -> Handled
    where
        F: FnOnce(&mut Room) -> Result<RoomUpdate, SessionError>,
    {
        let room = self
            .registry
            .room_mut(room_id)
            .ok_or_else(|| SessionError::RoomNotFound {
                room: room_id.clone(),
            })?;
        let RoomUpdate { messages, finished } = apply(room)?;
        let seats = room.seats().both();

        let out = messages
            .iter()
            .flat_map(|msg| seats.iter().map(move |to| Envelope::new(*to, msg.clone())))
            .collect();

        if finished {
            self.registry.close_room(room_id);
        }
        Ok(out)
    }

    fn emoji(&mut self, from: ParticipantId, room_id: &RoomId, symbol: &str) -> Handled {
        let room = self
            .registry
            .room(room_id)
            .ok_or_else(|| SessionError::RoomNotFound {
                room: room_id.clone(),
            })?;
        let msg = room.emoji(from, symbol)?;
        if !self.config.allows_emoji(symbol) {
            return Err(SessionError::UnknownEmoji {
                symbol: symbol.to_string(),
            });
        }
        Ok(room
            .seats()
            .both()
            .into_iter()
            .map(|to| Envelope::new(to, msg.clone()))
            .collect())
    }

    fn exit(&mut self, from: ParticipantId, room_id: &RoomId) -> Handled {
        let room = self
            .registry
            .room(room_id)
            .ok_or_else(|| SessionError::RoomNotFound {
                room: room_id.clone(),
            })?;
        if room.seats().colour_of(from).is_none() {
            return Err(SessionError::UnknownParticipant { id: from });
        }
        Ok(self.teardown(room_id, from))
    }

    /// Closes `room_id` on behalf of `leaver` and notifies the other seat.
    fn teardown(&mut self, room_id: &RoomId, leaver: ParticipantId) -> Vec<Envelope> {
        let Some(room) = self.registry.close_room(room_id) else {
            return Vec::new();
        };
        info!(room = %room_id, %leaver, "Room torn down");
        room.opponent_of(leaver)
            .map(|to| Envelope::new(to, ServerMsg::OpponentDisconnected))
            .into_iter()
            .collect()
    }

    fn roster_broadcast(&self) -> Vec<Envelope> {
        let roster = self.registry.roster();
        self.registry
            .lobby()
            .members()
            .map(|to| Envelope::new(to, ServerMsg::UpdateOnlineUsers(roster.clone())))
            .collect()
    }
}
