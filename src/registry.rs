//! In-memory registry of participants, rooms and the lobby.

use crate::lobby::Lobby;
use crate::protocol::{LobbyUser, ParticipantId, RoomId};
use crate::room::{Room, Seats};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// A connected client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    id: ParticipantId,
    nickname: Option<String>,
    room: Option<RoomId>,
}

impl Participant {
    /// Connection id.
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// Nickname set by `login`, if any.
    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    /// Room the participant is seated in.
    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    /// Nickname, or a guest label for anonymous players.
    pub fn display_name(&self) -> String {
        match &self.nickname {
            Some(nickname) => nickname.clone(),
            None => format!("Guest {}", self.id),
        }
    }
}

/// Owns every participant, room and the lobby.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_id: u64,
    rooms_opened: u64,
    participants: HashMap<ParticipantId, Participant>,
    rooms: HashMap<RoomId, Room>,
    lobby: Lobby,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection.
    #[instrument(skip(self))]
    pub fn connect(&mut self) -> ParticipantId {
        self.next_id += 1;
        let id = ParticipantId::new(self.next_id);
        self.participants.insert(
            id,
            Participant {
                id,
                nickname: None,
                room: None,
            },
        );
        info!(%id, "Participant connected");
        id
    }

    /// Removes a connection and its lobby traces. Rooms are left to the caller.
    #[instrument(skip(self))]
    pub fn disconnect(&mut self, id: ParticipantId) -> Option<Participant> {
        self.lobby.forget(id);
        let removed = self.participants.remove(&id);
        if removed.is_some() {
            info!(%id, "Participant disconnected");
        }
        removed
    }

    /// Looks up a participant.
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    /// Sets the nickname of `id`. Returns false for an unknown id.
    pub fn set_nickname(&mut self, id: ParticipantId, nickname: String) -> bool {
        match self.participants.get_mut(&id) {
            Some(participant) => {
                debug!(%id, %nickname, "Nickname set");
                participant.nickname = Some(nickname);
                true
            }
            None => false,
        }
    }

    /// Display name of `id`, or an empty string if unknown.
    pub fn display_name(&self, id: ParticipantId) -> String {
        self.participant(id)
            .map(Participant::display_name)
            .unwrap_or_default()
    }

    /// True if `id` is connected and not seated in a room.
    pub fn is_available(&self, id: ParticipantId) -> bool {
        self.participant(id).is_some_and(|p| p.room.is_none())
    }

    /// The lobby.
    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    /// The lobby, mutably.
    pub fn lobby_mut(&mut self) -> &mut Lobby {
        &mut self.lobby
    }

    /// Roster entries for every lobby member.
    pub fn roster(&self) -> Vec<LobbyUser> {
        self.lobby
            .members()
            .map(|id| LobbyUser {
                id,
                nickname: self.display_name(id),
            })
            .collect()
    }

    /// Seats both participants in a new room and takes them off the lobby.
    #[instrument(skip(self), fields(red = %seats.red, blue = %seats.blue))]
    pub fn open_room(&mut self, seats: Seats) -> RoomId {
        self.rooms_opened += 1;
        let id = RoomId::for_pair(seats.red, seats.blue, self.rooms_opened);
        for member in seats.both() {
            self.lobby.seat(member);
            if let Some(participant) = self.participants.get_mut(&member) {
                participant.room = Some(id.clone());
            }
        }
        self.rooms.insert(id.clone(), Room::new(id.clone(), seats));
        id
    }

    /// Looks up a room.
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// Looks up a room mutably.
    pub fn room_mut(&mut self, id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id)
    }

    /// Destroys a room and unseats its participants.
    #[instrument(skip(self))]
    pub fn close_room(&mut self, id: &RoomId) -> Option<Room> {
        let room = self.rooms.remove(id)?;
        for member in room.seats().both() {
            if let Some(participant) = self.participants.get_mut(&member)
                && participant.room.as_ref() == Some(id)
            {
                participant.room = None;
            }
        }
        info!(room = %id, "Room closed");
        Some(room)
    }

    /// Number of open rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
