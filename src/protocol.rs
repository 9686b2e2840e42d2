//! Wire messages exchanged over the WebSocket.
//!
//! Every frame is a JSON object `{"type": "<camelCaseName>", "data": {...}}`.
//! Messages without a payload omit `data`.

use block_four_rules::{Outcome, Player};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Connection handle assigned by the server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ParticipantId(u64);

impl ParticipantId {
    /// Wraps a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Identifier of a match room, `room_<red>_<blue>_<serial>`.
///
/// The serial keeps ids unique when the same pair meets again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct RoomId(String);

impl RoomId {
    /// Room id for a pairing, named after its two seats and a serial.
    pub fn for_pair(red: ParticipantId, blue: ParticipantId, serial: u64) -> Self {
        Self(format!("room_{}_{}_{}", red, blue, serial))
    }

    /// The id as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// A lobby roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyUser {
    /// Connection id, used to address match requests.
    pub id: ParticipantId,
    /// Display name.
    pub nickname: String,
}

/// Final result carried by `gameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// Red made four in a row.
    #[display("red")]
    Red,
    /// Blue made four in a row.
    #[display("blue")]
    Blue,
    /// Both supplies ran out.
    #[display("draw")]
    Draw,
}

impl From<Outcome> for Winner {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Winner(Player::Red) => Winner::Red,
            Outcome::Winner(Player::Blue) => Winner::Blue,
            Outcome::Draw => Winner::Draw,
        }
    }
}

/// Client to server commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientMsg {
    /// Choose a display name.
    Login {
        /// Requested nickname; trimmed server-side.
        nickname: String,
    },
    /// Join the visible lobby roster.
    EnterLobby,
    /// Leave the lobby roster.
    LeaveLobby,
    /// Broadcast a chat line to the lobby.
    ChatMessage {
        /// Message text.
        text: String,
    },
    /// Invite a lobby member to a match.
    SendMatchRequest {
        /// Who to invite.
        target_id: ParticipantId,
    },
    /// Accept a pending invite.
    AcceptMatch {
        /// Who sent the invite.
        requester_id: ParticipantId,
    },
    /// Decline a pending invite.
    DeclineMatch {
        /// Who sent the invite.
        requester_id: ParticipantId,
    },
    /// Join the anonymous FIFO queue.
    FindMatch,
    /// Place the opening center block.
    PlaceCentralBlock {
        /// Target room.
        room_id: RoomId,
        /// Cell index, 0-48.
        index: usize,
        /// Colour the sender believes it holds.
        color: Player,
    },
    /// Place a regular piece.
    PlaceBlock {
        /// Target room.
        room_id: RoomId,
        /// Cell index, 0-48.
        index: usize,
        /// Colour the sender believes it holds.
        color: Player,
    },
    /// Take back the latest move.
    UndoMove {
        /// Target room.
        room_id: RoomId,
    },
    /// Send a reaction to the room.
    SendEmoji {
        /// Target room.
        room_id: RoomId,
        /// The emoji.
        symbol: String,
    },
    /// Leave the match.
    ExitGame {
        /// Target room.
        room_id: RoomId,
    },
}

/// Server to client events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerMsg {
    /// Current lobby roster.
    UpdateOnlineUsers(Vec<LobbyUser>),
    /// A lobby chat line.
    ChatMessage {
        /// Sender's nickname.
        nickname: String,
        /// Trimmed message text.
        text: String,
    },
    /// Someone invited you.
    MatchRequest {
        /// Inviter id, echoed back in accept/decline.
        requester_id: ParticipantId,
        /// Inviter nickname.
        requester_nickname: String,
    },
    /// A match started.
    MatchAccepted {
        /// Room to address game commands to.
        room_id: RoomId,
        /// Your colour.
        color: Player,
        /// Opponent display name.
        opponent_nickname: String,
    },
    /// Your invite was declined.
    MatchDeclined {
        /// Who declined.
        target_nickname: String,
    },
    /// Queued for FIFO pairing.
    Waiting,
    /// The center block is down.
    CentralBlockPlaced {
        /// Always 24.
        index: usize,
        /// Who placed it.
        player: Player,
        /// Red pieces left.
        red_count: u8,
        /// Blue pieces left.
        blue_count: u8,
    },
    /// A regular piece was placed.
    BlockPlaced {
        /// Cell index.
        index: usize,
        /// Who placed it.
        player: Player,
        /// Red pieces left.
        red_count: u8,
        /// Blue pieces left.
        blue_count: u8,
    },
    /// The turn passed.
    TurnChange {
        /// Colour to move.
        current_player: Player,
    },
    /// The latest move was taken back.
    MoveUndone {
        /// Cleared cell.
        index: usize,
        /// Red pieces left.
        red_count: u8,
        /// Blue pieces left.
        blue_count: u8,
        /// Colour to move.
        current_player: Player,
    },
    /// The match ended.
    GameOver {
        /// Winning colour or draw.
        winner: Winner,
    },
    /// A reaction from the room.
    ReceiveEmoji {
        /// The emoji.
        symbol: String,
    },
    /// The other participant left; the room is gone.
    OpponentDisconnected,
    /// A command was refused.
    Error {
        /// Human-readable reason.
        message: String,
    },
}
