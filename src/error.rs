//! Errors reported to the participant whose command was refused.

use crate::protocol::{ParticipantId, RoomId};
use block_four_rules::MoveError;
use derive_more::{Display, Error};

/// A refused client command.
///
/// Only the sender hears about it; no state changes.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// Wrong phase, occupied cell, frontier violation or bad index.
    #[display("{reason}")]
    InvalidPlacement {
        /// Rule that refused the move.
        reason: MoveError,
    },
    /// The sender does not hold the colour to move.
    #[display("not your turn")]
    NotYourTurn,
    /// Only the center block is left in the history.
    #[display("the center block cannot be undone")]
    CenterImmutable,
    /// The history is empty.
    #[display("nothing to undo")]
    NothingToUndo,
    /// The room is gone; ignored without a reply.
    #[display("room {room} not found")]
    RoomNotFound {
        /// Requested room.
        room: RoomId,
    },
    /// Lobby features need a nickname first.
    #[display("log in first")]
    NotLoggedIn,
    /// Empty or overlong nickname.
    #[display("nickname must be 1 to {max} characters")]
    InvalidNickname {
        /// Longest accepted length.
        max: usize,
    },
    /// The sender is not in the lobby.
    #[display("enter the lobby first")]
    NotInLobby,
    /// Target is not connected, not in the lobby or already playing.
    #[display("player {id} is not available")]
    UnknownParticipant {
        /// Requested participant.
        id: ParticipantId,
    },
    /// A match request addressed to the sender.
    #[display("you cannot challenge yourself")]
    SelfMatch,
    /// Accept or decline with no matching invite.
    #[display("no pending request from player {id}")]
    NoPendingRequest {
        /// Claimed requester.
        id: ParticipantId,
    },
    /// The sender already sent this chat line.
    #[display("you cannot send the same message twice")]
    DuplicateChat,
    /// Chat line over the configured limit.
    #[display("message longer than {max} characters")]
    MessageTooLong {
        /// Longest accepted length.
        max: usize,
    },
    /// Emoji not on the allow-list.
    #[display("emoji {symbol} is not allowed")]
    UnknownEmoji {
        /// Refused symbol.
        symbol: String,
    },
    /// Matchmaking while already seated in a room.
    #[display("already in a match")]
    AlreadyPlaying,
}

impl SessionError {
    /// True for errors dropped without telling the sender.
    pub fn is_silent(&self) -> bool {
        matches!(self, SessionError::RoomNotFound { .. })
    }
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::NothingToUndo => SessionError::NothingToUndo,
            MoveError::CenterImmutable => SessionError::CenterImmutable,
            MoveError::WrongPlayer(_) => SessionError::NotYourTurn,
            reason => SessionError::InvalidPlacement { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use block_four_rules::Position;

    #[test]
    fn test_move_errors_map_to_taxonomy() {
        assert_eq!(
            SessionError::from(MoveError::CenterImmutable),
            SessionError::CenterImmutable
        );
        assert_eq!(
            SessionError::from(MoveError::NothingToUndo),
            SessionError::NothingToUndo
        );
        let err = SessionError::from(MoveError::Occupied(Position::CENTER));
        assert!(matches!(err, SessionError::InvalidPlacement { .. }));
        assert_eq!(err.to_string(), MoveError::Occupied(Position::CENTER).to_string());
    }

    #[test]
    fn test_only_missing_room_is_silent() {
        assert!(SessionError::RoomNotFound { room: "room_1_2".into() }.is_silent());
        assert!(!SessionError::NotYourTurn.is_silent());
    }
}
