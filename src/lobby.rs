//! Lobby bookkeeping: roster, FIFO queue, directed invites and chat.
//!
//! The lobby only tracks participant ids. Nicknames and rooms live in the
//! [`SessionRegistry`](crate::SessionRegistry).

use crate::config::ChatPolicy;
use crate::error::SessionError;
use crate::protocol::ParticipantId;
use std::collections::{BTreeSet, HashMap, VecDeque};
use tracing::{debug, instrument};

/// Result of joining the FIFO queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Nobody was waiting; the caller is now queued.
    Queued,
    /// The caller was already queued and keeps its place.
    AlreadyWaiting,
    /// The caller was matched with the longest waiter.
    Paired {
        /// The participant taken off the queue.
        waiter: ParticipantId,
    },
}

/// Chat lines remembered per sender for duplicate rejection.
pub const CHAT_MEMORY: usize = 64;

/// Lobby state.
#[derive(Debug, Default)]
pub struct Lobby {
    members: BTreeSet<ParticipantId>,
    waiting: VecDeque<ParticipantId>,
    // target -> requesters
    invites: HashMap<ParticipantId, BTreeSet<ParticipantId>>,
    // newest last, at most CHAT_MEMORY per sender
    sent_chat: HashMap<ParticipantId, VecDeque<String>>,
}

impl Lobby {
    /// Creates an empty lobby.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` to the roster. Returns false if already present.
    #[instrument(skip(self))]
    pub fn enter(&mut self, id: ParticipantId) -> bool {
        self.members.insert(id)
    }

    /// Removes `id` from the roster and drops invites to or from it.
    #[instrument(skip(self))]
    pub fn leave(&mut self, id: ParticipantId) -> bool {
        self.drop_invites(id);
        self.members.remove(&id)
    }

    /// True if `id` is on the roster.
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.members.contains(&id)
    }

    /// Roster ids, lowest first.
    pub fn members(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.members.iter().copied()
    }

    /// Joins the FIFO queue or pairs with the longest waiter.
    #[instrument(skip(self))]
    pub fn enqueue(&mut self, id: ParticipantId) -> Pairing {
        if self.waiting.contains(&id) {
            return Pairing::AlreadyWaiting;
        }
        match self.waiting.pop_front() {
            Some(waiter) => {
                debug!(%waiter, "Paired from queue");
                Pairing::Paired { waiter }
            }
            None => {
                self.waiting.push_back(id);
                Pairing::Queued
            }
        }
    }

    /// True if `id` is queued.
    pub fn is_waiting(&self, id: ParticipantId) -> bool {
        self.waiting.contains(&id)
    }

    /// Records an invite from `from` to `to`. Both must be on the roster.
    #[instrument(skip(self))]
    pub fn invite(&mut self, from: ParticipantId, to: ParticipantId) -> Result<(), SessionError> {
        if !self.contains(from) {
            return Err(SessionError::NotInLobby);
        }
        if from == to {
            return Err(SessionError::SelfMatch);
        }
        if !self.contains(to) {
            return Err(SessionError::UnknownParticipant { id: to });
        }
        self.invites.entry(to).or_default().insert(from);
        Ok(())
    }

    /// Consumes the invite `requester` sent to `target`.
    #[instrument(skip(self))]
    pub fn take_invite(
        &mut self,
        target: ParticipantId,
        requester: ParticipantId,
    ) -> Result<(), SessionError> {
        let removed = self
            .invites
            .get_mut(&target)
            .is_some_and(|requesters| requesters.remove(&requester));
        if removed {
            Ok(())
        } else {
            Err(SessionError::NoPendingRequest { id: requester })
        }
    }

    /// Validates a chat line from `sender` under `policy`.
    ///
    /// Returns the trimmed text, or `None` for a blank line.
    #[instrument(skip(self, text, policy))]
    pub fn chat(
        &mut self,
        sender: ParticipantId,
        text: &str,
        policy: &ChatPolicy,
    ) -> Result<Option<String>, SessionError> {
        if !self.contains(sender) {
            return Err(SessionError::NotInLobby);
        }
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let max = *policy.max_len();
        if text.chars().count() > max {
            return Err(SessionError::MessageTooLong { max });
        }
        if *policy.reject_duplicates() {
            let sent = self.sent_chat.entry(sender).or_default();
            if sent.iter().any(|line| line == text) {
                return Err(SessionError::DuplicateChat);
            }
            if sent.len() == CHAT_MEMORY {
                sent.pop_front();
            }
            sent.push_back(text.to_string());
        }
        Ok(Some(text.to_string()))
    }

    /// Removes every trace of `id`. Returns true if it was on the roster.
    #[instrument(skip(self))]
    pub fn forget(&mut self, id: ParticipantId) -> bool {
        self.waiting.retain(|w| *w != id);
        self.sent_chat.remove(&id);
        self.leave(id)
    }

    /// Takes `id` off the roster and queue when a match starts.
    pub fn seat(&mut self, id: ParticipantId) -> bool {
        self.waiting.retain(|w| *w != id);
        self.leave(id)
    }

    fn drop_invites(&mut self, id: ParticipantId) {
        self.invites.remove(&id);
        for requesters in self.invites.values_mut() {
            requesters.remove(&id);
        }
        self.invites.retain(|_, requesters| !requesters.is_empty());
    }
}
