//! Block Four relay server and clients.
//!
//! Block Four is a two-player four-in-a-row game on a 7x7 board. The rules
//! live in [`block_four_rules`]; this crate adds the online layer on top.
//!
//! # Architecture
//!
//! - **Coordinator**: server-authoritative state machine for lobby, rooms and turns
//! - **Server**: axum WebSocket transport in front of the coordinator
//! - **Mirror**: non-authoritative client view built from server deltas
//! - **Offline**: terminal game for two players on one keyboard
//!
//! # Example
//!
//! ```
//! use block_four::{ClientMsg, Coordinator, ServerConfig, ServerMsg};
//!
//! let mut coordinator = Coordinator::new(ServerConfig::default());
//! let waiter = coordinator.connect();
//! let joiner = coordinator.connect();
//!
//! coordinator.handle(waiter, ClientMsg::FindMatch);
//! let out = coordinator.handle(joiner, ClientMsg::FindMatch);
//! assert!(out.iter().all(|e| matches!(e.msg, ServerMsg::MatchAccepted { .. })));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod coordinator;
mod error;
mod lobby;
mod mirror;
mod protocol;
mod registry;
mod room;
mod server;
mod tui;

// Crate-level exports - Configuration
pub use config::{ChatPolicy, ConfigError, MAX_FREE_EMOJI_LEN, ServerConfig};

// Crate-level exports - Session state
pub use coordinator::{Coordinator, Envelope};
pub use error::SessionError;
pub use lobby::{CHAT_MEMORY, Lobby, Pairing};
pub use registry::{Participant, SessionRegistry};
pub use room::{PlaceKind, Room, RoomUpdate, Seats};

// Crate-level exports - Wire protocol
pub use protocol::{ClientMsg, LobbyUser, ParticipantId, RoomId, ServerMsg, Winner};

// Crate-level exports - Transport and clients
pub use mirror::BoardMirror;
pub use server::{GameServer, OUTBOX_CAPACITY, Outbox};
pub use tui::{App, run_offline};
