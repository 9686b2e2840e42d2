//! WebSocket transport for the [`Coordinator`].
//!
//! Every connection gets a bounded outbox drained by its own writer task.
//! Commands are applied under a single lock, and their envelopes are queued
//! on the recipients' outboxes before the lock is released. A connection
//! whose outbox fills up is dropped.

use crate::config::ServerConfig;
use crate::coordinator::{Coordinator, Envelope};
use crate::protocol::{ClientMsg, ParticipantId, ServerMsg};
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, instrument, warn};

/// Messages queued for one connection before it counts as stalled.
pub const OUTBOX_CAPACITY: usize = 256;

/// Sender half of a connection's outbox.
pub type Outbox = mpsc::Sender<ServerMsg>;

/// Coordinator plus the outbox of every live connection.
#[derive(Debug)]
struct Hub {
    coordinator: Coordinator,
    outboxes: HashMap<ParticipantId, Outbox>,
}

impl Hub {
    fn deliver(&mut self, envelopes: Vec<Envelope>) {
        let mut stalled = Vec::new();
        for Envelope { to, msg } in envelopes {
            let Some(outbox) = self.outboxes.get(&to) else {
                debug!(%to, "No outbox for recipient");
                continue;
            };
            match outbox.try_send(msg) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => stalled.push(to),
                // A closed outbox means the connection is going away.
                Err(TrySendError::Closed(_)) => debug!(%to, "Outbox closed"),
            }
        }
        // Dropping the sender ends the writer task, which closes the socket.
        for id in stalled {
            if self.outboxes.remove(&id).is_some() {
                warn!(%id, "Outbox full, dropping connection");
            }
        }
    }
}

/// Shared server state handed to every connection.
#[derive(Debug, Clone)]
pub struct GameServer {
    hub: Arc<Mutex<Hub>>,
}

impl GameServer {
    /// Creates a server with an empty registry.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            hub: Arc::new(Mutex::new(Hub {
                coordinator: Coordinator::new(config),
                outboxes: HashMap::new(),
            })),
        }
    }

    /// HTTP routes: `/ws` for play, `/healthz` for health checks.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(ws_handler))
            .route("/healthz", get(healthz))
            .with_state(self.clone())
    }

    /// Serves on an already-bound listener until the process stops.
    #[instrument(skip_all)]
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "Block Four server listening");
        }
        axum::serve(listener, self.router()).await
    }

    /// Registers a connection and its outbox.
    pub async fn connect(&self, outbox: Outbox) -> ParticipantId {
        let mut hub = self.hub.lock().await;
        let id = hub.coordinator.connect();
        hub.outboxes.insert(id, outbox);
        id
    }

    /// Applies a command and queues the resulting messages.
    pub async fn dispatch(&self, from: ParticipantId, msg: ClientMsg) {
        let mut hub = self.hub.lock().await;
        let envelopes = hub.coordinator.handle(from, msg);
        hub.deliver(envelopes);
    }

    /// Drops a connection and notifies whoever is affected.
    pub async fn disconnect(&self, id: ParticipantId) {
        let mut hub = self.hub.lock().await;
        hub.outboxes.remove(&id);
        let envelopes = hub.coordinator.disconnect(id);
        hub.deliver(envelopes);
    }

    async fn reply(&self, to: ParticipantId, msg: ServerMsg) {
        let mut hub = self.hub.lock().await;
        hub.deliver(vec![Envelope::new(to, msg)]);
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn ws_handler(ws: WebSocketUpgrade, State(server): State<GameServer>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(server, socket))
}

#[instrument(skip_all)]
async fn handle_socket(server: GameServer, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMsg>(OUTBOX_CAPACITY);
    let id = server.connect(tx).await;

    let mut writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to encode message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        let frame = tokio::select! {
            frame = ws_rx.next() => frame,
            _ = &mut writer => {
                debug!(%id, "Writer finished");
                break;
            }
        };
        let Some(Ok(frame)) = frame else {
            break;
        };
        match frame {
            Message::Text(text) => match serde_json::from_str::<ClientMsg>(text.as_str()) {
                Ok(msg) => server.dispatch(id, msg).await,
                Err(e) => {
                    warn!(%id, error = %e, "Malformed frame");
                    server
                        .reply(
                            id,
                            ServerMsg::Error {
                                message: format!("Bad message: {}", e),
                            },
                        )
                        .await;
                }
            },
            Message::Close(_) => break,
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    server.disconnect(id).await;
    writer.abort();
}
