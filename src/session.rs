//! Session manager: the connection state machine.
//!
//! DESIGN
//! ======
//! A `Session` owns at most one live connection and the identity the server
//! assigned over it. Every mutation happens synchronously inside one call:
//! a user command (`connect` / `disconnect` / `send_text`) or one
//! [`TransportEvent`]. Nothing here awaits.
//!
//! ```text
//!                connect()              `connect` frame
//! Disconnected ───────────▶ Connecting ─────────────────▶ Connected
//!      ▲                        │                            │
//!      └──── disconnect() / transport closed / `disconnect` frame
//! ```
//!
//! Transport events are matched against the live [`ConnectionId`]; anything
//! tagged with an older id (a superseded or locally closed connection) is
//! dropped before it can touch state.
//!
//! Domain events leave through one unbounded channel, in the order they were
//! produced.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;

use frames::Frame;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::event::{Command, DomainEvent};
use crate::transport::{ConnectionId, Transport, TransportError, TransportEvent, TransportEventKind};

/// Identity placeholder while no server-assigned name is known.
pub const UNKNOWN_IDENTITY: &str = frames::RESERVED_NAME;

/// Connection lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No connection exists.
    #[default]
    Disconnected,
    /// A connection exists but the server has not sent its `connect` frame yet.
    Connecting,
    /// The server assigned an identity over the live connection.
    Connected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        })
    }
}

/// Error surfaced to callers of [`Session::send_text`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("cannot send while {0}")]
    NotConnected(ConnectionStatus),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub struct Session<T: Transport> {
    transport: T,
    endpoint: String,
    status: ConnectionStatus,
    connection: Option<ConnectionId>,
    identity: String,
    events: mpsc::UnboundedSender<DomainEvent>,
}

impl<T: Transport> Session<T> {
    /// Create a disconnected session and the receiver its domain events flow to.
    pub fn new(transport: T, endpoint: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<DomainEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = Self {
            transport,
            endpoint: endpoint.into(),
            status: ConnectionStatus::Disconnected,
            connection: None,
            identity: UNKNOWN_IDENTITY.to_owned(),
            events,
        };
        (session, rx)
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    #[must_use]
    pub fn current_identity(&self) -> &str {
        &self.identity
    }

    /// Id of the live connection, if any.
    #[must_use]
    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.connection
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Borrow the transport. Used by tests to inspect recorded calls.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Open a fresh connection, tearing down any existing one first.
    ///
    /// The teardown goes through [`Session::disconnect`], so a reconnect
    /// emits [`DomainEvent::TransportClosed`] for the old connection before
    /// the new one starts.
    pub fn connect(&mut self) -> ConnectionId {
        self.disconnect();

        let conn = ConnectionId::new();
        self.connection = Some(conn);
        self.status = ConnectionStatus::Connecting;
        info!(%conn, endpoint = %self.endpoint, "session: connecting");
        self.transport.open(conn, &self.endpoint);
        conn
    }

    /// Close the live connection. No-op when already disconnected.
    pub fn disconnect(&mut self) {
        let Some(conn) = self.connection else {
            debug!("session: disconnect while disconnected");
            return;
        };
        info!(%conn, "session: disconnecting");
        self.transport.close(conn);
        self.on_transport_closed(conn);
    }

    /// Forward `text` verbatim to the server.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] unless the handshake completed,
    /// or [`SessionError::Transport`] if the connection task already ended.
    pub fn send_text(&mut self, text: &str) -> Result<(), SessionError> {
        let (ConnectionStatus::Connected, Some(conn)) = (self.status, self.connection) else {
            return Err(SessionError::NotConnected(self.status));
        };
        self.transport.send(conn, text)?;
        Ok(())
    }

    /// Dispatch a [`Command`] to the matching operation.
    ///
    /// # Errors
    ///
    /// Only `SendText` can fail; see [`Session::send_text`].
    pub fn execute(&mut self, command: Command) -> Result<(), SessionError> {
        match command {
            Command::Connect => {
                self.connect();
                Ok(())
            }
            Command::Disconnect => {
                self.disconnect();
                Ok(())
            }
            Command::SendText(text) => self.send_text(&text),
        }
    }

    /// Feed one transport event into the state machine.
    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        let TransportEvent { conn, kind } = event;
        if self.connection != Some(conn) {
            debug!(%conn, ?kind, "session: dropped event from stale connection");
            return;
        }

        match kind {
            TransportEventKind::Open => {
                debug!(%conn, "session: transport open, awaiting handshake");
            }
            TransportEventKind::Text(text) => self.on_frame(conn, &text),
            TransportEventKind::Closed => {
                // Release the transport's handle on the finished connection.
                self.transport.close(conn);
                self.on_transport_closed(conn);
            }
        }
    }

    fn on_frame(&mut self, conn: ConnectionId, text: &str) {
        let frame = match frames::decode_frame(text) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(%conn, %error, "session: dropped malformed frame");
                return;
            }
        };

        match frame {
            Frame::Connect { name } if name == UNKNOWN_IDENTITY => {
                warn!(%conn, "session: dropped connect frame with reserved name");
            }
            Frame::Connect { name } => {
                info!(%conn, %name, "session: connected");
                self.identity.clone_from(&name);
                self.status = ConnectionStatus::Connected;
                self.emit(DomainEvent::Connected { name });
            }
            Frame::Disconnect { name } => {
                info!(%conn, %name, "session: server ended session");
                // The frame alone closes the connection; a transport close
                // that follows carries a stale id by then.
                self.transport.close(conn);
                self.reset();
                self.emit(DomainEvent::Disconnected { name });
            }
            Frame::Join { name } => self.emit(DomainEvent::PeerJoined { name }),
            Frame::Sent { name, text } => self.emit(DomainEvent::MessageReceived { name, text }),
            Frame::Unknown { action } => {
                debug!(%conn, %action, "session: ignored unknown action");
            }
        }
    }

    fn on_transport_closed(&mut self, conn: ConnectionId) {
        info!(%conn, "session: transport closed");
        self.reset();
        self.emit(DomainEvent::TransportClosed);
    }

    fn reset(&mut self) {
        self.connection = None;
        self.status = ConnectionStatus::Disconnected;
        UNKNOWN_IDENTITY.clone_into(&mut self.identity);
    }

    fn emit(&self, event: DomainEvent) {
        if self.events.send(event).is_err() {
            debug!("session: no domain event subscriber");
        }
    }
}
