//! Domain events emitted by the session and commands it accepts.

use serde::Serialize;

/// Normalized notification derived from transport activity.
///
/// Serialized form is used by the JSON log output: `{"event":"peer_joined","name":"..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Handshake completed; the server assigned `name` to this client.
    Connected { name: String },
    /// The server ended the session identified by `name`.
    Disconnected { name: String },
    /// The underlying connection is gone, whichever side closed it.
    TransportClosed,
    /// A peer joined the chat.
    PeerJoined { name: String },
    /// A chat line was broadcast by the server.
    MessageReceived { name: String, text: String },
}

impl DomainEvent {
    /// True for events after which the connection status may have changed.
    #[must_use]
    pub fn changes_status(&self) -> bool {
        matches!(
            self,
            Self::Connected { .. } | Self::Disconnected { .. } | Self::TransportClosed
        )
    }
}

/// User-facing command issued to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Connect,
    Disconnect,
    SendText(String),
}
