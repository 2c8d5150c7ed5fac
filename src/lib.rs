//! `wschat`: a minimal real-time chat client.
//!
//! ARCHITECTURE
//! ============
//! - [`session`]: the connection state machine. Owns the single connection and
//!   the server-assigned identity, turns inbound frames into [`DomainEvent`]s.
//! - [`transport`]: the socket seam and its `tokio-tungstenite` implementation.
//! - [`endpoint`]: websocket URL derivation from the hosting page location.
//! - [`ui`] and [`app`]: the terminal binding and the event loop driving it.
//!
//! Wire frames are defined in the shared `frames` crate.

pub mod app;
pub mod config;
pub mod endpoint;
pub mod event;
pub mod session;
pub mod transport;
pub mod ui;

pub use event::{Command, DomainEvent};
pub use session::{ConnectionStatus, Session, SessionError, UNKNOWN_IDENTITY};
pub use transport::{ConnectionId, Transport, TransportEvent, TransportEventKind, WsTransport};
