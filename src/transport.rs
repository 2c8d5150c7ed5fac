//! Transport seam between the session and the websocket.
//!
//! DESIGN
//! ======
//! The session never touches sockets. It drives a [`Transport`] with
//! `open` / `send` / `close` calls keyed by a [`ConnectionId`], and receives
//! [`TransportEvent`]s tagged with the same id. Tagging lets the session
//! discard events from a connection it has already abandoned.
//!
//! [`WsTransport`] is the production implementation: every `open` spawns one
//! tokio task that owns the `tokio-tungstenite` stream and forwards what it
//! reads into a single unbounded channel, preserving per-connection order.
//! Dropping the task's outbound sender is the close signal.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::collections::HashMap;
use std::fmt;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identity of one connection instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What happened on a connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEventKind {
    /// The websocket handshake finished.
    Open,
    /// One inbound text message.
    Text(String),
    /// The connection is gone: closed by either side, dropped, or never opened.
    Closed,
}

/// A [`TransportEventKind`] tagged with the connection it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportEvent {
    pub conn: ConnectionId,
    pub kind: TransportEventKind,
}

impl TransportEvent {
    #[must_use]
    pub fn new(conn: ConnectionId, kind: TransportEventKind) -> Self {
        Self { conn, kind }
    }
}

/// Error returned by [`Transport::send`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection {0} is not open")]
    NotOpen(ConnectionId),
}

/// Socket operations the session relies on. None of them block.
pub trait Transport {
    /// Start connecting `conn` to `url`. Progress arrives as events.
    fn open(&mut self, conn: ConnectionId, url: &str);

    /// Queue one outbound text message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::NotOpen`] if `conn` is unknown or its task ended.
    fn send(&mut self, conn: ConnectionId, text: &str) -> Result<(), TransportError>;

    /// Tear `conn` down. Closing an unknown connection does nothing.
    fn close(&mut self, conn: ConnectionId);
}

/// `tokio-tungstenite` transport. Must be used inside a tokio runtime.
pub struct WsTransport {
    events: mpsc::UnboundedSender<TransportEvent>,
    links: HashMap<ConnectionId, mpsc::UnboundedSender<String>>,
}

impl WsTransport {
    #[must_use]
    pub fn new(events: mpsc::UnboundedSender<TransportEvent>) -> Self {
        Self { events, links: HashMap::new() }
    }
}

impl Transport for WsTransport {
    fn open(&mut self, conn: ConnectionId, url: &str) {
        // Drop senders whose connection task already ended.
        self.links.retain(|_, tx| !tx.is_closed());
        let (tx, rx) = mpsc::unbounded_channel();
        self.links.insert(conn, tx);
        tokio::spawn(run_connection(conn, url.to_owned(), rx, self.events.clone()));
    }

    fn send(&mut self, conn: ConnectionId, text: &str) -> Result<(), TransportError> {
        let Some(tx) = self.links.get(&conn) else {
            return Err(TransportError::NotOpen(conn));
        };
        if tx.send(text.to_owned()).is_err() {
            self.links.remove(&conn);
            return Err(TransportError::NotOpen(conn));
        }
        Ok(())
    }

    fn close(&mut self, conn: ConnectionId) {
        if self.links.remove(&conn).is_some() {
            debug!(%conn, "transport: close requested");
        }
    }
}

// =============================================================================
// CONNECTION TASK
// =============================================================================

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn run_connection(
    conn: ConnectionId,
    url: String,
    mut outbound: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    if let Some(stream) = establish(conn, &url, &mut outbound).await {
        forward(conn, stream, &mut outbound, &events).await;
    }
    // Release the receiver first so the link reads as closed once `Closed` is seen.
    drop(outbound);
    info!(%conn, "transport: connection closed");
    emit(&events, conn, TransportEventKind::Closed);
}

/// Connect, giving up early if the session closes the link while the
/// handshake is still in flight.
async fn establish(
    conn: ConnectionId,
    url: &str,
    outbound: &mut mpsc::UnboundedReceiver<String>,
) -> Option<WsStream> {
    let handshake = connect_async(url);
    tokio::pin!(handshake);
    loop {
        tokio::select! {
            result = &mut handshake => {
                return match result {
                    Ok((stream, _)) => {
                        info!(%conn, %url, "transport: connected");
                        Some(stream)
                    }
                    Err(error) => {
                        warn!(%conn, %url, %error, "transport: connect failed");
                        None
                    }
                };
            }
            queued = outbound.recv() => {
                if queued.is_none() {
                    debug!(%conn, "transport: closed before handshake completed");
                    return None;
                }
                warn!(%conn, "transport: dropped message queued before open");
            }
        }
    }
}

async fn forward(
    conn: ConnectionId,
    stream: WsStream,
    outbound: &mut mpsc::UnboundedReceiver<String>,
    events: &mpsc::UnboundedSender<TransportEvent>,
) {
    emit(events, conn, TransportEventKind::Open);
    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            inbound = source.next() => {
                let Some(inbound) = inbound else { break };
                match inbound {
                    Ok(Message::Text(text)) => {
                        emit(events, conn, TransportEventKind::Text(text.as_str().to_owned()));
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(error) => {
                        warn!(%conn, %error, "transport: read failed");
                        break;
                    }
                }
            }
            queued = outbound.recv() => {
                let Some(text) = queued else {
                    if let Err(error) = sink.send(Message::Close(None)).await {
                        debug!(%conn, %error, "transport: close frame not delivered");
                    }
                    break;
                };
                if let Err(error) = sink.send(Message::text(text)).await {
                    warn!(%conn, %error, "transport: write failed");
                    break;
                }
            }
        }
    }
}

fn emit(events: &mpsc::UnboundedSender<TransportEvent>, conn: ConnectionId, kind: TransportEventKind) {
    if events.send(TransportEvent::new(conn, kind)).is_err() {
        debug!(%conn, "transport: event receiver dropped");
    }
}
