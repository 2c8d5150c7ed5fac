//! WebSocket handler: chat relay.
//!
//! DESIGN
//! ======
//! On upgrade, registers the client under a random name and enters a
//! `select!` loop:
//! - Incoming client text → wrap as a `sent` frame → broadcast to everyone
//! - Frames queued for this client → forward to the socket
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → peers get `join`, the newcomer gets `connect` with its name
//! 2. Client text → `sent` broadcast, sender included
//! 3. Client close → forget the client
//! 4. Relay shutdown → `disconnect` to the client, queue dropped → socket closed

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use frames::Frame;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::state::{AppState, CLIENT_QUEUE_DEPTH};

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let _guard = state.track_socket();
    // Per-connection queue for frames addressed to this client.
    let (client_tx, mut client_rx) = mpsc::channel::<Frame>(CLIENT_QUEUE_DEPTH);
    let name = state.join(client_tx).await;

    if send_frame(&mut socket, &Frame::Connect { name: name.clone() }).await.is_err() {
        state.part(&name).await;
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!(%name, error = %e, "ws: read failed");
                        break;
                    }
                };
                match msg {
                    Message::Text(text) => {
                        debug!(%name, len = text.len(), "ws: recv text");
                        let sent = Frame::Sent { name: name.clone(), text: text.as_str().to_owned() };
                        state.broadcast(&sent).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            frame = client_rx.recv() => {
                let Some(frame) = frame else {
                    // Relay released this client's queue: shut the socket.
                    if let Err(e) = socket.send(Message::Close(None)).await {
                        debug!(%name, error = %e, "ws: close not delivered");
                    }
                    break;
                };
                if send_frame(&mut socket, &frame).await.is_err() {
                    break;
                }
            }
        }
    }

    state.part(&name).await;
    info!(%name, "ws: client disconnected");
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), axum::Error> {
    debug!(action = frame.action(), name = frame.name().unwrap_or("-"), "ws: send frame");
    let result = socket.send(Message::Text(frames::encode_frame(frame).into())).await;
    if let Err(e) = &result {
        warn!(action = frame.action(), error = %e, "ws: send failed");
    }
    result
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
