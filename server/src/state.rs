//! Shared relay state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! maps each connected client's display name to the sender half of that
//! client's outbound frame queue. Socket tasks own the receivers; dropping a
//! sender from the map is how the relay asks a socket task to close.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use frames::Frame;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info};

use crate::names;

/// Outbound queue depth per client.
pub const CLIENT_QUEUE_DEPTH: usize = 256;

/// Shared application state. Clone is required by Axum; the map is Arc-wrapped.
#[derive(Clone, Default)]
pub struct AppState {
    /// Connected clients: display name -> sender for outgoing frames.
    pub clients: Arc<RwLock<HashMap<String, mpsc::Sender<Frame>>>>,
    /// Socket tasks still running, registered or not.
    sockets: Arc<AtomicUsize>,
}

/// Counts one running socket task for as long as it is held.
pub struct SocketGuard {
    sockets: Arc<AtomicUsize>,
}

impl Drop for SocketGuard {
    fn drop(&mut self) {
        self.sockets.fetch_sub(1, Ordering::SeqCst);
    }
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under a fresh unique name and announce it to the
    /// peers already present. The newcomer does not hear its own join.
    pub async fn join(&self, tx: mpsc::Sender<Frame>) -> String {
        let mut clients = self.clients.write().await;
        let name = names::unique_name(&mut rand::rng(), |candidate| clients.contains_key(candidate));

        let join = Frame::Join { name: name.clone() };
        for peer in clients.values() {
            // Best-effort: if a client's queue is full, skip it.
            let _ = peer.try_send(join.clone());
        }
        clients.insert(name.clone(), tx);
        info!(%name, peers = clients.len() - 1, "relay: client joined");
        name
    }

    /// Forget a client. Unknown names are ignored.
    pub async fn part(&self, name: &str) {
        if self.clients.write().await.remove(name).is_some() {
            info!(%name, "relay: client left");
        }
    }

    /// Send `frame` to every connected client, sender included.
    pub async fn broadcast(&self, frame: &Frame) {
        let clients = self.clients.read().await;
        for tx in clients.values() {
            let _ = tx.try_send(frame.clone());
        }
    }

    /// Tell every client its session is over, then release their queues so
    /// the socket tasks close. Returns how many clients were connected.
    pub async fn shutdown(&self) -> usize {
        let drained: Vec<_> = self.clients.write().await.drain().collect();
        let count = drained.len();
        for (name, tx) in drained {
            if tx.send(Frame::Disconnect { name: name.clone() }).await.is_err() {
                debug!(%name, "relay: client gone before shutdown notice");
            }
        }
        count
    }

    /// Number of connected clients.
    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Mark a socket task as running until the guard is dropped.
    #[must_use]
    pub fn track_socket(&self) -> SocketGuard {
        self.sockets.fetch_add(1, Ordering::SeqCst);
        SocketGuard { sockets: Arc::clone(&self.sockets) }
    }

    /// Number of socket tasks still running.
    #[must_use]
    pub fn open_sockets(&self) -> usize {
        self.sockets.load(Ordering::SeqCst)
    }
}
