//! Chat relay: assigns display names and rebroadcasts chat text over websockets.

pub mod config;
pub mod names;
pub mod routes;
pub mod state;

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpListener;

pub use routes::app;
pub use state::AppState;

/// How long shutdown waits for socket tasks to deliver their close frames.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Serve the relay on `listener` until `shutdown` resolves, then notify and
/// release every connected client.
///
/// # Errors
///
/// Propagates I/O errors from the underlying server.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = routes::app(state.clone());
    let notify = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            let clients = notify.shutdown().await;
            tracing::info!(clients, "relay: shutting down");
        })
        .await?;

    let drained = tokio::time::timeout(DRAIN_GRACE, async {
        while state.open_sockets() > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    if drained.is_err() {
        tracing::warn!(open = state.open_sockets(), "relay: sockets still open after drain grace");
    }
    Ok(())
}
