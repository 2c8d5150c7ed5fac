//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The chat client derives its websocket URL from whatever page hosts it, so
//! the relay accepts upgrades on every path. Only `/healthz` is reserved.

pub mod ws;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the relay router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .fallback(ws::handle_ws)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
