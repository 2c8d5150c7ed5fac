//! Client event loop.
//!
//! LIFECYCLE
//! =========
//! 1. Derive the websocket endpoint from the configured page URL.
//! 2. Build the session over a [`WsTransport`]; optionally connect.
//! 3. Loop on one `select!`, domain events first, then transport events,
//!    then input lines. Each branch runs to completion before the next, so
//!    the session only ever sees one event at a time.
//! 4. On `/quit` or end of input, close the connection and wait briefly for
//!    the transport to confirm.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::io::{self, Write};
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::endpoint::{EndpointError, PageLocation};
use crate::event::Command;
use crate::session::{ConnectionStatus, Session};
use crate::transport::{TransportEvent, TransportEventKind, WsTransport};
use crate::ui::{ChatView, Input, parse_input};

/// How long shutdown waits for the close handshake.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid page URL: {0}")]
    Endpoint(#[from] EndpointError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Run the client on stdin/stdout until the user quits.
///
/// # Errors
///
/// Fails on an unusable page URL or a terminal I/O error.
pub async fn run(config: Config) -> Result<(), AppError> {
    run_with(config, BufReader::new(tokio::io::stdin()), io::stdout()).await
}

/// Run the client over arbitrary input and output.
///
/// # Errors
///
/// Fails on an unusable page URL or an I/O error on either side.
pub async fn run_with<R, W>(config: Config, input: R, out: W) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let endpoint = PageLocation::parse(&config.page_url)?.ws_endpoint();
    let (transport_tx, mut transport_rx) = mpsc::unbounded_channel();
    let (mut session, mut events) = Session::new(WsTransport::new(transport_tx), endpoint);
    let mut view = ChatView::new(out, config.output_format());
    let mut lines = input.lines();
    info!(endpoint = session.endpoint(), "app: session ready");

    if config.connect {
        session.connect();
    }
    view.render_status(session.status(), session.current_identity())?;

    loop {
        tokio::select! {
            biased;
            Some(event) = events.recv() => {
                view.render_event(&event)?;
                if event.changes_status() {
                    view.render_status(session.status(), session.current_identity())?;
                }
            }
            Some(event) = transport_rx.recv() => session.handle_transport_event(event),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(input) = parse_input(&line) else { continue };
                let command = match input {
                    Input::Quit => break,
                    Input::Status => {
                        view.render_status(session.status(), session.current_identity())?;
                        continue;
                    }
                    Input::Toggle if session.status() == ConnectionStatus::Disconnected => Command::Connect,
                    Input::Toggle => Command::Disconnect,
                    Input::Command(command) => command,
                };
                let connecting = command == Command::Connect;
                if let Err(error) = session.execute(command) {
                    warn!(%error, "app: command rejected");
                    view.render_error(&error)?;
                }
                if connecting {
                    view.render_status(session.status(), session.current_identity())?;
                }
            }
        }
    }

    shutdown(&mut session, &mut transport_rx).await;
    while let Ok(event) = events.try_recv() {
        view.render_event(&event)?;
    }
    Ok(())
}

async fn shutdown(
    session: &mut Session<WsTransport>,
    transport_rx: &mut mpsc::UnboundedReceiver<TransportEvent>,
) {
    let Some(conn) = session.connection_id() else { return };
    session.disconnect();

    let confirmed = tokio::time::timeout(CLOSE_GRACE, async {
        while let Some(event) = transport_rx.recv().await {
            if event.conn == conn && event.kind == TransportEventKind::Closed {
                return;
            }
        }
    })
    .await;
    if confirmed.is_err() {
        debug!(%conn, "app: close not confirmed before exit");
    }
}
