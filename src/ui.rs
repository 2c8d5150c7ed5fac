//! Terminal UI binding.
//!
//! Turns input lines into commands and domain events into log lines. The
//! binding holds no session state of its own; status comes from the
//! session's queries.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use std::io::{self, Write};

use time::OffsetDateTime;

use crate::event::{Command, DomainEvent};
use crate::session::{ConnectionStatus, SessionError};

/// One parsed line of user input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    /// Connect when disconnected, disconnect otherwise.
    Toggle,
    Status,
    Quit,
}

/// Map an input line to an [`Input`]. Blank lines map to nothing.
///
/// Slash commands are matched after trimming; chat text is kept verbatim.
#[must_use]
pub fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }
    let input = match line.trim() {
        "/connect" => Input::Command(Command::Connect),
        "/disconnect" => Input::Command(Command::Disconnect),
        "/toggle" => Input::Toggle,
        "/status" => Input::Status,
        "/quit" | "/exit" => Input::Quit,
        _ => Input::Command(Command::SendText(line.to_owned())),
    };
    Some(input)
}

/// Log text for one domain event.
#[must_use]
pub fn event_line(event: &DomainEvent) -> String {
    match event {
        DomainEvent::Connected { name } => format!("Connected as {name}"),
        DomainEvent::Disconnected { name } => format!("Disconnected {name}"),
        DomainEvent::TransportClosed => "Disconnected.".to_owned(),
        DomainEvent::PeerJoined { name } => format!("Joined {name}"),
        DomainEvent::MessageReceived { name, text } => format!("{name}: {text}"),
    }
}

/// Status indicator text.
#[must_use]
pub fn status_line(status: ConnectionStatus, identity: &str) -> String {
    match status {
        ConnectionStatus::Connected => format!("connected ({identity})"),
        other => other.to_string(),
    }
}

/// `(HH:MM:SS) ` prefix in UTC.
#[must_use]
pub fn timestamp_prefix(now: OffsetDateTime) -> String {
    format!("({:02}:{:02}:{:02}) ", now.hour(), now.minute(), now.second())
}

/// How log lines are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Timestamped human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Writes the chat log to any [`Write`] sink.
pub struct ChatView<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ChatView<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Render one domain event.
    ///
    /// # Errors
    ///
    /// Propagates write failures on the underlying sink.
    pub fn render_event(&mut self, event: &DomainEvent) -> io::Result<()> {
        self.render_event_at(event, OffsetDateTime::now_utc())
    }

    /// Render one domain event stamped with `now`.
    ///
    /// # Errors
    ///
    /// Propagates write failures on the underlying sink.
    pub fn render_event_at(&mut self, event: &DomainEvent, now: OffsetDateTime) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => self.write_line(now, &event_line(event)),
            OutputFormat::Json => {
                let json = serde_json::to_string(event).map_err(io::Error::other)?;
                writeln!(self.out, "{json}")?;
                self.out.flush()
            }
        }
    }

    /// Render the status indicator.
    ///
    /// # Errors
    ///
    /// Propagates write failures on the underlying sink.
    pub fn render_status(&mut self, status: ConnectionStatus, identity: &str) -> io::Result<()> {
        let line = status_line(status, identity);
        match self.format {
            OutputFormat::Text => self.write_line(OffsetDateTime::now_utc(), &format!("[{line}]")),
            OutputFormat::Json => {
                let json = serde_json::json!({ "status": line });
                writeln!(self.out, "{json}")?;
                self.out.flush()
            }
        }
    }

    /// Render a rejected command.
    ///
    /// # Errors
    ///
    /// Propagates write failures on the underlying sink.
    pub fn render_error(&mut self, error: &SessionError) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => self.write_line(OffsetDateTime::now_utc(), &format!("error: {error}")),
            OutputFormat::Json => {
                let json = serde_json::json!({ "error": error.to_string() });
                writeln!(self.out, "{json}")?;
                self.out.flush()
            }
        }
    }

    /// Consume the view and return the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, now: OffsetDateTime, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}{text}", timestamp_prefix(now))?;
        self.out.flush()
    }
}
