//! Shared frame model and JSON codec for the chat websocket protocol.
//!
//! This crate owns the wire representation used by both `server` and the
//! `wschat` client. Server → client traffic is a JSON object discriminated by
//! `action`; client → server traffic is the raw message text and never passes
//! through this codec.

use serde_json::{Map, Value};

/// Field carrying the frame discriminant.
pub const FIELD_ACTION: &str = "action";
/// Field carrying the display name a frame refers to.
pub const FIELD_NAME: &str = "name";
/// Field carrying the message body of a `sent` frame.
pub const FIELD_TEXT: &str = "text";

/// Display name the relay never assigns. Clients hold it as their identity
/// until a `connect` frame names them.
pub const RESERVED_NAME: &str = "UNKNOWN";

/// Error returned by [`decode_frame`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload is not valid JSON.
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The payload parsed but is not a JSON object.
    #[error("frame is not a JSON object")]
    NotAnObject,
    /// The object has no string `action` discriminant.
    #[error("frame has no string `action` field")]
    MissingAction,
    /// A recognized action is missing one of its required string fields.
    #[error("`{action}` frame is missing string field `{field}`")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },
}

/// A single server → client message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// Handshake: the server assigned `name` to the receiving client.
    Connect { name: String },
    /// The session identified by `name` is over.
    Disconnect { name: String },
    /// A peer named `name` joined the chat.
    Join { name: String },
    /// `name` posted `text`.
    Sent { name: String, text: String },
    /// An action this version does not understand. Receivers ignore it.
    Unknown { action: String },
}

impl Frame {
    /// Wire discriminant for this frame.
    #[must_use]
    pub fn action(&self) -> &str {
        match self {
            Self::Connect { .. } => "connect",
            Self::Disconnect { .. } => "disconnect",
            Self::Join { .. } => "join",
            Self::Sent { .. } => "sent",
            Self::Unknown { action } => action,
        }
    }

    /// Display name carried by the frame, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Connect { name }
            | Self::Disconnect { name }
            | Self::Join { name }
            | Self::Sent { name, .. } => Some(name),
            Self::Unknown { .. } => None,
        }
    }
}

/// Encode a frame as a JSON text payload.
#[must_use]
pub fn encode_frame(frame: &Frame) -> String {
    let mut map = Map::new();
    map.insert(FIELD_ACTION.to_owned(), Value::String(frame.action().to_owned()));
    if let Some(name) = frame.name() {
        map.insert(FIELD_NAME.to_owned(), Value::String(name.to_owned()));
    }
    if let Frame::Sent { text, .. } = frame {
        map.insert(FIELD_TEXT.to_owned(), Value::String(text.clone()));
    }
    Value::Object(map).to_string()
}

/// Decode a JSON text payload into a frame.
///
/// Unknown actions decode to [`Frame::Unknown`] without inspecting any other
/// field, so newer servers can add actions without breaking older clients.
///
/// # Errors
///
/// Returns [`CodecError::InvalidJson`] for unparseable text,
/// [`CodecError::NotAnObject`] / [`CodecError::MissingAction`] for payloads
/// without a discriminant, and [`CodecError::MissingField`] when a recognized
/// action lacks a required field.
pub fn decode_frame(text: &str) -> Result<Frame, CodecError> {
    let value = serde_json::from_str::<Value>(text)?;
    let Value::Object(map) = value else {
        return Err(CodecError::NotAnObject);
    };
    let action = map
        .get(FIELD_ACTION)
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingAction)?;

    match action {
        "connect" => Ok(Frame::Connect { name: required(&map, "connect", FIELD_NAME)? }),
        "disconnect" => Ok(Frame::Disconnect { name: required(&map, "disconnect", FIELD_NAME)? }),
        "join" => Ok(Frame::Join { name: required(&map, "join", FIELD_NAME)? }),
        "sent" => Ok(Frame::Sent {
            name: required(&map, "sent", FIELD_NAME)?,
            text: required(&map, "sent", FIELD_TEXT)?,
        }),
        other => Ok(Frame::Unknown { action: other.to_owned() }),
    }
}

fn required(
    map: &Map<String, Value>,
    action: &'static str,
    field: &'static str,
) -> Result<String, CodecError> {
    map.get(field)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or(CodecError::MissingField { action, field })
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
