//! Messages sent by the server.

use super::world::WorldUpdate;
use super::{split_tagged, take_arg, value_text};
use crate::error::ProtocolError;
use serde_json::Value;
use std::fmt;

/// Error categories reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Another connection already plays under this name.
    NameTaken,
    /// The requested name was rejected.
    InvalidName,
    /// Any other server-side complaint; not fatal for the session.
    Other(String),
}

impl ErrorKind {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "nametaken" => Self::NameTaken,
            "invalidname" => Self::InvalidName,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameTaken => f.write_str("nametaken"),
            Self::InvalidName => f.write_str("invalidname"),
            Self::Other(tag) => f.write_str(tag),
        }
    }
}

/// A decoded server message.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// The server rejected something we did.
    Error {
        /// What went wrong.
        kind: ErrorKind,
        /// Human-readable detail.
        description: String,
    },

    /// Plain text for the message log.
    Message {
        /// The text.
        text: String,
        /// Optional category (e.g. "chat").
        kind: Option<String>,
    },

    /// A batch of world deltas, to be applied in order.
    World(Vec<WorldUpdate>),
}

impl ServerMessage {
    /// Decode one frame of JSON text.
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Decode an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        let (tag, mut args) = split_tagged(value)?;
        match tag.as_str() {
            "error" => {
                let kind = match take_arg(&mut args, 0) {
                    Value::String(kind) => ErrorKind::from_tag(&kind),
                    other => {
                        return Err(ProtocolError::Shape(format!("error kind is not a string: {other}")))
                    }
                };
                let description = match take_arg(&mut args, 1) {
                    Value::Null => String::new(),
                    other => value_text(&other),
                };
                Ok(Self::Error { kind, description })
            }
            "message" => {
                let text = value_text(&take_arg(&mut args, 0));
                let kind = take_arg(&mut args, 1).as_str().map(str::to_string);
                Ok(Self::Message { text, kind })
            }
            "world" => {
                let Value::Array(raw) = take_arg(&mut args, 0) else {
                    return Err(ProtocolError::Shape("world updates are not a list".to_string()));
                };
                let mut updates = Vec::with_capacity(raw.len());
                for update in raw {
                    if let Some(update) = WorldUpdate::from_value(update)? {
                        updates.push(update);
                    }
                }
                Ok(Self::World(updates))
            }
            _ => Err(ProtocolError::UnknownKind(tag)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Pos;

    #[test]
    fn test_decode_error_kinds() {
        let msg = ServerMessage::from_json(r#"["error", "nametaken", "Another connection exists"]"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Error {
                kind: ErrorKind::NameTaken,
                description: "Another connection exists".to_string()
            }
        );

        let msg = ServerMessage::from_json(r#"["error", "invalidaction", "no"]"#).unwrap();
        assert!(matches!(msg, ServerMessage::Error { kind: ErrorKind::Other(ref k), .. } if k == "invalidaction"));
    }

    #[test]
    fn test_decode_message_without_kind() {
        let msg = ServerMessage::from_json(r#"["message", "bob connected"]"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Message {
                text: "bob connected".to_string(),
                kind: None
            }
        );
    }

    #[test]
    fn test_decode_world_skips_unknown_tags() {
        let msg = ServerMessage::from_json(r#"["world", [["playerpos", [3, 4]], ["weather", "rain"]]]"#).unwrap();
        assert_eq!(msg, ServerMessage::World(vec![WorldUpdate::PlayerPos(Pos::new(3, 4))]));
    }

    #[test]
    fn test_decode_unknown_kind() {
        let err = ServerMessage::from_json(r#"["teleport", 1]"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownKind(ref k) if k == "teleport"));
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(ServerMessage::from_json("[\"message\""), Err(ProtocolError::Json(_))));
        assert!(matches!(ServerMessage::from_json(r#"["world", 3]"#), Err(ProtocolError::Shape(_))));
    }
}
