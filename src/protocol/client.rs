//! Messages sent to the server.

use super::world::Pos;
use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Longest chat line the client will send, in characters.
pub const MAX_CHAT_LEN: usize = 500;

/// A compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Up.
    North,
    /// Down.
    South,
    /// Right.
    East,
    /// Left.
    West,
}

/// A player command, in the shape the server deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    /// Step one cell.
    Move(Direction),
    /// Fire the selected weapon, optionally in a direction.
    Shoot(Option<Direction>),
    /// Fire at an exact position.
    ShootPrecise(Pos),
    /// Give up.
    Suicide,
    /// Select the next weapon.
    NextWeapon,
    /// Select the previous weapon.
    PreviousWeapon,
}

/// An outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Join under this name.
    Name(String),
    /// Say something.
    Chat(String),
    /// Play.
    Input(Control),
}

impl ClientMessage {
    /// Build a validated name message.
    pub fn name(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ClientError::InvalidMessage("name must not be empty".to_string()));
        }
        if name.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(ClientError::InvalidMessage(format!(
                "name {name:?} contains whitespace or control characters"
            )));
        }
        Ok(Self::Name(name))
    }

    /// Build a validated chat message.
    pub fn chat(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ClientError::InvalidMessage("chat message is empty".to_string()));
        }
        if text.chars().count() > MAX_CHAT_LEN {
            return Err(ClientError::InvalidMessage(format!(
                "chat message is longer than {MAX_CHAT_LEN} characters"
            )));
        }
        if text.chars().any(char::is_control) {
            return Err(ClientError::InvalidMessage(
                "chat message contains control characters".to_string(),
            ));
        }
        Ok(Self::Chat(text))
    }

    /// Encode as a JSON frame body.
    pub fn to_json(&self) -> String {
        let value = match self {
            Self::Name(name) => json!(["name", name]),
            Self::Chat(text) => json!(["chat", text]),
            Self::Input(control) => json!(["input", control]),
        };
        value.to_string()
    }
}
