//! Wire protocol: typed messages exchanged with the game server.
//!
//! Every message on the wire is a JSON array whose first element is a kind
//! tag, e.g. `["message", "bob connected"]` or `["world", [...]]`. Decoding
//! happens here, at the transport boundary, so the dispatch loop only ever
//! matches on enums.
//!
//! # Server → client
//!
//! ```text
//! ["error", kind, description]
//! ["message", text, kind?]
//! ["world", [update, ...]]      update = [tag, args...]
//! ```
//!
//! # Client → server
//!
//! ```text
//! ["name", name]
//! ["chat", text]
//! ["input", control]
//! ```

mod client;
mod server;
mod world;

pub use client::{ClientMessage, Control, Direction, MAX_CHAT_LEN};
pub use server::{ErrorKind, ServerMessage};
pub use world::{
    field_area, FieldMessage, LogEntry, OptionsMenu, OptionsPrompt, Pos, Sprites, WorldUpdate, MAX_FIELD_CELLS,
};

use crate::error::ProtocolError;
use serde_json::Value;

/// Split a tagged JSON array into its tag and remaining arguments.
fn split_tagged(value: Value) -> Result<(String, Vec<Value>), ProtocolError> {
    let Value::Array(mut items) = value else {
        return Err(ProtocolError::Shape("message is not an array".to_string()));
    };
    if items.is_empty() {
        return Err(ProtocolError::Shape("empty message array".to_string()));
    }
    match items.remove(0) {
        Value::String(tag) => Ok((tag, items)),
        other => Err(ProtocolError::Shape(format!("message tag is not a string: {other}"))),
    }
}

/// Take argument `index`, or `Null` when it is missing.
fn take_arg(args: &mut [Value], index: usize) -> Value {
    args.get_mut(index).map(Value::take).unwrap_or(Value::Null)
}

/// Render a JSON value as user-facing text: strings verbatim, anything else as JSON.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_tagged() {
        let (tag, args) = split_tagged(json!(["message", "hi", "chat"])).unwrap();
        assert_eq!(tag, "message");
        assert_eq!(args, vec![json!("hi"), json!("chat")]);
    }

    #[test]
    fn test_split_tagged_rejects_non_arrays() {
        assert!(split_tagged(json!({"message": "hi"})).is_err());
        assert!(split_tagged(json!([])).is_err());
        assert!(split_tagged(json!([3, "hi"])).is_err());
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("sword")), "sword");
        assert_eq!(value_text(&json!(["a", 1])), "[\"a\",1]");
    }
}
