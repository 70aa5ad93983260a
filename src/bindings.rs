//! Input bindings: resolve a raw key to a semantic action.
//!
//! Bindings files are JSON:
//!
//! ```json
//! {
//!     "actions": {
//!         "w": {"input": {"move": "north"}},
//!         "enter": "chat",
//!         "?": "help"
//!     },
//!     "shorthelp": "wasd: move  ?: help",
//!     "longhelp": "..."
//! }
//! ```

use crate::error::{ClientError, Result};
use crate::producer::Key;
use crate::protocol::{Control, Direction};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// What a key press does.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Send a game command.
    Input(Control),
    /// Open the chat prompt.
    Chat,
    /// Send a fixed chat line.
    Say(String),
    /// Toggle the help overlay.
    Help,
    /// Leave the game.
    Quit,
    /// Scroll the message log by this many lines (positive = older).
    Scroll(i32),
}

/// A key → action table plus the help texts shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Keybindings {
    /// Actions by key name (see [`Key::name`]).
    #[serde(default)]
    pub actions: HashMap<String, Action>,
    /// One-line summary shown in the info bar.
    #[serde(default, rename = "shorthelp")]
    pub short_help: String,
    /// Full help shown on demand.
    #[serde(default, rename = "longhelp")]
    pub long_help: String,
}

impl Keybindings {
    /// Load bindings from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
            .map_err(|e| ClientError::Config(format!("invalid key bindings in {}: {e}", path.display())))
    }

    /// Parse bindings from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Look up the action bound to `key`.
    pub fn resolve(&self, key: &Key) -> Option<&Action> {
        self.actions.get(&key.name())
    }
}

impl Default for Keybindings {
    fn default() -> Self {
        let moves = [
            (["w", "k", "up"], Direction::North),
            (["s", "j", "down"], Direction::South),
            (["d", "l", "right"], Direction::East),
            (["a", "h", "left"], Direction::West),
        ];
        let shots = [("W", Direction::North), ("S", Direction::South), ("D", Direction::East), ("A", Direction::West)];

        let mut actions = HashMap::new();
        for (keys, direction) in moves {
            for key in keys {
                actions.insert(key.to_string(), Action::Input(Control::Move(direction)));
            }
        }
        for (key, direction) in shots {
            actions.insert(key.to_string(), Action::Input(Control::Shoot(Some(direction))));
        }
        actions.insert("f".to_string(), Action::Input(Control::Shoot(None)));
        actions.insert("space".to_string(), Action::Input(Control::Shoot(None)));
        actions.insert("e".to_string(), Action::Input(Control::NextWeapon));
        actions.insert("q".to_string(), Action::Input(Control::PreviousWeapon));
        actions.insert("X".to_string(), Action::Input(Control::Suicide));
        actions.insert("enter".to_string(), Action::Chat);
        actions.insert("t".to_string(), Action::Chat);
        actions.insert("?".to_string(), Action::Help);
        actions.insert("Q".to_string(), Action::Quit);
        actions.insert("pageup".to_string(), Action::Scroll(5));
        actions.insert("pagedown".to_string(), Action::Scroll(-5));

        Self {
            actions,
            short_help: "wasd/hjkl: move  WASD: shoot  q/e: weapon  t: chat  ?: help  Q: quit".to_string(),
            long_help: [
                "Controls:",
                "  w a s d, h j k l, arrows   move",
                "  W A S D                    shoot in a direction",
                "  f, space                   shoot",
                "  q / e                      previous / next weapon",
                "  X                          suicide",
                "  t, enter                   chat (enter sends, escape cancels)",
                "  pageup / pagedown          scroll messages",
                "  ?                          toggle this help",
                "  Q                          quit, ctrl-c aborts",
            ]
            .join("\n"),
        }
    }
}
