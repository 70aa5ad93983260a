//! World deltas carried inside a `["world", [...]]` message.

use super::{split_tagged, take_arg, value_text};
use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Most cells a `field` delta may declare.
///
/// Each cell costs at least two bytes of JSON, so a frame of
/// [`MAX_FRAME_LEN`](crate::transport::MAX_FRAME_LEN) bytes cannot carry more.
pub const MAX_FIELD_CELLS: usize = crate::transport::MAX_FRAME_LEN / 2;

/// Cells in a `width` x `height` field, or `None` above [`MAX_FIELD_CELLS`].
pub fn field_area(width: u32, height: u32) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)
        .filter(|&cells| cells <= MAX_FIELD_CELLS)
}

/// Sprite names stacked in one field cell, topmost first.
pub type Sprites = Vec<String>;

/// A field coordinate. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Pos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Pos {
    /// Create a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Pos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Pos> for (i32, i32) {
    fn from(pos: Pos) -> Self {
        (pos.x, pos.y)
    }
}

/// A full field layout.
///
/// `field` holds one index into `mapping` per cell, row-major with
/// `width` cells per row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldMessage {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// Per-cell index into `mapping`.
    pub field: Vec<usize>,
    /// Distinct sprite stacks referenced by `field`.
    pub mapping: Vec<Sprites>,
}

impl FieldMessage {
    /// Expand the compressed layout into `(position, sprites)` pairs.
    ///
    /// Linear index `i` lands on column `i % width`, row `i / width`.
    pub fn cells(&self) -> Vec<(Pos, Sprites)> {
        let width = self.width.max(1) as usize;
        self.field
            .iter()
            .enumerate()
            .filter_map(|(i, &sprite)| {
                let sprites = self.mapping.get(sprite)?;
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let pos = Pos::new((i % width) as i32, (i / width) as i32);
                Some((pos, sprites.clone()))
            })
            .collect()
    }

    /// Number of cells `width * height`, or `None` above [`MAX_FIELD_CELLS`].
    pub fn area(&self) -> Option<usize> {
        field_area(self.width, self.height)
    }

    fn validate(&self) -> Result<(), ProtocolError> {
        let Some(area) = self.area() else {
            return Err(ProtocolError::Shape(format!(
                "field of {}x{} exceeds {MAX_FIELD_CELLS} cells",
                self.width, self.height
            )));
        };
        if self.field.len() != area {
            return Err(ProtocolError::Shape(format!(
                "field of {}x{} carries {} cells",
                self.width,
                self.height,
                self.field.len()
            )));
        }
        if let Some(bad) = self.field.iter().find(|&&i| i >= self.mapping.len()) {
            return Err(ProtocolError::Shape(format!(
                "field references sprite {bad} but mapping has {}",
                self.mapping.len()
            )));
        }
        Ok(())
    }
}

/// A `/q` command menu attached to an `options` log entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptionsPrompt {
    /// Heading line.
    pub description: String,
    /// `(command, description)` pairs.
    pub options: Vec<(String, String)>,
}

/// One entry of a `messages` batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Message category.
    pub kind: Option<String>,
    /// Message text.
    pub text: String,
    /// Present when `kind` is `"options"` and the server attached a menu.
    pub prompt: Option<OptionsPrompt>,
}

/// A standalone options menu (`["options", [description, [option, ...]]]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsMenu {
    /// Heading line.
    pub description: String,
    /// Options, rendered verbatim.
    pub options: Vec<String>,
}

/// One world delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldUpdate {
    /// Full re-layout of the field.
    Field(FieldMessage),
    /// Sparse cell changes.
    ChangeCells(Vec<(Pos, Sprites)>),
    /// Where the player stands; the viewport centres on it.
    PlayerPos(Pos),
    /// Health bar. `max == None` means the player has died.
    Health {
        /// Current health.
        current: i64,
        /// Maximum health, absent once dead.
        max: Option<i64>,
    },
    /// Weapon list and selection.
    Weapons {
        /// Weapon names.
        weapons: Vec<String>,
        /// Index of the selected weapon.
        selected: Option<usize>,
    },
    /// What lies on the ground under the player.
    Ground(Vec<String>),
    /// A single log line.
    Message {
        /// Text.
        text: String,
        /// Category.
        kind: Option<String>,
    },
    /// A batch of log lines.
    Messages(Vec<LogEntry>),
    /// An options menu, or `None` to clear it.
    Options(Option<OptionsMenu>),
}

impl WorldUpdate {
    /// Decode one `[tag, args...]` delta.
    ///
    /// Returns `Ok(None)` for tags this client does not know; the server may
    /// be newer than we are.
    pub fn from_value(value: Value) -> Result<Option<Self>, ProtocolError> {
        let (tag, mut args) = split_tagged(value)?;
        let arg = take_arg(&mut args, 0);
        let update = match tag.as_str() {
            "field" => {
                let field: FieldMessage = serde_json::from_value(arg)?;
                field.validate()?;
                Self::Field(field)
            }
            "changecells" => Self::ChangeCells(serde_json::from_value(arg)?),
            "playerpos" => Self::PlayerPos(serde_json::from_value(arg)?),
            "health" => {
                let (current, max): (i64, Option<i64>) = serde_json::from_value(arg)?;
                Self::Health { current, max }
            }
            "weapons" => {
                let (weapons, selected): (Vec<Value>, Option<usize>) = serde_json::from_value(arg)?;
                Self::Weapons {
                    weapons: weapons.iter().map(value_text).collect(),
                    selected,
                }
            }
            "ground" => Self::Ground(text_list(&arg)),
            "message" => Self::Message {
                text: value_text(&arg),
                kind: take_arg(&mut args, 1).as_str().map(str::to_string),
            },
            "messages" => {
                let Value::Array(entries) = arg else {
                    return Err(ProtocolError::Shape("messages is not a list".to_string()));
                };
                Self::Messages(entries.into_iter().map(log_entry).collect::<Result<_, _>>()?)
            }
            "options" => Self::Options(options_menu(arg)?),
            _ => {
                debug!(tag = %tag, "skipping unknown world update");
                return Ok(None);
            }
        };
        Ok(Some(update))
    }
}

fn text_list(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(value_text).collect(),
        other => vec![value_text(other)],
    }
}

fn log_entry(value: Value) -> Result<LogEntry, ProtocolError> {
    let Value::Array(mut parts) = value else {
        return Err(ProtocolError::Shape("log entry is not a list".to_string()));
    };
    let kind = take_arg(&mut parts, 0).as_str().map(str::to_string);
    let text = match take_arg(&mut parts, 1) {
        Value::Null => String::new(),
        other => value_text(&other),
    };
    let prompt = match (kind.as_deref(), take_arg(&mut parts, 2)) {
        (Some("options"), arg) if !arg.is_null() => Some(serde_json::from_value(arg)?),
        _ => None,
    };
    Ok(LogEntry { kind, text, prompt })
}

fn options_menu(value: Value) -> Result<Option<OptionsMenu>, ProtocolError> {
    if value.is_null() {
        return Ok(None);
    }
    let (description, options): (Value, Vec<Value>) = serde_json::from_value(value)?;
    Ok(Some(OptionsMenu {
        description: value_text(&description),
        options: options.iter().map(value_text).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> WorldUpdate {
        WorldUpdate::from_value(value).unwrap().unwrap()
    }

    #[test]
    fn test_pos_serializes_as_pair() {
        assert_eq!(serde_json::to_value(Pos::new(2, -1)).unwrap(), json!([2, -1]));
        let pos: Pos = serde_json::from_value(json!([7, 8])).unwrap();
        assert_eq!(pos, Pos::new(7, 8));
    }

    #[test]
    fn test_field_cells_row_major() {
        let field = FieldMessage {
            width: 3,
            height: 2,
            field: vec![0, 1, 2, 3, 4, 5],
            mapping: ["a", "b", "c", "d", "e", "f"].iter().map(|s| vec![(*s).to_string()]).collect(),
        };
        let positions: Vec<(i32, i32)> = field.cells().iter().map(|(p, _)| (p.x, p.y)).collect();
        assert_eq!(positions, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(field.cells()[4].1, vec!["e".to_string()]);
    }

    #[test]
    fn test_decode_field_rejects_bad_mapping() {
        let err = WorldUpdate::from_value(json!(["field", {
            "width": 2, "height": 1, "field": [0, 3], "mapping": [["grass"]]
        }]));
        assert!(matches!(err, Err(ProtocolError::Shape(_))));
    }

    #[test]
    fn test_decode_field_rejects_wrong_cell_count() {
        let short = WorldUpdate::from_value(json!(["field", {
            "width": 3, "height": 2, "field": [0, 0, 0, 0], "mapping": [["grass"]]
        }]));
        assert!(matches!(short, Err(ProtocolError::Shape(_))));

        let empty = WorldUpdate::from_value(json!(["field", {
            "width": 0, "height": 5, "field": [0], "mapping": [["grass"]]
        }]));
        assert!(matches!(empty, Err(ProtocolError::Shape(_))));
    }

    #[test]
    fn test_decode_field_rejects_huge_dimensions() {
        let huge = WorldUpdate::from_value(json!(["field", {
            "width": u32::MAX, "height": u32::MAX, "field": [], "mapping": []
        }]));
        assert!(matches!(huge, Err(ProtocolError::Shape(_))));

        let over_cap = FieldMessage {
            width: 4096,
            height: 4096,
            field: Vec::new(),
            mapping: Vec::new(),
        };
        assert_eq!(over_cap.area(), None);
        assert_eq!(field_area(u32::MAX, 2), None);
        assert_eq!(field_area(3, 2), Some(6));
        assert_eq!(FieldMessage { width: 2048, height: 4096, ..over_cap }.area(), Some(MAX_FIELD_CELLS));
    }

    #[test]
    fn test_decode_health_death() {
        assert_eq!(decode(json!(["health", [0, null]])), WorldUpdate::Health { current: 0, max: None });
        assert_eq!(decode(json!(["health", [7, 10]])), WorldUpdate::Health { current: 7, max: Some(10) });
    }

    #[test]
    fn test_decode_changecells() {
        let update = decode(json!(["changecells", [[[1, 0], ["player", "grass"]]]]));
        assert_eq!(
            update,
            WorldUpdate::ChangeCells(vec![(Pos::new(1, 0), vec!["player".to_string(), "grass".to_string()])])
        );
    }

    #[test]
    fn test_decode_messages_with_options() {
        let update = decode(json!(["messages", [
            ["chat", "hello"],
            ["options", "", {"description": "Pick one", "options": [["yes", "agree"], ["no", "refuse"]]}]
        ]]));
        let WorldUpdate::Messages(entries) = update else {
            panic!("expected messages");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind.as_deref(), Some("chat"));
        assert!(entries[0].prompt.is_none());
        let prompt = entries[1].prompt.as_ref().unwrap();
        assert_eq!(prompt.description, "Pick one");
        assert_eq!(prompt.options[1], ("no".to_string(), "refuse".to_string()));
    }

    #[test]
    fn test_decode_options() {
        assert_eq!(decode(json!(["options", null])), WorldUpdate::Options(None));
        assert_eq!(
            decode(json!(["options", ["Trade", ["buy", "sell"]]])),
            WorldUpdate::Options(Some(OptionsMenu {
                description: "Trade".to_string(),
                options: vec!["buy".to_string(), "sell".to_string()],
            }))
        );
    }

    #[test]
    fn test_decode_weapons_and_ground() {
        assert_eq!(
            decode(json!(["weapons", [["sword", "bow"], 1]])),
            WorldUpdate::Weapons {
                weapons: vec!["sword".to_string(), "bow".to_string()],
                selected: Some(1),
            }
        );
        assert_eq!(decode(json!(["ground", ["stone"]])), WorldUpdate::Ground(vec!["stone".to_string()]));
        assert_eq!(decode(json!(["ground", null])), WorldUpdate::Ground(Vec::new()));
    }
}
