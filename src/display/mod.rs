//! Rendering collaborator.
//!
//! The dispatch loop only talks to the screen through [`Display`]. The world
//! state (field, viewport, health, weapons, ground) lives behind it and is
//! mutated only through these calls.

mod recording;
mod terminal;

pub use recording::{DisplayCall, RecordingDisplay};
pub use terminal::{sprite_char, TerminalDisplay};

use crate::error::Result;
use crate::protocol::{Pos, Sprites};

/// A passive rendering surface.
pub trait Display {
    /// Append a line to the message log.
    fn add_message(&mut self, text: &str, kind: Option<&str>);

    /// Set the one-line info bar.
    fn show_info(&mut self, text: &str);

    /// Set the text the help overlay shows.
    fn set_long_help(&mut self, text: &str);

    /// Show the help overlay.
    fn show_help(&mut self);

    /// Hide the help overlay.
    fn hide_help(&mut self);

    /// Show or clear the chat prompt.
    fn set_prompt(&mut self, text: Option<&str>);

    /// Resize the field, clearing it.
    fn resize_field(&mut self, width: u32, height: u32);

    /// Draw cells.
    fn draw_field_cells(&mut self, cells: &[(Pos, Sprites)]);

    /// Centre the viewport on `pos`.
    fn set_field_center(&mut self, pos: Pos);

    /// Update the health bar. `max == None` means dead.
    fn set_health(&mut self, current: i64, max: Option<i64>);

    /// Update the weapon list.
    fn set_weapons(&mut self, weapons: &[String], selected: Option<usize>);

    /// Update the ground indicator.
    fn set_ground(&mut self, ground: &[String]);

    /// Scroll the message log (positive = older).
    fn scroll_log(&mut self, lines: i32);

    /// Redraw.
    fn update(&mut self) -> Result<()>;

    /// Re-query the terminal size and re-layout.
    fn update_size(&mut self) -> Result<()>;
}
