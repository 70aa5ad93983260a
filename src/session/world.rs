//! World-delta routing.

use super::Client;
use crate::display::Display;
use crate::protocol::{LogEntry, WorldUpdate};
use crate::transport::MessageSink;

/// Logged once when the server reports the player dead.
pub const DEATH_NOTICE: &str = "You have died. Restart the client to respawn";

impl<D: Display, S: MessageSink> Client<D, S> {
    /// Apply one world delta to the display.
    pub fn handle_world_update(&mut self, update: &WorldUpdate) {
        match update {
            WorldUpdate::Field(field) => {
                self.display.resize_field(field.width, field.height);
                self.display.draw_field_cells(&field.cells());
            }
            WorldUpdate::ChangeCells(cells) => {
                if !cells.is_empty() {
                    self.display.draw_field_cells(cells);
                }
            }
            WorldUpdate::PlayerPos(pos) => self.display.set_field_center(*pos),
            WorldUpdate::Health { current, max } => {
                self.display.set_health(*current, *max);
                if max.is_none() {
                    self.log(DEATH_NOTICE, None);
                }
            }
            WorldUpdate::Weapons { weapons, selected } => self.display.set_weapons(weapons, *selected),
            WorldUpdate::Ground(ground) => self.display.set_ground(ground),
            WorldUpdate::Message { text, kind } => self.log(text, kind.as_deref()),
            WorldUpdate::Messages(entries) => {
                for entry in entries {
                    self.log_entry(entry);
                }
            }
            WorldUpdate::Options(Some(menu)) => {
                self.log(&menu.description, None);
                for option in &menu.options {
                    self.log(option, None);
                }
            }
            WorldUpdate::Options(None) => {}
        }
    }

    fn log_entry(&mut self, entry: &LogEntry) {
        match &entry.prompt {
            Some(prompt) => {
                self.log(&prompt.description, None);
                for (command, description) in &prompt.options {
                    self.log(&format!("/q {command:<24}   - {description}"), None);
                }
            }
            None => self.log(&entry.text, entry.kind.as_deref()),
        }
    }
}
