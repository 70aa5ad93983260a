//! A headless display that records every call.

use super::Display;
use crate::error::Result;
use crate::protocol::{Pos, Sprites};

/// One recorded [`Display`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    /// `add_message`.
    AddMessage(String, Option<String>),
    /// `show_info`.
    ShowInfo(String),
    /// `set_long_help`.
    SetLongHelp(String),
    /// `show_help`.
    ShowHelp,
    /// `hide_help`.
    HideHelp,
    /// `set_prompt`.
    SetPrompt(Option<String>),
    /// `resize_field`.
    ResizeField(u32, u32),
    /// `draw_field_cells`.
    DrawFieldCells(Vec<(Pos, Sprites)>),
    /// `set_field_center`.
    SetFieldCenter(Pos),
    /// `set_health`.
    SetHealth(i64, Option<i64>),
    /// `set_weapons`.
    SetWeapons(Vec<String>, Option<usize>),
    /// `set_ground`.
    SetGround(Vec<String>),
    /// `scroll_log`.
    ScrollLog(i32),
    /// `update`.
    Update,
    /// `update_size`.
    UpdateSize,
}

/// Records calls instead of drawing. Used by tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    calls: Vec<DisplayCall>,
}

impl RecordingDisplay {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> &[DisplayCall] {
        &self.calls
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Texts of all `add_message` calls.
    pub fn messages(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DisplayCall::AddMessage(text, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Recorded calls other than redraws.
    pub fn changes(&self) -> Vec<&DisplayCall> {
        self.calls.iter().filter(|call| **call != DisplayCall::Update).collect()
    }
}

impl Display for RecordingDisplay {
    fn add_message(&mut self, text: &str, kind: Option<&str>) {
        self.calls.push(DisplayCall::AddMessage(text.to_string(), kind.map(str::to_string)));
    }

    fn show_info(&mut self, text: &str) {
        self.calls.push(DisplayCall::ShowInfo(text.to_string()));
    }

    fn set_long_help(&mut self, text: &str) {
        self.calls.push(DisplayCall::SetLongHelp(text.to_string()));
    }

    fn show_help(&mut self) {
        self.calls.push(DisplayCall::ShowHelp);
    }

    fn hide_help(&mut self) {
        self.calls.push(DisplayCall::HideHelp);
    }

    fn set_prompt(&mut self, text: Option<&str>) {
        self.calls.push(DisplayCall::SetPrompt(text.map(str::to_string)));
    }

    fn resize_field(&mut self, width: u32, height: u32) {
        self.calls.push(DisplayCall::ResizeField(width, height));
    }

    fn draw_field_cells(&mut self, cells: &[(Pos, Sprites)]) {
        self.calls.push(DisplayCall::DrawFieldCells(cells.to_vec()));
    }

    fn set_field_center(&mut self, pos: Pos) {
        self.calls.push(DisplayCall::SetFieldCenter(pos));
    }

    fn set_health(&mut self, current: i64, max: Option<i64>) {
        self.calls.push(DisplayCall::SetHealth(current, max));
    }

    fn set_weapons(&mut self, weapons: &[String], selected: Option<usize>) {
        self.calls.push(DisplayCall::SetWeapons(weapons.to_vec(), selected));
    }

    fn set_ground(&mut self, ground: &[String]) {
        self.calls.push(DisplayCall::SetGround(ground.to_vec()));
    }

    fn scroll_log(&mut self, lines: i32) {
        self.calls.push(DisplayCall::ScrollLog(lines));
    }

    fn update(&mut self) -> Result<()> {
        self.calls.push(DisplayCall::Update);
        Ok(())
    }

    fn update_size(&mut self) -> Result<()> {
        self.calls.push(DisplayCall::UpdateSize);
        Ok(())
    }
}
