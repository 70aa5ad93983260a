//! Terminal display built on crossterm.
//!
//! Layout, top to bottom: the field viewport with a side panel on its right,
//! the message log, and one info line (replaced by the chat prompt while the
//! user is typing). Every row is written padded to the full width, so a
//! redraw never needs to clear the screen first.

use super::Display;
use crate::error::Result;
use crate::protocol::{field_area, Pos, Sprites};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use tracing::warn;
use unicode_width::UnicodeWidthChar;

/// Width of the side panel, including its border.
const SIDE_WIDTH: u16 = 24;
/// Messages kept in memory.
const MAX_MESSAGES: usize = 1000;
/// Cells in the health bar.
const HEALTH_BAR: i64 = 10;

/// Map the topmost sprite of a cell to the character drawn for it.
pub fn sprite_char(sprites: &[String]) -> char {
    let Some(name) = sprites.first() else {
        return ' ';
    };
    match name.as_str() {
        "player" => '@',
        "wall" | "rock" => '#',
        "ground" | "floor" | "dirt" => '.',
        "grass" | "grass1" | "grass2" | "grass3" => ',',
        "water" => '~',
        "tree" | "plant" => 'T',
        "stone" | "pebble" => '*',
        "bullet" => '•',
        "door" | "gate" => '+',
        "portal" | "stairdown" => '>',
        "stairup" => '<',
        other => other.chars().next().filter(|c| !c.is_control()).unwrap_or('?'),
    }
}

/// First visible column or row of a viewport of `view` cells over `field`
/// cells, keeping `center` in the middle where possible.
pub(crate) fn viewport_origin(center: i32, field: u32, view: u16) -> i32 {
    let field = i32::try_from(field).unwrap_or(i32::MAX);
    let view = i32::from(view);
    if field <= view {
        return 0;
    }
    (center - view / 2).clamp(0, field - view)
}

/// Linear index of cell `(x, y)` in a `width` x `height` field, if it lies inside.
pub(crate) fn cell_index(width: u32, height: u32, x: i32, y: i32) -> Option<usize> {
    let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
    if x >= width || y >= height {
        return None;
    }
    usize::try_from(y)
        .ok()?
        .checked_mul(usize::try_from(width).ok()?)?
        .checked_add(usize::try_from(x).ok()?)
}

/// Truncate `text` to `width` columns and pad it with spaces to exactly `width`.
///
/// Control characters are dropped so server text cannot emit escape sequences.
pub(crate) fn fit(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for c in text.chars().filter(|c| !c.is_control()) {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.extend(std::iter::repeat(' ').take(width - used));
    out
}

fn message_color(kind: Option<&str>) -> Color {
    match kind {
        Some("error") => Color::Red,
        Some("chat") => Color::Cyan,
        Some("help") => Color::Yellow,
        Some("options") => Color::Green,
        _ => Color::Reset,
    }
}

/// Crossterm-backed [`Display`].
pub struct TerminalDisplay {
    stdout: Stdout,
    alternate_screen: bool,
    width: u16,
    height: u16,
    field_width: u32,
    field_height: u32,
    field: Vec<char>,
    center: Pos,
    health: Option<(i64, Option<i64>)>,
    weapons: Vec<String>,
    selected: Option<usize>,
    ground: Vec<String>,
    messages: VecDeque<(String, Option<String>)>,
    scroll: usize,
    info: String,
    long_help: String,
    help_visible: bool,
    prompt: Option<String>,
}

impl TerminalDisplay {
    /// Take over the terminal: raw mode, hidden cursor, optionally the alternate screen.
    ///
    /// The terminal is restored when the display is dropped.
    pub fn new(alternate_screen: bool) -> Result<Self> {
        let (width, height) = terminal::size()?;

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, cursor::Hide)?;

        Ok(Self {
            stdout,
            alternate_screen,
            width,
            height,
            field_width: 0,
            field_height: 0,
            field: Vec::new(),
            center: Pos::default(),
            health: None,
            weapons: Vec::new(),
            selected: None,
            ground: Vec::new(),
            messages: VecDeque::new(),
            scroll: 0,
            info: String::new(),
            long_help: String::new(),
            help_visible: false,
            prompt: None,
        })
    }

    fn side_width(&self) -> u16 {
        if self.width > SIDE_WIDTH * 2 {
            SIDE_WIDTH
        } else {
            0
        }
    }

    fn log_height(&self) -> u16 {
        (self.height / 4).clamp(3, 10).min(self.height.saturating_sub(2))
    }

    fn field_cell(&self, x: i32, y: i32) -> char {
        cell_index(self.field_width, self.field_height, x, y)
            .and_then(|i| self.field.get(i).copied())
            .unwrap_or(' ')
    }

    fn side_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match self.health {
            Some((current, Some(max))) => {
                let filled = if max > 0 { (current * HEALTH_BAR / max).clamp(0, HEALTH_BAR) } else { 0 };
                lines.push(format!("Health: {current}/{max}"));
                lines.push(format!(
                    "[{}{}]",
                    "#".repeat(usize::try_from(filled).unwrap_or(0)),
                    ".".repeat(usize::try_from(HEALTH_BAR - filled).unwrap_or(0))
                ));
            }
            Some((_, None)) => lines.push("Health: dead".to_string()),
            None => lines.push("Health: -".to_string()),
        }
        lines.push(String::new());
        lines.push("Weapons:".to_string());
        for (i, weapon) in self.weapons.iter().enumerate() {
            let marker = if Some(i) == self.selected { '>' } else { ' ' };
            lines.push(format!("{marker} {weapon}"));
        }
        lines.push(String::new());
        lines.push("Ground:".to_string());
        lines.extend(self.ground.iter().map(|item| format!("  {item}")));
        lines
    }

    fn draw(&mut self) -> io::Result<()> {
        let side = self.side_width();
        let log_height = self.log_height();
        let view_width = self.width.saturating_sub(side);
        let view_height = self.height.saturating_sub(log_height + 1);
        let origin_x = viewport_origin(self.center.x, self.field_width, view_width);
        let origin_y = viewport_origin(self.center.y, self.field_height, view_height);
        let side_lines = self.side_lines();
        let help: Vec<&str> = self.long_help.lines().collect();

        for row in 0..view_height {
            let mut line = if self.help_visible {
                fit(help.get(usize::from(row)).copied().unwrap_or(""), usize::from(view_width))
            } else {
                let y = origin_y + i32::from(row);
                let cells: String = (0..i32::from(view_width)).map(|x| self.field_cell(origin_x + x, y)).collect();
                fit(&cells, usize::from(view_width))
            };
            if side > 0 {
                line.push('│');
                let text = side_lines.get(usize::from(row)).map_or("", String::as_str);
                line.push_str(&fit(text, usize::from(side - 1)));
            }
            queue!(self.stdout, cursor::MoveTo(0, row), Print(line))?;
        }

        let visible = usize::from(log_height);
        let end = self.messages.len().saturating_sub(self.scroll);
        let start = end.saturating_sub(visible);
        for slot in 0..visible {
            let row = view_height + u16::try_from(slot).unwrap_or(u16::MAX);
            let (text, color) = self
                .messages
                .get(start + slot)
                .filter(|_| start + slot < end)
                .map_or((String::new(), Color::Reset), |(text, kind)| {
                    (text.clone(), message_color(kind.as_deref()))
                });
            queue!(
                self.stdout,
                cursor::MoveTo(0, row),
                SetForegroundColor(color),
                Print(fit(&text, usize::from(self.width))),
                ResetColor
            )?;
        }

        let bottom = match &self.prompt {
            Some(text) => format!("say: {text}_"),
            None => self.info.clone(),
        };
        queue!(
            self.stdout,
            cursor::MoveTo(0, self.height.saturating_sub(1)),
            Print(fit(&bottom, usize::from(self.width)))
        )?;
        self.stdout.flush()
    }
}

impl Display for TerminalDisplay {
    fn add_message(&mut self, text: &str, kind: Option<&str>) {
        for line in text.lines() {
            if self.messages.len() == MAX_MESSAGES {
                self.messages.pop_front();
            }
            self.messages.push_back((line.to_string(), kind.map(str::to_string)));
        }
    }

    fn show_info(&mut self, text: &str) {
        self.info = text.to_string();
    }

    fn set_long_help(&mut self, text: &str) {
        self.long_help = text.to_string();
    }

    fn show_help(&mut self) {
        self.help_visible = true;
    }

    fn hide_help(&mut self) {
        self.help_visible = false;
    }

    fn set_prompt(&mut self, text: Option<&str>) {
        self.prompt = text.map(str::to_string);
    }

    fn resize_field(&mut self, width: u32, height: u32) {
        let Some(area) = field_area(width, height) else {
            warn!(width, height, "field too large, clearing it");
            self.field_width = 0;
            self.field_height = 0;
            self.field.clear();
            return;
        };
        self.field_width = width;
        self.field_height = height;
        self.field = vec![' '; area];
    }

    fn draw_field_cells(&mut self, cells: &[(Pos, Sprites)]) {
        for (pos, sprites) in cells {
            let cell = cell_index(self.field_width, self.field_height, pos.x, pos.y)
                .and_then(|i| self.field.get_mut(i));
            if let Some(cell) = cell {
                *cell = sprite_char(sprites);
            }
        }
    }

    fn set_field_center(&mut self, pos: Pos) {
        self.center = pos;
    }

    fn set_health(&mut self, current: i64, max: Option<i64>) {
        self.health = Some((current, max));
    }

    fn set_weapons(&mut self, weapons: &[String], selected: Option<usize>) {
        self.weapons = weapons.to_vec();
        self.selected = selected;
    }

    fn set_ground(&mut self, ground: &[String]) {
        self.ground = ground.to_vec();
    }

    fn scroll_log(&mut self, lines: i32) {
        let max = self.messages.len().saturating_sub(1);
        let amount = lines.unsigned_abs() as usize;
        self.scroll = if lines >= 0 {
            (self.scroll + amount).min(max)
        } else {
            self.scroll.saturating_sub(amount)
        };
    }

    fn update(&mut self) -> Result<()> {
        self.draw()?;
        Ok(())
    }

    fn update_size(&mut self) -> Result<()> {
        let (width, height) = terminal::size()?;
        self.width = width;
        self.height = height;
        queue!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = execute!(self.stdout, ResetColor, cursor::Show);
        if self.alternate_screen {
            let _ = execute!(self.stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
    }
}
