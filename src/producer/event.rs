//! Event types flowing from producers to the dispatch loop.
//!
//! These enums define the protocol between the producer threads and the
//! single consumer.

use crate::error::ClientError;
use crate::protocol::ServerMessage;
use std::fmt;

/// Key codes for keyboard input.
///
/// This is the subset of crossterm's `KeyCode` that key bindings can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Function key (F1-F12).
    F(u8),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Tab key.
    Tab,
    /// Backtab (Shift+Tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        control: false,
        alt: false,
    };

    /// Control only.
    pub const CONTROL: Self = Self {
        control: true,
        alt: false,
    };
}

/// One raw key press: the input token of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    /// The key code.
    pub code: KeyCode,
    /// Modifiers held during keypress.
    pub modifiers: KeyModifiers,
}

impl Key {
    /// A key without modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// A printable character without modifiers.
    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    /// Control plus a character.
    pub const fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// Whether this is the interrupt combination (Ctrl+C).
    pub const fn is_interrupt(&self) -> bool {
        self.modifiers.control && matches!(self.code, KeyCode::Char('c' | 'C'))
    }

    /// The name key bindings use for this key, e.g. `"w"`, `"^X"`, `"M-x"`, `"up"`.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.alt {
            f.write_str("M-")?;
        }
        match self.code {
            KeyCode::Char(c) if self.modifiers.control => write!(f, "^{}", c.to_ascii_uppercase()),
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "f{n}"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::PageUp => f.write_str("pageup"),
            KeyCode::PageDown => f.write_str("pagedown"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::BackTab => f.write_str("backtab"),
            KeyCode::Delete => f.write_str("delete"),
            KeyCode::Insert => f.write_str("insert"),
            KeyCode::Esc => f.write_str("escape"),
        }
    }
}

/// Details of a terminal resize notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeInfo {
    /// The signal that triggered it, if any.
    pub signal: Option<i32>,
    /// New terminal size in columns and rows, if it could be queried.
    pub size: Option<(u16, u16)>,
}

/// One occurrence handed from a producer to the dispatch loop.
#[derive(Debug)]
pub enum Event {
    /// A decoded server message; `None` means the server closed the connection.
    Message(Option<ServerMessage>),

    /// A raw key press.
    Input(Key),

    /// A producer failed; fatal for the session.
    Error(ClientError),

    /// The terminal was resized.
    Resize(ResizeInfo),
}
