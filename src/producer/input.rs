//! Input Reader: dedicated thread blocking on raw key presses.
//!
//! Each key press is pushed as an `Input` event. A read failure is pushed
//! as an `Error` event and the reader stops.

use super::event::{Event, Key, KeyCode, KeyModifiers, ResizeInfo};
use super::{spawn_detached, EventSender, Exit, ProducerHandle};
use crate::error::{ClientError, Result};
use crossterm::event::{self, KeyEventKind};

/// What a [`KeySource`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInput {
    /// A key press.
    Key(Key),
    /// The terminal reported a new size through the input stream.
    Resize(ResizeInfo),
    /// Something that is not a key press (mouse, focus, release...).
    Ignored,
    /// The input stream ended.
    Eof,
}

/// A blocking source of raw input.
pub trait KeySource {
    /// Block until the next input item is available.
    fn next_input(&mut self) -> Result<RawInput>;
}

/// Reads key presses from the terminal through crossterm.
#[derive(Debug, Default)]
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn next_input(&mut self) -> Result<RawInput> {
        let event = event::read().map_err(|e| ClientError::Input(e.to_string()))?;
        Ok(convert_event(event))
    }
}

/// Producer wrapping a [`KeySource`].
pub struct InputReader;

impl InputReader {
    /// Spawn the input reader thread.
    pub fn spawn<K>(source: K, events: EventSender) -> Result<ProducerHandle>
    where
        K: KeySource + Send + 'static,
    {
        spawn_detached("input", events, move |events| Self::run_loop(source, events))
    }

    /// Main input loop.
    fn run_loop<K: KeySource>(mut source: K, events: &EventSender) -> Exit {
        loop {
            let event = match source.next_input() {
                Ok(RawInput::Key(key)) => Event::Input(key),
                Ok(RawInput::Resize(info)) => Event::Resize(info),
                Ok(RawInput::Ignored) => continue,
                Ok(RawInput::Eof) => return Exit::Silent,
                Err(e) => {
                    events.push(Event::Error(e));
                    return Exit::Reported;
                }
            };
            if !events.push(event) {
                return Exit::ReceiverGone;
            }
        }
    }
}

/// Convert a crossterm event to our input item.
fn convert_event(event: event::Event) -> RawInput {
    match event {
        event::Event::Key(key_event) => {
            // Only process key press events (not release or repeat)
            if key_event.kind != KeyEventKind::Press {
                return RawInput::Ignored;
            }
            convert_key_code(key_event.code).map_or(RawInput::Ignored, |code| {
                RawInput::Key(Key {
                    code,
                    modifiers: convert_modifiers(key_event.modifiers),
                })
            })
        }
        // SIGWINCH already covers resizes on unix.
        #[cfg(not(unix))]
        event::Event::Resize(width, height) => RawInput::Resize(ResizeInfo {
            signal: None,
            size: Some((width, height)),
        }),
        _ => RawInput::Ignored,
    }
}

/// Convert crossterm `KeyCode` to ours.
fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::F(n) => KeyCode::F(n),
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Home => KeyCode::Home,
        event::KeyCode::End => KeyCode::End,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        event::KeyCode::Tab => KeyCode::Tab,
        event::KeyCode::BackTab => KeyCode::BackTab,
        event::KeyCode::Delete => KeyCode::Delete,
        event::KeyCode::Insert => KeyCode::Insert,
        event::KeyCode::Esc => KeyCode::Esc,
        _ => return None,
    })
}

/// Convert crossterm `KeyModifiers` to ours. Shift is already folded into the character.
fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        control: mods.contains(event::KeyModifiers::CONTROL),
        alt: mods.contains(event::KeyModifiers::ALT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::channel;
    use crossterm::event::{KeyEvent, KeyEventState};
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Result<RawInput>>);

    impl KeySource for Scripted {
        fn next_input(&mut self) -> Result<RawInput> {
            self.0.pop_front().unwrap_or(Ok(RawInput::Eof))
        }
    }

    #[test]
    fn test_convert_ctrl_c() {
        let event = event::Event::Key(KeyEvent::new(event::KeyCode::Char('c'), event::KeyModifiers::CONTROL));
        assert_eq!(convert_event(event), RawInput::Key(Key::ctrl('c')));
    }

    #[test]
    fn test_convert_ignores_release() {
        let event = event::Event::Key(KeyEvent {
            code: event::KeyCode::Char('a'),
            modifiers: event::KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(convert_event(event), RawInput::Ignored);
        assert_eq!(convert_event(event::Event::FocusGained), RawInput::Ignored);
    }

    #[test]
    fn test_reader_pushes_keys_then_error() {
        let (tx, rx) = channel();
        let script = Scripted(VecDeque::from(vec![
            Ok(RawInput::Key(Key::char('w'))),
            Ok(RawInput::Ignored),
            Ok(RawInput::Key(Key::char('a'))),
            Err(ClientError::Input("tty gone".to_string())),
        ]));
        InputReader::spawn(script, tx).unwrap();

        assert!(matches!(rx.pop(), Event::Input(key) if key == Key::char('w')));
        assert!(matches!(rx.pop(), Event::Input(key) if key == Key::char('a')));
        assert!(matches!(rx.pop(), Event::Error(ClientError::Input(msg)) if msg == "tty gone"));
        // The reader dropped its sender after reporting.
        assert!(matches!(rx.pop(), Event::Error(ClientError::ChannelClosed)));
    }

    #[test]
    fn test_run_loop_exit_reasons() {
        let (tx, rx) = channel();
        let eof = Scripted(VecDeque::new());
        assert_eq!(InputReader::run_loop(eof, &tx), Exit::Silent);

        drop(rx);
        let keys = Scripted(VecDeque::from(vec![Ok(RawInput::Key(Key::char('x')))]));
        assert_eq!(InputReader::run_loop(keys, &tx), Exit::ReceiverGone);
    }
}
