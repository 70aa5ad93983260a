//! Key handling: bindings, the chat prompt, outbound messages.

use super::Client;
use crate::bindings::Action;
use crate::display::Display;
use crate::producer::{Key, KeyCode};
use crate::protocol::{ClientMessage, Control};
use crate::transport::MessageSink;
use tracing::{debug, warn};

impl<D: Display, S: MessageSink> Client<D, S> {
    /// Handle one non-interrupt key press.
    pub fn on_input(&mut self, key: Key) {
        if self.state.chat_prompt.is_some() {
            self.edit_prompt(key);
            return;
        }
        match self.bindings.resolve(&key).cloned() {
            Some(action) => self.execute(action),
            None => debug!(key = %key, "unbound key"),
        }
    }

    /// Perform a bound action.
    pub fn execute(&mut self, action: Action) {
        match action {
            Action::Input(control) => self.send_input(control),
            Action::Chat => {
                self.state.chat_prompt = Some(String::new());
                self.display.set_prompt(Some(""));
            }
            Action::Say(text) => self.send_chat(text),
            Action::Help => self.toggle_help(),
            Action::Quit => self.close(None),
            Action::Scroll(lines) => self.display.scroll_log(lines),
        }
    }

    /// Show or hide the long help.
    pub fn toggle_help(&mut self) {
        self.state.help_visible = !self.state.help_visible;
        if self.state.help_visible {
            let long_help = self.state.long_help.clone();
            for line in long_help.lines() {
                self.display.add_message(line, Some("help"));
            }
            self.display.show_help();
        } else {
            self.display.hide_help();
        }
    }

    /// Send a game command.
    pub fn send_input(&mut self, control: Control) {
        self.send(&ClientMessage::Input(control));
    }

    /// Validate and send a chat line. Invalid lines are logged, not sent.
    pub fn send_chat(&mut self, text: String) {
        match ClientMessage::chat(text) {
            Ok(message) => self.send(&message),
            Err(e) => self.log(&e.to_string(), Some("error")),
        }
    }

    fn send(&mut self, message: &ClientMessage) {
        if let Err(e) = self.sink.send(message) {
            // A dead connection also shows up on the listener side.
            warn!(error = %e, "send failed");
            self.log(&e.to_string(), Some("error"));
        }
    }

    fn edit_prompt(&mut self, key: Key) {
        let Some(mut line) = self.state.chat_prompt.take() else {
            return;
        };
        match key.code {
            KeyCode::Enter => {
                self.display.set_prompt(None);
                self.send_chat(line);
                return;
            }
            KeyCode::Esc => {
                self.display.set_prompt(None);
                return;
            }
            KeyCode::Backspace => {
                line.pop();
            }
            KeyCode::Char(c) if !key.modifiers.control && !key.modifiers.alt => line.push(c),
            _ => {}
        }
        self.display.set_prompt(Some(&line));
        self.state.chat_prompt = Some(line);
    }
}
