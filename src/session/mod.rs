//! Session: the dispatch loop and the state it owns.
//!
//! [`Client::run`] is the single consumer of the event channel. It is the
//! only writer of [`SessionState`] and the only caller of the [`Display`],
//! so none of that state needs a lock.

mod input;
mod world;

use crate::bindings::Keybindings;
use crate::display::Display;
use crate::error::{ClientError, Result};
use crate::logging::MessageLog;
use crate::producer::{Event, EventReceiver};
use crate::protocol::{ClientMessage, ErrorKind, ServerMessage};
use crate::transport::MessageSink;
use tracing::{debug, info, warn};

/// Close message used when the server hangs up.
pub const CONNECTION_CLOSED: &str = "Connection closed by server";

/// State owned by the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// The loop runs while this is set.
    pub keep_alive: bool,
    /// Final status reported when the session ends.
    pub close_message: Option<String>,
    /// Whether the help overlay is shown.
    pub help_visible: bool,
    /// Chat line being typed, if the prompt is open.
    pub chat_prompt: Option<String>,
    /// Info bar text.
    pub short_help: String,
    /// Help overlay text.
    pub long_help: String,
}

/// One client session.
pub struct Client<D, S> {
    display: D,
    sink: S,
    bindings: Keybindings,
    message_log: MessageLog,
    state: SessionState,
}

impl<D: Display, S: MessageSink> Client<D, S> {
    /// Create a session and put the help texts on the display.
    pub fn new(mut display: D, sink: S, bindings: Keybindings, message_log: MessageLog) -> Self {
        display.show_info(&bindings.short_help);
        display.set_long_help(&bindings.long_help);
        let state = SessionState {
            keep_alive: true,
            close_message: None,
            help_visible: false,
            chat_prompt: None,
            short_help: bindings.short_help.clone(),
            long_help: bindings.long_help.clone(),
        };
        Self {
            display,
            sink,
            bindings,
            message_log,
            state,
        }
    }

    /// The session state.
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The display.
    pub const fn display(&self) -> &D {
        &self.display
    }

    /// The outbound half of the transport.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Announce ourselves to the server.
    pub fn join(&mut self, name: &str) -> Result<()> {
        let message = ClientMessage::name(name)?;
        info!(name, "joining");
        self.sink.send(&message)
    }

    /// Run the dispatch loop until the session closes.
    ///
    /// Returns the close message on a normal close, or the fatal condition
    /// that ended the session (a producer error, or `Interrupted`).
    pub fn run(&mut self, events: &EventReceiver) -> Result<Option<String>> {
        while self.state.keep_alive {
            self.display.update()?;
            self.dispatch(events.pop())?;
        }
        info!(reason = ?self.state.close_message, "session closed");
        Ok(self.state.close_message.clone())
    }

    /// Route one event.
    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Message(message) => self.update(message),
            Event::Input(key) => {
                if key.is_interrupt() {
                    return Err(ClientError::Interrupted);
                }
                self.on_input(key);
            }
            Event::Error(error) => {
                warn!(%error, "producer failed");
                return Err(error);
            }
            Event::Resize(info) => {
                debug!(?info, "terminal resized");
                self.display.update_size()?;
            }
        }
        Ok(())
    }

    /// Apply one server message; `None` means the server closed the connection.
    pub fn update(&mut self, message: Option<ServerMessage>) {
        let Some(message) = message else {
            self.close(Some(CONNECTION_CLOSED.to_string()));
            return;
        };
        match message {
            ServerMessage::Error {
                kind: ErrorKind::NameTaken,
                ..
            } => self.close(Some("error: name is already taken".to_string())),
            ServerMessage::Error {
                kind: ErrorKind::InvalidName,
                description,
            } => self.close(Some(format!("Invalid name error: {description}"))),
            ServerMessage::Error { kind, description } => self.log(&format!("{kind}: {description}"), None),
            ServerMessage::Message { text, kind } => self.log(&text, kind.as_deref()),
            ServerMessage::World(updates) => {
                for update in &updates {
                    self.handle_world_update(update);
                }
            }
        }
    }

    /// End the session after the current event.
    pub fn close(&mut self, message: Option<String>) {
        self.state.keep_alive = false;
        self.state.close_message = message;
    }

    /// Show a line in the message log and append it to the log file.
    pub fn log(&mut self, text: &str, kind: Option<&str>) {
        self.display.add_message(text, kind);
        self.message_log.append(text, kind);
    }
}
