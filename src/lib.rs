//! # battilde-client
//!
//! Terminal client for the battilde multiplayer roguelike.
//!
//! The client merges three independent event sources into one sequential
//! dispatch loop:
//!
//! - **Listener**: decoded messages from the server connection
//! - **Input Reader**: raw key presses
//! - **Resize Notifier**: terminal-resize signals
//!
//! All three push into a single unbounded [`producer::EventReceiver`]
//! channel. The [`Client`] dispatch loop is the only consumer and the only
//! owner of session state, so nothing outside the channel is shared between
//! threads.
//!
//! ## Example
//!
//! ```rust,ignore
//! use battilde_client::{channel, Client, Keybindings, Listener, MessageLog, RecordingDisplay};
//!
//! let (events, receiver) = channel();
//! let mut client = Client::new(RecordingDisplay::new(), sink, Keybindings::default(), MessageLog::default());
//! Listener::spawn(source, events.clone())?;
//! let close_message = client.run(&receiver)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod bindings;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod producer;
pub mod protocol;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use bindings::{Action, Keybindings};
pub use config::{Address, ClientConfig};
pub use display::{Display, RecordingDisplay, TerminalDisplay};
pub use error::{ClientError, ProtocolError, Result};
pub use logging::MessageLog;
pub use producer::{channel, Event, EventReceiver, EventSender, InputReader, Key, Listener, ResizeNotifier};
pub use protocol::{ClientMessage, ServerMessage, WorldUpdate};
pub use session::{Client, SessionState};
pub use transport::{MessageSink, MessageSource};
