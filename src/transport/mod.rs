//! Transport collaborator: delivers decoded server messages and sends ours.
//!
//! The transport is split in two halves so that the listener thread can
//! own the read side while the dispatch loop owns the write side.

mod framed;

pub use framed::{connect, FramedReader, FramedWriter, MAX_FRAME_LEN};

use crate::error::{ClientError, Result};
use crate::protocol::{ClientMessage, ServerMessage};
use std::ops::ControlFlow;

/// Read half of a connection.
pub trait MessageSource {
    /// Block and deliver messages until the connection ends.
    ///
    /// `on_message(None)` signals that the server closed the connection
    /// cleanly. A failure is reported once through `on_error`. Either way
    /// `listen` returns afterwards. Returning `Break` from `on_message`
    /// stops listening early.
    fn listen(
        &mut self,
        on_message: &mut dyn FnMut(Option<ServerMessage>) -> ControlFlow<()>,
        on_error: &mut dyn FnMut(ClientError),
    );
}

/// Write half of a connection.
pub trait MessageSink {
    /// Send one message.
    fn send(&mut self, message: &ClientMessage) -> Result<()>;
}

impl<S: MessageSink + ?Sized> MessageSink for Box<S> {
    fn send(&mut self, message: &ClientMessage) -> Result<()> {
        (**self).send(message)
    }
}
