//! Error types shared by the producers, the transport and the dispatch loop.

use std::io;
use thiserror::Error;

/// A message from the server that could not be decoded.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame was not valid JSON.
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON value did not have the expected shape.
    #[error("unexpected message shape: {0}")]
    Shape(String),

    /// The message kind tag is not one this client understands.
    #[error("unknown message kind {0:?}")]
    UnknownKind(String),
}

/// Every failure the client can surface.
///
/// Producer-side variants (`Io`, `Transport`, `Input`, `Protocol`) travel
/// through the event channel and end the session when popped.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Underlying I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The connection to the server failed.
    #[error("connection error: {0}")]
    Transport(String),

    /// Reading raw input from the terminal failed.
    #[error("input error: {0}")]
    Input(String),

    /// The server sent something we could not decode.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The user pressed Ctrl+C.
    #[error("interrupted")]
    Interrupted,

    /// A producer thread panicked.
    #[error("{0} stopped unexpectedly")]
    ProducerPanicked(String),

    /// Every producer dropped its channel handle.
    #[error("all event sources have stopped")]
    ChannelClosed,

    /// Bad configuration or command line.
    #[error("configuration error: {0}")]
    Config(String),

    /// An outbound message failed validation.
    #[error("{0}")]
    InvalidMessage(String),
}

impl ClientError {
    /// Process exit code for a session that ended with this error.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Interrupted => 130,
            _ => 1,
        }
    }
}

/// Shorthand result type.
pub type Result<T> = std::result::Result<T, ClientError>;
