//! Length-prefixed JSON frames over a byte stream.
//!
//! Each frame is a 4-byte big-endian length followed by that many bytes of
//! UTF-8 JSON.

use super::{MessageSink, MessageSource};
use crate::config::Address;
use crate::error::{ClientError, ProtocolError, Result};
use crate::protocol::{ClientMessage, ServerMessage};
use std::io::{self, ErrorKind, Read, Write};
use std::net::TcpStream;
use std::ops::ControlFlow;
use tracing::{debug, info, trace, warn};

/// Largest frame we accept from the server.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Open a connection and split it into read and write halves.
pub fn connect(
    address: &Address,
) -> Result<(FramedReader<Box<dyn Read + Send>>, FramedWriter<Box<dyn Write + Send>>)> {
    info!(%address, "connecting");
    match address {
        Address::Tcp(host) => {
            let stream = TcpStream::connect(host.as_str())
                .map_err(|e| ClientError::Transport(format!("cannot connect to {host}: {e}")))?;
            stream.set_nodelay(true)?;
            let writer: Box<dyn Write + Send> = Box::new(stream.try_clone()?);
            let reader: Box<dyn Read + Send> = Box::new(stream);
            Ok((FramedReader::new(reader), FramedWriter::new(writer)))
        }
        #[cfg(unix)]
        Address::Unix(path) => {
            let stream = std::os::unix::net::UnixStream::connect(path)
                .map_err(|e| ClientError::Transport(format!("cannot connect to {}: {e}", path.display())))?;
            let writer: Box<dyn Write + Send> = Box::new(stream.try_clone()?);
            let reader: Box<dyn Read + Send> = Box::new(stream);
            Ok((FramedReader::new(reader), FramedWriter::new(writer)))
        }
        #[cfg(not(unix))]
        Address::Unix(path) => Err(ClientError::Config(format!(
            "unix sockets are not supported on this platform: {}",
            path.display()
        ))),
        #[cfg(target_os = "linux")]
        Address::Abstract(name) => {
            use std::os::linux::net::SocketAddrExt;
            use std::os::unix::net::{SocketAddr, UnixStream};

            let addr = SocketAddr::from_abstract_name(name.as_bytes())?;
            let stream = UnixStream::connect_addr(&addr)
                .map_err(|e| ClientError::Transport(format!("cannot connect to abstract:{name}: {e}")))?;
            let writer: Box<dyn Write + Send> = Box::new(stream.try_clone()?);
            let reader: Box<dyn Read + Send> = Box::new(stream);
            Ok((FramedReader::new(reader), FramedWriter::new(writer)))
        }
        #[cfg(not(target_os = "linux"))]
        Address::Abstract(name) => Err(ClientError::Config(format!(
            "abstract sockets are only supported on Linux: {name}"
        ))),
    }
}

/// Read half: decodes frames into [`ServerMessage`]s.
#[derive(Debug)]
pub struct FramedReader<R> {
    inner: R,
}

impl<R: Read> FramedReader<R> {
    /// Wrap a byte stream.
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read one frame body.
    ///
    /// Returns `Ok(None)` on end-of-stream at a frame boundary.
    pub fn read_frame(&mut self) -> io::Result<Option<String>> {
        let mut header = [0u8; 4];
        let mut filled = 0;
        while filled < header.len() {
            match self.inner.read(&mut header[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => return Err(io::Error::new(ErrorKind::UnexpectedEof, "connection closed mid-header")),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }

        let len = u32::from_be_bytes(header) as usize;
        if len > MAX_FRAME_LEN {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("frame of {len} bytes exceeds limit of {MAX_FRAME_LEN}"),
            ));
        }

        let mut body = vec![0u8; len];
        self.inner.read_exact(&mut body)?;
        String::from_utf8(body)
            .map(Some)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))
    }
}

impl<R: Read> MessageSource for FramedReader<R> {
    fn listen(
        &mut self,
        on_message: &mut dyn FnMut(Option<ServerMessage>) -> ControlFlow<()>,
        on_error: &mut dyn FnMut(ClientError),
    ) {
        loop {
            let text = match self.read_frame() {
                Ok(Some(text)) => text,
                Ok(None) => {
                    debug!("server closed the connection");
                    let _ = on_message(None);
                    return;
                }
                Err(e) => {
                    on_error(ClientError::Transport(e.to_string()));
                    return;
                }
            };
            trace!(len = text.len(), "frame received");

            match ServerMessage::from_json(&text) {
                Ok(message) => {
                    if on_message(Some(message)).is_break() {
                        return;
                    }
                }
                Err(ProtocolError::UnknownKind(kind)) => {
                    warn!(kind = %kind, "skipping message of unknown kind");
                }
                Err(e) => {
                    on_error(e.into());
                    return;
                }
            }
        }
    }
}

/// Write half: encodes [`ClientMessage`]s into frames.
#[derive(Debug)]
pub struct FramedWriter<W> {
    inner: W,
}

impl<W: Write> FramedWriter<W> {
    /// Wrap a byte stream.
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one frame body.
    pub fn write_frame(&mut self, body: &str) -> io::Result<()> {
        let len = u32::try_from(body.len())
            .map_err(|_| io::Error::new(ErrorKind::InvalidInput, "frame too large"))?;
        // One buffer, one write.
        let mut frame = Vec::with_capacity(4 + body.len());
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(body.as_bytes());
        self.inner.write_all(&frame)?;
        self.inner.flush()
    }

    /// The wrapped stream.
    pub const fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> MessageSink for FramedWriter<W> {
    fn send(&mut self, message: &ClientMessage) -> Result<()> {
        let body = message.to_json();
        trace!(body = %body, "sending");
        self.write_frame(&body)
            .map_err(|e| ClientError::Transport(e.to_string()))
    }
}
