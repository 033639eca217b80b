use std::fmt;
use std::io::{ErrorKind, Read};

use sockmsg_transport::Connection;
use tracing::{debug, trace, warn};

use crate::codec::{decode_header, StreamConfig, HEADER_SIZE, MAX_BODY};
use crate::error::{FrameError, Result};
use crate::message::Message;

/// Read frames from `stream` until one complete message has been reassembled (blocking).
///
/// The frame buffer lives for this call only.
pub fn receive<R: Read>(stream: &mut R) -> Result<Message> {
    let mut frame = FrameBuf::new();
    receive_message(stream, &mut frame, None)
}

/// Reads whole messages from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete messages.
pub struct MessageReader<T> {
    inner: T,
    frame: FrameBuf,
    config: StreamConfig,
}

impl<T: Read> MessageReader<T> {
    /// Create a new message reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, StreamConfig::default())
    }

    /// Create a new message reader with explicit configuration.
    pub fn with_config(inner: T, config: StreamConfig) -> Self {
        Self {
            inner,
            frame: FrameBuf::new(),
            config,
        }
    }

    /// Read the next complete message (blocking).
    ///
    /// Returns `Err(FrameError::Disconnected)` when the peer closes the
    /// connection on a frame boundary.
    pub fn receive(&mut self) -> Result<Message> {
        receive_message(&mut self.inner, &mut self.frame, self.config.max_message_size)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update the maximum reassembled message size for subsequent reads.
    pub fn set_max_message_size(&mut self, max_message_size: Option<usize>) {
        self.config.max_message_size = max_message_size;
    }

    /// Current reader configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }
}

impl MessageReader<Connection> {
    /// Create a reader for a `Connection` and apply the read timeout from config.
    pub fn with_config_conn(inner: Connection, config: StreamConfig) -> Result<Self> {
        inner.set_read_timeout(config.read_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}

/// Scratch space for one frame: header plus the largest possible body.
struct FrameBuf {
    header: [u8; HEADER_SIZE],
    body: [u8; MAX_BODY],
}

impl FrameBuf {
    fn new() -> Self {
        Self {
            header: [0u8; HEADER_SIZE],
            body: [0u8; MAX_BODY],
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Header,
    Body,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Header => f.write_str("header"),
            Phase::Body => f.write_str("body"),
        }
    }
}

fn receive_message<R: Read>(
    stream: &mut R,
    frame: &mut FrameBuf,
    max_message_size: Option<usize>,
) -> Result<Message> {
    // Dropped on every error path, so a partial message never escapes.
    let mut message = Message::empty();

    loop {
        read_phase(stream, &mut frame.header, Phase::Header)?;
        let header = decode_header(&frame.header).inspect_err(|err| {
            warn!(error = %err, received = message.len(), "rejecting frame header");
        })?;

        if let Some(max) = max_message_size {
            let size = message.len() + header.body_len();
            if size > max {
                warn!(size, max, "message exceeds configured maximum");
                return Err(FrameError::MessageTooLarge { size, max });
            }
        }

        let body = &mut frame.body[..header.body_len()];
        read_phase(stream, body, Phase::Body)?;
        message.append(body);

        trace!(
            frame = message.frames(),
            body_len = header.body_len,
            more = header.more,
            "frame read"
        );

        if !header.more {
            debug!(len = message.len(), frames = message.frames(), "message received");
            return Ok(message);
        }
    }
}

/// Fill `buf` completely, mapping a short fill to the right failure.
///
/// Nothing read before EOF means the peer went away cleanly. Some but not all
/// of the bytes means the frame was cut off and cannot be trusted.
fn read_phase<R: Read>(stream: &mut R, buf: &mut [u8], phase: Phase) -> Result<()> {
    let filled = fill(stream, buf)?;
    if filled == buf.len() {
        return Ok(());
    }

    if filled == 0 {
        debug!(%phase, "peer disconnected");
        return Err(FrameError::Disconnected);
    }

    warn!(%phase, expected = buf.len(), received = filled, "truncated frame");
    Err(FrameError::CorruptedFrame(format!(
        "truncated {phase}: received {filled} of {} bytes",
        buf.len()
    )))
}

/// Read until `buf` is full or the stream reports end-of-file.
fn fill<R: Read>(stream: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::from_io(err)),
        }
    }
    Ok(filled)
}
