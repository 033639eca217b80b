use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use sockmsg_transport::Connection;
use tracing::{debug, trace};

use crate::codec::{encode_frame, frame_count, StreamConfig, MAX_BODY, MAX_FRAME_SIZE};
use crate::error::{FrameError, Result};

/// Fragment `data` into frames and write them to `stream` (blocking).
///
/// Returns the number of body bytes written, which is always `data.len()`.
/// The frame buffer lives for this call only.
pub fn send<W: Write>(stream: &mut W, data: &[u8]) -> Result<usize> {
    let mut buf = BytesMut::with_capacity(MAX_FRAME_SIZE);
    send_frames(stream, &mut buf, data)
}

/// Writes whole messages, fragmented into frames, to any `Write` stream.
pub struct MessageWriter<T> {
    inner: T,
    buf: BytesMut,
    config: StreamConfig,
}

impl<T: Write> MessageWriter<T> {
    /// Create a new message writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, StreamConfig::default())
    }

    /// Create a new message writer with explicit configuration.
    pub fn with_config(inner: T, config: StreamConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MAX_FRAME_SIZE),
            config,
        }
    }

    /// Send a complete message and flush the stream.
    ///
    /// Returns the number of body bytes written.
    pub fn send(&mut self, data: &[u8]) -> Result<usize> {
        if let Some(max) = self.config.max_message_size {
            if data.len() > max {
                return Err(FrameError::MessageTooLarge {
                    size: data.len(),
                    max,
                });
            }
        }

        let sent = send_frames(&mut self.inner, &mut self.buf, data)?;
        self.flush()?;
        Ok(sent)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::from_io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current writer configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }
}

impl MessageWriter<Connection> {
    /// Create a writer for a `Connection` and apply the write timeout from config.
    pub fn with_config_conn(inner: Connection, config: StreamConfig) -> Result<Self> {
        inner.set_write_timeout(config.write_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}

fn send_frames<W: Write>(stream: &mut W, buf: &mut BytesMut, data: &[u8]) -> Result<usize> {
    if data.is_empty() {
        return Err(FrameError::InvalidArgument("cannot send an empty message"));
    }

    let frames = frame_count(data.len());
    let mut sent = 0usize;

    for (index, chunk) in data.chunks(MAX_BODY).enumerate() {
        let more = index + 1 < frames;

        buf.clear();
        encode_frame(more, chunk, buf)?;
        write_frame(stream, &buf[..])?;

        sent += chunk.len();
        trace!(frame = index, body_len = chunk.len(), more, "frame written");
    }

    debug!(len = sent, frames, "message sent");
    Ok(sent)
}

/// Write one encoded frame, retrying short writes until every byte is out.
fn write_frame<W: Write>(stream: &mut W, frame: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < frame.len() {
        match stream.write(&frame[offset..]) {
            Ok(0) => return Err(FrameError::Disconnected),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::from_io(err)),
        }
    }
    Ok(())
}
