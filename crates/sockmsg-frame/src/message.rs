use bytes::{Bytes, BytesMut};

use crate::codec::frame_count;
use crate::error::{FrameError, Result};

/// A complete, reassembled message.
///
/// The receiver builds a `Message` frame by frame and only hands it out once
/// the terminating frame has been read. Storage is freed when the message is
/// dropped, or earlier through [`Message::release`], which may be called once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    data: BytesMut,
    frames: usize,
    released: bool,
}

impl Message {
    pub(crate) fn empty() -> Self {
        Self {
            data: BytesMut::new(),
            frames: 0,
            released: false,
        }
    }

    /// Append one frame body to the message under construction.
    pub(crate) fn append(&mut self, body: &[u8]) {
        self.data.extend_from_slice(body);
        self.frames += 1;
    }

    /// Number of payload bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of frames this message was assembled from.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Borrow the payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutably borrow the payload.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Freeze the payload into an immutable, cheaply cloneable buffer.
    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }

    /// Take ownership of the payload buffer.
    pub fn into_bytes_mut(self) -> BytesMut {
        self.data
    }

    /// Free the payload storage now.
    ///
    /// Fails with [`FrameError::Released`] if the storage was already released.
    pub fn release(&mut self) -> Result<()> {
        if self.released {
            return Err(FrameError::Released);
        }
        self.data = BytesMut::new();
        self.released = true;
        Ok(())
    }

    /// Whether [`Message::release`] has been called.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl From<Vec<u8>> for Message {
    fn from(data: Vec<u8>) -> Self {
        let frames = frame_count(data.len());
        Self {
            data: BytesMut::from(&data[..]),
            frames,
            released: false,
        }
    }
}

impl From<&[u8]> for Message {
    fn from(data: &[u8]) -> Self {
        Self {
            data: BytesMut::from(data),
            frames: frame_count(data.len()),
            released: false,
        }
    }
}

impl AsRef<[u8]> for Message {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
