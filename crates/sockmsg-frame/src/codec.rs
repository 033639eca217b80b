use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: continuation flag (1) + body length (4) = 5 bytes.
pub const HEADER_SIZE: usize = 5;

/// Maximum body bytes carried by a single frame.
pub const MAX_BODY: usize = 1019;

/// Largest possible frame on the wire (header + full body).
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_BODY;

const FLAG_LAST: u8 = 0x00;
const FLAG_MORE: u8 = 0x01;

/// A decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// More frames follow for the same message.
    pub more: bool,
    /// Number of body bytes that follow this header.
    pub body_len: u32,
}

impl Header {
    /// Body length as a buffer index.
    pub fn body_len(&self) -> usize {
        self.body_len as usize
    }

    /// The total wire size of the frame this header introduces.
    pub fn frame_size(&self) -> usize {
        HEADER_SIZE + self.body_len()
    }
}

/// Encode a frame header.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────────┬──────────────────┐
/// │ Flag     │ Body length  │ Body             │
/// │ (1B)     │ (4B BE)      │ (length bytes)   │
/// │ 0 or 1   │ 0..=1019     │                  │
/// └──────────┴──────────────┴──────────────────┘
/// ```
pub fn encode_header(more: bool, body_len: u32) -> [u8; HEADER_SIZE] {
    debug_assert!(body_len as usize <= MAX_BODY);
    let mut out = [0u8; HEADER_SIZE];
    out[0] = if more { FLAG_MORE } else { FLAG_LAST };
    out[1..].copy_from_slice(&body_len.to_be_bytes());
    out
}

/// Decode a frame header.
///
/// Fails with [`FrameError::CorruptedFrame`] when the flag byte is not 0 or 1,
/// or the declared body length exceeds [`MAX_BODY`].
pub fn decode_header(src: &[u8; HEADER_SIZE]) -> Result<Header> {
    let more = match src[0] {
        FLAG_LAST => false,
        FLAG_MORE => true,
        other => {
            return Err(FrameError::CorruptedFrame(format!(
                "invalid continuation flag {other:#04x}"
            )))
        }
    };

    let body_len = u32::from_be_bytes([src[1], src[2], src[3], src[4]]);
    if body_len as usize > MAX_BODY {
        return Err(FrameError::CorruptedFrame(format!(
            "body length {body_len} exceeds maximum {MAX_BODY}"
        )));
    }

    Ok(Header { more, body_len })
}

/// Append one complete frame (header + body) to `dst`.
pub fn encode_frame(more: bool, body: &[u8], dst: &mut BytesMut) -> Result<()> {
    if body.len() > MAX_BODY {
        return Err(FrameError::InvalidArgument("frame body exceeds MAX_BODY"));
    }
    dst.reserve(HEADER_SIZE + body.len());
    dst.put_u8(if more { FLAG_MORE } else { FLAG_LAST });
    dst.put_u32(body.len() as u32);
    dst.put_slice(body);
    Ok(())
}

/// Number of frames needed to carry a message of `len` bytes.
pub fn frame_count(len: usize) -> usize {
    len.div_ceil(MAX_BODY)
}

/// Configuration for message readers and writers.
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    /// Upper bound on a reassembled message. Default: unbounded.
    pub max_message_size: Option<usize>,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}
