//! Fragmenting message framing over byte streams.
//!
//! This is the core of sockmsg. A message of any non-zero length is split into
//! frames of at most [`MAX_BODY`] payload bytes. Every frame carries:
//! - A 1-byte continuation flag (1 = more frames follow for this message)
//! - A 4-byte big-endian body length
//!
//! The receiver concatenates frame bodies until it sees a frame with the flag
//! cleared, then hands back the whole [`Message`]. Partial reads and writes are
//! completed internally; callers only ever see whole messages or an error.

pub mod codec;
pub mod error;
pub mod message;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_header, encode_frame, encode_header, frame_count, Header, StreamConfig, HEADER_SIZE,
    MAX_BODY, MAX_FRAME_SIZE,
};
pub use error::{FrameError, Result};
pub use message::Message;
pub use reader::{receive, MessageReader};
pub use writer::{send, MessageWriter};
