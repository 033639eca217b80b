//! Length-delimited binary messages over TCP.
//!
//! sockmsg lets two endpoints exchange messages of any length over one TCP
//! connection. Each message is split into frames of at most
//! [`MAX_BODY`](frame::MAX_BODY) bytes and reassembled on the other side.
//!
//! # Crate Structure
//!
//! - [`transport`]: Connection setup (listen, accept, connect)
//! - [`frame`]: Frame codec, fragmenting sender, reassembling receiver
//! - [`logging`]: stderr `tracing` subscriber setup (behind `logging` feature)
//!
//! # Example
//!
//! ```no_run
//! use sockmsg::{connect, send};
//!
//! let mut conn = connect("127.0.0.1", 7878)?;
//! send(&mut conn, b"hello")?;
//! # Ok::<(), sockmsg::Error>(())
//! ```

pub mod error;
#[cfg(feature = "logging")]
pub mod logging;

/// Re-export transport types.
pub mod transport {
    pub use sockmsg_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use sockmsg_frame::*;
}

pub use error::{Error, Result};
pub use sockmsg_frame::{receive, send, Message, MessageReader, MessageWriter, StreamConfig};
pub use sockmsg_transport::{accept, connect, create_server, Connection, Listener};
