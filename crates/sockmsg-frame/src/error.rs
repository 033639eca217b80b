/// Errors that can occur while sending or receiving framed messages.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The caller passed an argument the operation cannot accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The peer closed the connection cleanly, between or inside frames.
    #[error("peer disconnected")]
    Disconnected,

    /// A frame on the wire violates the format.
    #[error("corrupted frame: {0}")]
    CorruptedFrame(String),

    /// The reassembled message exceeds the configured maximum size.
    #[error("message too large ({size} bytes, max {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// The message storage was already released.
    #[error("message already released")]
    Released,

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;

impl FrameError {
    /// Classify an I/O error raised mid-transfer.
    ///
    /// A reset, aborted or broken connection means the peer went away and is
    /// reported as [`FrameError::Disconnected`]; anything else stays an I/O error.
    pub(crate) fn from_io(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => {
                FrameError::Disconnected
            }
            _ => FrameError::Io(err),
        }
    }
}

impl From<sockmsg_transport::TransportError> for FrameError {
    fn from(err: sockmsg_transport::TransportError) -> Self {
        use sockmsg_transport::TransportError;

        match err {
            TransportError::Io(io) | TransportError::Accept(io) => FrameError::Io(io),
            TransportError::Resolution { source, .. }
            | TransportError::Bind { source, .. }
            | TransportError::Listen { source, .. }
            | TransportError::Connect { source, .. } => FrameError::Io(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Error, ErrorKind};

    use super::*;

    #[test]
    fn peer_loss_maps_to_disconnected() {
        for kind in [
            ErrorKind::BrokenPipe,
            ErrorKind::ConnectionReset,
            ErrorKind::ConnectionAborted,
        ] {
            assert!(matches!(
                FrameError::from_io(Error::from(kind)),
                FrameError::Disconnected
            ));
        }
    }

    #[test]
    fn other_io_stays_io() {
        let err = FrameError::from_io(Error::from(ErrorKind::TimedOut));
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::TimedOut));
    }
}
