use sockmsg_frame::FrameError;
use sockmsg_transport::TransportError;

/// Any error produced by sockmsg.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection setup or connection-level I/O failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Sending or receiving a message failed.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}

impl Error {
    /// Whether the peer closed the connection.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Error::Frame(FrameError::Disconnected))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
