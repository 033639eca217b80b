use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use tracing::debug;

use crate::error::Result;

/// A connected TCP byte stream. Implements Read + Write.
///
/// This is the handle returned by [`connect`](crate::connect) and
/// [`accept`](crate::accept). Reads may return fewer bytes than requested and
/// return 0 once the peer has shut down its side.
pub struct Connection {
    stream: TcpStream,
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.stream.flush()
    }
}

impl Connection {
    pub(crate) fn from_tcp(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Address of the remote peer.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.stream.peer_addr().map_err(Into::into)
    }

    /// Local address of this end of the connection.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.stream.local_addr().map_err(Into::into)
    }

    /// Set read timeout on the underlying stream.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_read_timeout(timeout).map_err(Into::into)
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_write_timeout(timeout).map_err(Into::into)
    }

    /// Enable or disable `TCP_NODELAY`.
    pub fn set_nodelay(&self, nodelay: bool) -> Result<()> {
        self.stream.set_nodelay(nodelay).map_err(Into::into)
    }

    /// Try to clone this connection (creates a new file descriptor).
    ///
    /// Both handles refer to the same socket, so one thread can receive while
    /// another sends.
    pub fn try_clone(&self) -> Result<Self> {
        let cloned = self.stream.try_clone()?;
        Ok(Self::from_tcp(cloned))
    }

    /// Shut down both directions of the connection.
    ///
    /// Any call blocked on another handle of this socket wakes up and observes
    /// end-of-stream. Shutting down a connection the peer already tore down is
    /// not an error.
    pub fn disconnect(&self) -> Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => {
                debug!(peer = ?self.stream.peer_addr().ok(), "connection shut down");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotConnected => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Consume the connection and return the inner TCP stream.
    pub fn into_inner(self) -> TcpStream {
        self.stream
    }
}

impl From<TcpStream> for Connection {
    fn from(stream: TcpStream) -> Self {
        Self::from_tcp(stream)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("peer", &self.stream.peer_addr().ok())
            .field("local", &self.stream.local_addr().ok())
            .finish()
    }
}
