use std::net::{SocketAddr, TcpListener};

use tracing::{debug, info};

use crate::config::ListenerConfig;
use crate::connection::Connection;
use crate::error::{Result, TransportError};

/// A listening TCP endpoint bound to every local IPv4 interface.
///
/// The socket is built by hand so that address reuse and the backlog can be
/// set before `listen`, and so a failing `bind` and a failing `listen` are
/// reported as distinct errors.
pub struct Listener {
    listener: TcpListener,
    addr: SocketAddr,
}

impl Listener {
    /// Bind and listen on `0.0.0.0:port` with default options.
    ///
    /// Pass port 0 to let the OS choose; [`Listener::local_addr`] reports it.
    pub fn bind(port: u16) -> Result<Self> {
        Self::bind_with_config(port, &ListenerConfig::default())
    }

    /// Bind and listen on `0.0.0.0:port` with explicit options.
    pub fn bind_with_config(port: u16, config: &ListenerConfig) -> Result<Self> {
        let listener = bind_any(port, config)?;
        let addr = listener.local_addr()?;

        info!(%addr, backlog = config.backlog, "listening on tcp socket");

        Ok(Self { listener, addr })
    }

    /// Accept an incoming connection (blocking).
    pub fn accept(&self) -> Result<Connection> {
        let (stream, peer) = self.listener.accept().map_err(TransportError::Accept)?;
        debug!(%peer, local = %self.addr, "accepted connection");
        Ok(Connection::from_tcp(stream))
    }

    /// The address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener").field("addr", &self.addr).finish()
    }
}

#[cfg(unix)]
fn bind_any(port: u16, config: &ListenerConfig) -> Result<TcpListener> {
    use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

    let addr = format!("0.0.0.0:{port}");
    let bind_err = |source| TransportError::Bind {
        addr: addr.clone(),
        source,
    };

    #[cfg(target_os = "linux")]
    let sock_type = libc::SOCK_STREAM | libc::SOCK_CLOEXEC;
    #[cfg(not(target_os = "linux"))]
    let sock_type = libc::SOCK_STREAM;

    // SAFETY: socket(2) takes no pointers; the return value is checked below.
    let raw = unsafe { libc::socket(libc::AF_INET, sock_type, 0) };
    if raw < 0 {
        return Err(bind_err(std::io::Error::last_os_error()));
    }
    // SAFETY: `raw` is a freshly created descriptor that nothing else owns.
    let fd = unsafe { OwnedFd::from_raw_fd(raw) };

    if config.reuse_address {
        let enable: libc::c_int = 1;
        // SAFETY: `enable` outlives the call and the length matches its type.
        let rc = unsafe {
            libc::setsockopt(
                fd.as_raw_fd(),
                libc::SOL_SOCKET,
                libc::SO_REUSEADDR,
                (&enable as *const libc::c_int).cast::<libc::c_void>(),
                std::mem::size_of::<libc::c_int>() as libc::socklen_t,
            )
        };
        if rc != 0 {
            return Err(bind_err(std::io::Error::last_os_error()));
        }
    }

    // SAFETY: sockaddr_in is plain old data; all-zero is a valid starting value.
    let mut sin: libc::sockaddr_in = unsafe { std::mem::zeroed() };
    sin.sin_family = libc::AF_INET as libc::sa_family_t;
    sin.sin_port = port.to_be();
    sin.sin_addr = libc::in_addr {
        s_addr: libc::INADDR_ANY.to_be(),
    };
    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))]
    {
        sin.sin_len = std::mem::size_of::<libc::sockaddr_in>() as u8;
    }

    // SAFETY: `sin` is a fully initialised sockaddr_in and the length matches it.
    let rc = unsafe {
        libc::bind(
            fd.as_raw_fd(),
            (&sin as *const libc::sockaddr_in).cast::<libc::sockaddr>(),
            std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
        )
    };
    if rc != 0 {
        return Err(bind_err(std::io::Error::last_os_error()));
    }

    // SAFETY: listen(2) takes no pointers; `fd` is a bound stream socket.
    let rc = unsafe { libc::listen(fd.as_raw_fd(), config.backlog) };
    if rc != 0 {
        return Err(TransportError::Listen {
            addr,
            source: std::io::Error::last_os_error(),
        });
    }

    Ok(TcpListener::from(fd))
}

#[cfg(not(unix))]
fn bind_any(port: u16, _config: &ListenerConfig) -> Result<TcpListener> {
    TcpListener::bind(("0.0.0.0", port)).map_err(|source| TransportError::Bind {
        addr: format!("0.0.0.0:{port}"),
        source,
    })
}
