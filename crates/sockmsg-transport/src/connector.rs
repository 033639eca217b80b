use std::net::{TcpStream, ToSocketAddrs};

use tracing::debug;

use crate::config::{ConnectConfig, ListenerConfig};
use crate::connection::Connection;
use crate::error::{Result, TransportError};
use crate::listener::Listener;

/// Create a listening endpoint on all local interfaces.
///
/// Address reuse is enabled and the backlog is the platform maximum.
pub fn create_server(port: u16) -> Result<Listener> {
    Listener::bind_with_config(port, &ListenerConfig::default())
}

/// Block until one pending inbound connection is available.
pub fn accept(listener: &Listener) -> Result<Connection> {
    listener.accept()
}

/// Resolve `remote_ip` and connect to it.
pub fn connect(remote_ip: &str, port: u16) -> Result<Connection> {
    connect_with_config(remote_ip, port, &ConnectConfig::default())
}

/// Connect with explicit configuration.
///
/// Every resolved address is tried in order; the error from the last attempt
/// is reported if none accepts.
pub fn connect_with_config(
    remote_ip: &str,
    port: u16,
    config: &ConnectConfig,
) -> Result<Connection> {
    let target = format!("{remote_ip}:{port}");
    let addrs: Vec<_> = (remote_ip, port)
        .to_socket_addrs()
        .map_err(|source| TransportError::Resolution {
            addr: target.clone(),
            source,
        })?
        .collect();

    if addrs.is_empty() {
        return Err(TransportError::Resolution {
            addr: target,
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "address resolved to no endpoints",
            ),
        });
    }

    let mut last_err = None;
    for addr in addrs {
        let attempt = match config.timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => {
                if config.nodelay {
                    stream.set_nodelay(true)?;
                }
                debug!(%addr, "connected to tcp endpoint");
                return Ok(Connection::from_tcp(stream));
            }
            Err(err) => {
                debug!(%addr, error = %err, "connect attempt failed");
                last_err = Some(err);
            }
        }
    }

    Err(TransportError::Connect {
        addr: target,
        source: last_err.unwrap_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotConnected, "no connect attempt made")
        }),
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn create_server_connect_accept() {
        let server = create_server(0).expect("server should bind");
        let port = server.local_addr().port();

        let client = thread::spawn(move || {
            let mut conn = connect("127.0.0.1", port).expect("client should connect");
            conn.write_all(b"ping").unwrap();
            conn
        });

        let mut conn = accept(&server).expect("server should accept");
        let mut buf = [0u8; 4];
        conn.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");

        let client = client.join().unwrap();
        assert_eq!(client.peer_addr().unwrap().port(), port);
    }

    #[test]
    fn connect_resolves_host_names() {
        let server = create_server(0).expect("server should bind");
        let port = server.local_addr().port();

        let client = thread::spawn(move || connect("localhost", port));
        let _conn = accept(&server).expect("server should accept");
        assert!(client.join().unwrap().is_ok());
    }

    #[test]
    fn connect_with_timeout_and_nodelay() {
        let server = create_server(0).expect("server should bind");
        let port = server.local_addr().port();
        let cfg = ConnectConfig {
            timeout: Some(Duration::from_secs(2)),
            nodelay: true,
        };

        let client = thread::spawn(move || connect_with_config("127.0.0.1", port, &cfg));
        let _conn = accept(&server).expect("server should accept");
        assert!(client.join().unwrap().is_ok());
    }

    #[test]
    fn connect_refused_is_connect_error() {
        let port = {
            let server = create_server(0).expect("server should bind");
            server.local_addr().port()
        };

        let err = connect("127.0.0.1", port).unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
    }

    #[test]
    fn unresolvable_address_is_resolution_error() {
        let err = connect("not a valid host name", 80).unwrap_err();
        assert!(matches!(err, TransportError::Resolution { .. }));
    }
}
