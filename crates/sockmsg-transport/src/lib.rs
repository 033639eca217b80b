//! TCP connection setup for sockmsg.
//!
//! Provides the three blocking setup primitives the framing layer needs:
//! - [`create_server`] binds a listening endpoint on all interfaces
//! - [`accept`] waits for one inbound connection
//! - [`connect`] resolves and dials a remote endpoint
//!
//! This is the lowest layer of sockmsg. It knows nothing about framing; everything
//! else builds on the [`Connection`] type provided here.

pub mod config;
pub mod connection;
pub mod connector;
pub mod error;
pub mod listener;

pub use config::{ConnectConfig, ListenerConfig};
pub use connection::Connection;
pub use connector::{accept, connect, connect_with_config, create_server};
pub use error::{Result, TransportError};
pub use listener::Listener;
