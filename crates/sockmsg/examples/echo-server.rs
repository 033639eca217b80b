//! Echo server: accepts peers and sends every message straight back.
//!
//! Run with:
//!   cargo run -p sockmsg --example echo-server --features logging -- 7878
//!
//! In another terminal:
//!   cargo run -p sockmsg --example send-message --features logging -- 127.0.0.1 7878 hello

use std::thread;

use sockmsg::logging::{init_logging, LogFormat, LogLevel};
use sockmsg::{create_server, Connection, MessageReader, MessageWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let level = std::env::var("SOCKMSG_LOG")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(LogLevel::Info);
    init_logging(LogFormat::Text, level);

    let port: u16 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 7878,
    };

    let listener = create_server(port)?;
    eprintln!("Listening on {}", listener.local_addr());

    // One thread per peer; connections share nothing.
    loop {
        let conn = listener.accept()?;
        thread::spawn(move || {
            if let Err(err) = echo(conn) {
                tracing::warn!(error = %err, "echo session failed");
            }
        });
    }
}

fn echo(conn: Connection) -> sockmsg::Result<()> {
    let peer = conn.peer_addr()?;
    let mut writer = MessageWriter::new(conn.try_clone()?);
    let mut reader = MessageReader::new(conn);

    loop {
        let message = match reader.receive() {
            Ok(message) => message,
            Err(sockmsg::frame::FrameError::Disconnected) => {
                tracing::info!(%peer, "peer disconnected");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(%peer, size = message.len(), frames = message.frames(), "echoing message");
        writer.send(message.as_bytes())?;
    }
}
