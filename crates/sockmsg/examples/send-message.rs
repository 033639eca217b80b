//! Send one message and print the reply.
//!
//! Usage:
//!   send-message <host> <port> [payload]
//!
//! Without a payload argument, the message is read from stdin.

use std::io::{Read, Write};

use sockmsg::logging::{init_logging, LogFormat, LogLevel};
use sockmsg::{connect, receive, send};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogFormat::Text, LogLevel::Warn);

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port: u16 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 7878,
    };

    let payload = match args.next() {
        Some(text) => text.into_bytes(),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let mut conn = connect(&host, port)?;
    let sent = send(&mut conn, &payload)?;
    eprintln!("Sent {sent} bytes to {}", conn.peer_addr()?);

    let mut reply = receive(&mut conn)?;
    std::io::stdout().write_all(reply.as_bytes())?;
    reply.release()?;

    conn.disconnect()?;
    Ok(())
}
