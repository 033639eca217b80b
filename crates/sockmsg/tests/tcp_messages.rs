use std::io::Write;
use std::thread;
use std::time::Duration;

use sockmsg::frame::{FrameError, MAX_BODY};
use sockmsg::transport::{ConnectConfig, ListenerConfig, TransportError};
use sockmsg::{
    accept, connect, create_server, receive, send, Listener, MessageReader, MessageWriter,
};

fn server() -> (Listener, u16) {
    let listener = create_server(0).expect("server should bind");
    let port = listener.local_addr().port();
    (listener, port)
}

#[test]
fn echo_roundtrip_across_frame_boundaries() {
    let (listener, port) = server();

    let echo = thread::spawn(move || {
        let conn = accept(&listener).expect("server should accept");
        let mut writer = MessageWriter::new(conn.try_clone().expect("clone should work"));
        let mut reader = MessageReader::new(conn);
        loop {
            match reader.receive() {
                Ok(msg) => {
                    writer.send(msg.as_bytes()).expect("echo should send");
                }
                Err(FrameError::Disconnected) => break,
                Err(err) => panic!("unexpected receive error: {err}"),
            }
        }
    });

    let mut conn = connect("127.0.0.1", port).expect("client should connect");
    for len in [1, 2, MAX_BODY - 1, MAX_BODY, MAX_BODY + 1, 2 * MAX_BODY, 4999, 5000] {
        let payload: Vec<u8> = (0..len).map(|i| (i * 7 + len) as u8).collect();
        assert_eq!(send(&mut conn, &payload).expect("send should work"), len);

        let reply = receive(&mut conn).expect("reply should arrive");
        assert_eq!(reply.len(), len);
        assert_eq!(reply.as_bytes(), payload.as_slice());
    }

    conn.disconnect().expect("disconnect should work");
    echo.join().expect("echo thread should finish");
}

#[test]
fn corrupted_header_over_tcp() {
    let (listener, port) = server();

    let client = thread::spawn(move || {
        let mut conn = connect("127.0.0.1", port).expect("client should connect");
        // flag 0, body length 2000
        conn.write_all(&[0x00, 0x00, 0x00, 0x07, 0xD0]).unwrap();
        conn.write_all(&[0u8; 64]).unwrap();
        conn
    });

    let mut conn = accept(&listener).expect("server should accept");
    let err = receive(&mut conn).expect_err("oversized body must be rejected");
    assert!(matches!(err, FrameError::CorruptedFrame(_)));
    let _client = client.join().unwrap();
}

#[test]
fn empty_send_writes_nothing() {
    let (listener, port) = server();

    let client = thread::spawn(move || {
        let mut conn = connect("127.0.0.1", port).expect("client should connect");
        let err = send(&mut conn, &[]).expect_err("empty send must fail");
        assert!(matches!(err, FrameError::InvalidArgument(_)));
        conn.disconnect().unwrap();
    });

    let mut conn = accept(&listener).expect("server should accept");
    client.join().unwrap();
    let err = receive(&mut conn).expect_err("nothing was sent");
    assert!(matches!(err, FrameError::Disconnected));
}

#[test]
fn send_to_closed_peer_fails_cleanly() {
    let (listener, port) = server();

    let accepted = thread::spawn(move || {
        let conn = accept(&listener).expect("server should accept");
        conn.disconnect().unwrap();
        drop(conn);
    });

    let mut conn = connect("127.0.0.1", port).expect("client should connect");
    accepted.join().unwrap();
    thread::sleep(Duration::from_millis(50));

    let payload = vec![0xEE; 64 * 1024];
    let mut result = Ok(0);
    for _ in 0..64 {
        result = send(&mut conn, &payload);
        if result.is_err() {
            break;
        }
    }
    let err = result.expect_err("writing to a closed peer must eventually fail");
    assert!(matches!(err, FrameError::Disconnected | FrameError::Io(_)));
}

#[test]
fn released_message_cannot_be_released_again() {
    let (listener, port) = server();

    let client = thread::spawn(move || {
        let mut conn = connect("127.0.0.1", port).expect("client should connect");
        send(&mut conn, b"release me").unwrap();
    });

    let mut conn = accept(&listener).expect("server should accept");
    let mut msg = receive(&mut conn).expect("message should arrive");
    client.join().unwrap();

    assert_eq!(msg.as_bytes(), b"release me");
    msg.release().expect("first release succeeds");
    assert!(matches!(msg.release(), Err(FrameError::Released)));
}

#[test]
fn setup_failures_are_typed() {
    let port = {
        let (listener, port) = server();
        drop(listener);
        port
    };
    let err = connect("127.0.0.1", port).expect_err("nobody listens there");
    assert!(matches!(err, TransportError::Connect { .. }));

    let err = connect("host name with spaces", port).expect_err("cannot resolve");
    assert!(matches!(err, TransportError::Resolution { .. }));

    let (_held, port) = server();
    let cfg = ListenerConfig {
        reuse_address: false,
        ..ListenerConfig::default()
    };
    let err = Listener::bind_with_config(port, &cfg).expect_err("port is taken");
    assert!(matches!(err, TransportError::Bind { .. }));
}

#[test]
fn facade_error_wraps_both_layers() {
    fn exchange(port: u16) -> sockmsg::Result<Vec<u8>> {
        let cfg = ConnectConfig {
            timeout: Some(Duration::from_secs(2)),
            nodelay: true,
        };
        let mut conn = sockmsg::transport::connect_with_config("127.0.0.1", port, &cfg)?;
        send(&mut conn, b"ping")?;
        Ok(receive(&mut conn)?.as_bytes().to_vec())
    }

    let (listener, port) = server();
    let peer = thread::spawn(move || {
        let mut conn = accept(&listener).unwrap();
        let msg = receive(&mut conn).unwrap();
        send(&mut conn, msg.as_bytes()).unwrap();
        conn.disconnect().unwrap();
    });

    assert_eq!(exchange(port).unwrap(), b"ping");
    peer.join().unwrap();

    let err = exchange(port).unwrap_err();
    assert!(matches!(err, sockmsg::Error::Transport(_)));
}
