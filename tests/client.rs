//! End-to-end client behavior against an in-process chat server.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::sleep;

use tmi_client::{ClientError, Config, ConnectionState, TmiClient};

/// The server side of one accepted connection.
struct Peer {
    stream: BufReader<TcpStream>,
}

impl Peer {
    /// Read one CRLF-terminated line, terminator included.
    async fn recv_line(&mut self) -> String {
        let mut line = String::new();
        self.stream
            .read_line(&mut line)
            .await
            .expect("server read failed");
        line
    }

    async fn send_raw(&mut self, bytes: &[u8]) {
        self.stream
            .get_mut()
            .write_all(bytes)
            .await
            .expect("server write failed");
    }

    async fn expect_handshake(&mut self, token: &str, nick: &str, variant: u8) {
        assert_eq!(self.recv_line().await, format!("PASS oauth:{token}\r\n"));
        assert_eq!(self.recv_line().await, format!("NICK {nick}\r\n"));
        assert_eq!(self.recv_line().await, format!("USER {nick}\r\n"));
        assert_eq!(
            self.recv_line().await,
            format!("TWITCHCLIENT {variant}\r\n")
        );
    }
}

async fn connect_pair_with(config: impl FnOnce(Config) -> Config) -> (TmiClient, Peer, TcpListener) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let base = Config::new("tsagh", "sekrit").server("127.0.0.1", port);
    let mut client = TmiClient::new(config(base));

    let (connected, accepted) = tokio::join!(client.connect(), listener.accept());
    connected.expect("connect failed");
    let (stream, _) = accepted.expect("accept failed");

    let peer = Peer {
        stream: BufReader::new(stream),
    };
    (client, peer, listener)
}

async fn connect_pair() -> (TmiClient, Peer, TcpListener) {
    connect_pair_with(|c| c).await
}

/// Poll the reader until a line arrives or a second passes.
async fn wait_for_line(client: &mut TmiClient) -> String {
    for _ in 0..100 {
        let mut reader = client.reader();
        if let Some(line) = reader.try_next().await.expect("read failed") {
            return line;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("no line arrived within a second");
}

#[tokio::test]
async fn handshake_sends_auth_sequence() {
    let (client, mut peer, _listener) = connect_pair().await;

    peer.expect_handshake("sekrit", "tsagh", 3).await;
    assert!(client.is_connected());
    assert_eq!(client.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn handshake_honors_configured_variant() {
    let (_client, mut peer, _listener) =
        connect_pair_with(|c| c.variant(1).unwrap()).await;

    peer.expect_handshake("sekrit", "tsagh", 1).await;
}

#[tokio::test]
async fn is_connected_tracks_lifecycle() {
    let (mut client, _peer, _listener) = connect_pair().await;

    assert!(client.is_connected());
    client.close();
    assert!(!client.is_connected());
    assert_eq!(client.state(), ConnectionState::Closed);

    // Idempotent.
    client.close();
    assert!(!client.is_connected());
}

#[tokio::test]
async fn commands_are_formatted_and_lowercased() {
    let (mut client, mut peer, _listener) = connect_pair().await;
    peer.expect_handshake("sekrit", "tsagh", 3).await;

    client.join("RustLang").await.unwrap();
    client.send_message("Hello World", "RustLang").await.unwrap();
    client.who("RustLang").await.unwrap();
    client.part("RustLang").await.unwrap();

    assert_eq!(peer.recv_line().await, "JOIN #rustlang\r\n");
    assert_eq!(
        peer.recv_line().await,
        "PRIVMSG #rustlang :Hello World\r\n"
    );
    assert_eq!(peer.recv_line().await, "WHO #rustlang\r\n");
    assert_eq!(peer.recv_line().await, "PART #rustlang\r\n");
}

#[tokio::test]
async fn send_after_close_fails_without_writing() {
    let (mut client, _peer, _listener) = connect_pair().await;

    client.close();
    match client.send_message("hi", "chan").await {
        Err(ClientError::NotConnected) => {}
        other => panic!("expected NotConnected, got {other:?}"),
    }
}

#[tokio::test]
async fn keep_alive_probe_is_answered_and_delivered() {
    let (mut client, mut peer, _listener) = connect_pair().await;
    peer.expect_handshake("sekrit", "tsagh", 3).await;

    peer.send_raw(b"PING :tmi.example.tv\r\n").await;

    // The probe still reaches the application...
    assert_eq!(wait_for_line(&mut client).await, "PING :tmi.example.tv");
    // ...and the reply went out before it was delivered.
    assert_eq!(peer.recv_line().await, "PONG :tmi.example.tv\r\n");
}

#[tokio::test]
async fn manual_pong_when_auto_reply_disabled() {
    let (mut client, mut peer, _listener) =
        connect_pair_with(|c| c.auto_pong(false)).await;
    peer.expect_handshake("sekrit", "tsagh", 3).await;

    peer.send_raw(b"PING :tmi.example.tv\r\n").await;
    let probe = wait_for_line(&mut client).await;
    assert_eq!(probe, "PING :tmi.example.tv");

    client.pong(&probe).await.unwrap();
    assert_eq!(peer.recv_line().await, "PONG :tmi.example.tv\r\n");
}

#[tokio::test]
async fn line_split_across_two_deliveries_is_reassembled() {
    let (mut client, mut peer, _listener) = connect_pair().await;
    peer.expect_handshake("sekrit", "tsagh", 3).await;

    peer.send_raw(b":nick PRIVMSG #chan :hel").await;
    sleep(Duration::from_millis(50)).await;

    // The fragment is buffered but no line is available yet.
    let mut reader = client.reader();
    assert!(!reader.has_next().await);

    peer.send_raw(b"lo\r\n").await;
    assert_eq!(
        wait_for_line(&mut client).await,
        ":nick PRIVMSG #chan :hello"
    );
}

#[tokio::test]
async fn lines_are_delivered_in_arrival_order() {
    let (mut client, mut peer, _listener) = connect_pair().await;
    peer.expect_handshake("sekrit", "tsagh", 3).await;

    peer.send_raw(b"first\r\nsecond\r\nthird\r\n").await;

    assert_eq!(wait_for_line(&mut client).await, "first");

    // The remaining lines were queued by the same decode pass; no further
    // reads are needed and order is preserved.
    let mut reader = client.reader();
    assert_eq!(reader.pending(), 2);
    assert_eq!(reader.next_line().unwrap(), "second");
    assert_eq!(reader.next_line().unwrap(), "third");

    match reader.next_line() {
        Err(ClientError::Exhausted) => {}
        other => panic!("expected Exhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn reader_queue_persists_across_reader_calls() {
    let (mut client, mut peer, _listener) = connect_pair().await;
    peer.expect_handshake("sekrit", "tsagh", 3).await;

    peer.send_raw(b"alpha\r\nbeta\r\n").await;
    assert_eq!(wait_for_line(&mut client).await, "alpha");

    // A fresh reader borrow observes the same queue; nothing was lost or
    // buffered twice.
    let mut reader = client.reader();
    assert_eq!(reader.next_line().unwrap(), "beta");
}

#[tokio::test]
async fn peer_eof_reports_no_more_data() {
    let (mut client, peer, _listener) = connect_pair().await;
    drop(peer);

    for _ in 0..100 {
        let mut reader = client.reader();
        if !reader.has_next().await && !client.is_connected() {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }

    assert!(!client.is_connected());
    assert_eq!(client.state(), ConnectionState::Closed);

    let mut reader = client.reader();
    assert!(!reader.has_next().await);
}

#[tokio::test]
async fn reconnect_replaces_previous_connection() {
    let (mut client, mut old_peer, listener) = connect_pair().await;
    old_peer.expect_handshake("sekrit", "tsagh", 3).await;

    let (connected, accepted) = tokio::join!(client.connect(), listener.accept());
    connected.expect("reconnect failed");
    let (stream, _) = accepted.expect("accept failed");
    let mut new_peer = Peer {
        stream: BufReader::new(stream),
    };

    new_peer.expect_handshake("sekrit", "tsagh", 3).await;
    assert!(client.is_connected());

    // The old transport was dropped; its peer sees EOF.
    assert_eq!(old_peer.recv_line().await, "");
}

#[tokio::test]
async fn connect_failure_is_reported() {
    // Nothing listens on this port; expect refusal, or a timeout on
    // platforms that blackhole it.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = Config::new("tsagh", "sekrit")
        .server("127.0.0.1", port)
        .connect_timeout(Duration::from_millis(500));
    let mut client = TmiClient::new(config);

    match client.connect().await {
        Err(ClientError::Connect(_)) | Err(ClientError::ConnectTimeout(_)) => {}
        other => panic!("expected connect failure, got {other:?}"),
    }
    assert!(!client.is_connected());
    assert_eq!(client.state(), ConnectionState::Disconnected);
}
