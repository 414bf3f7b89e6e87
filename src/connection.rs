//! Connection ownership and lifecycle.
//!
//! [`Connection`] owns the TCP stream, the receive buffer, and the line
//! codec. It drives the bounded connect sequence, performs the
//! authentication handshake, and exposes the single write primitive that
//! every outbound command goes through.

use bytes::BytesMut;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, warn};

use crate::codec::{TmiCodec, MAX_LINE_LEN};
use crate::commands;
use crate::config::Config;
use crate::error::{ClientError, Result};

/// Lifecycle of a [`Connection`].
///
/// `Closed` is terminal for the transport it refers to; reconnecting
/// replaces the transport and starts the machine over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport yet.
    Disconnected,
    /// Transport establishment in progress.
    Connecting,
    /// Transport live, handshake sent.
    Connected,
    /// Transport released, by us or by peer EOF.
    Closed,
}

/// The socket owner.
///
/// At most one live transport exists per instance; `connect` tears down
/// any prior one before establishing a replacement.
#[derive(Debug)]
pub struct Connection {
    stream: Option<TcpStream>,
    state: ConnectionState,
    recv_buf: BytesMut,
    send_buf: BytesMut,
    codec: TmiCodec,
}

impl Connection {
    pub(crate) fn new() -> Self {
        Self {
            stream: None,
            state: ConnectionState::Disconnected,
            recv_buf: BytesMut::with_capacity(MAX_LINE_LEN),
            send_buf: BytesMut::new(),
            codec: TmiCodec::new(),
        }
    }

    /// Establish a fresh transport and send the authentication handshake.
    ///
    /// The whole sequence runs under the configured deadline; dropping the
    /// returned future cancels it.
    pub(crate) async fn connect(&mut self, config: &Config) -> Result<()> {
        if self.stream.take().is_some() {
            debug!("discarding previous transport before reconnect");
        }
        self.recv_buf.clear();
        self.state = ConnectionState::Connecting;

        match timeout(config.timeout(), self.establish(config)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                self.stream = None;
                self.state = ConnectionState::Disconnected;
                Err(e)
            }
            Err(_) => {
                self.stream = None;
                self.state = ConnectionState::Disconnected;
                Err(ClientError::ConnectTimeout(config.timeout()))
            }
        }
    }

    async fn establish(&mut self, config: &Config) -> Result<()> {
        let stream = TcpStream::connect((config.host(), config.port()))
            .await
            .map_err(ClientError::Connect)?;

        if let Err(e) = enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        self.stream = Some(stream);
        self.state = ConnectionState::Connected;
        debug!(host = config.host(), port = config.port(), "connected");

        self.send(&commands::pass(config.token())).await?;
        self.send(&commands::nick(config.nickname())).await?;
        self.send(&commands::user(config.nickname())).await?;
        self.send(&commands::twitchclient(config.protocol_variant()))
            .await?;
        debug!(nick = config.nickname(), "handshake sent");
        Ok(())
    }

    /// Write one protocol line, terminator appended by the codec.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotConnected`] if no live connected transport exists;
    /// nothing is written in that case.
    pub(crate) async fn send(&mut self, line: &str) -> Result<()> {
        if self.state != ConnectionState::Connected {
            return Err(ClientError::NotConnected);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Err(ClientError::NotConnected);
        };

        self.send_buf.clear();
        self.codec.encode(line, &mut self.send_buf)?;
        stream.write_all(&self.send_buf).await?;
        Ok(())
    }

    /// One non-blocking read attempt, draining every complete line into
    /// `out`.
    ///
    /// Returning `Ok` with `out` untouched means "no data yet"; the caller
    /// retries later. A zero-byte read is peer EOF: the transport is
    /// released and the state becomes [`ConnectionState::Closed`], so later
    /// attempts report not-connected rather than polling a dead socket.
    pub(crate) fn try_read_lines(&mut self, out: &mut Vec<String>) -> Result<()> {
        if self.state != ConnectionState::Connected {
            return Err(ClientError::NotConnected);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Err(ClientError::NotConnected);
        };

        let mut chunk = [0u8; 4096];
        match stream.try_read(&mut chunk) {
            Ok(0) => {
                debug!("peer closed the connection");
                self.stream = None;
                self.state = ConnectionState::Closed;
                return Ok(());
            }
            Ok(n) => self.recv_buf.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        while let Some(line) = self.codec.decode(&mut self.recv_buf)? {
            out.push(line);
        }
        Ok(())
    }

    /// Whether a live connected transport exists. Never errors.
    pub(crate) fn is_connected(&self) -> bool {
        self.stream.is_some() && self.state == ConnectionState::Connected
    }

    /// Release the transport. Safe to call repeatedly or before any
    /// connect.
    pub(crate) fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("connection closed");
        }
        self.state = ConnectionState::Closed;
    }

    /// Current lifecycle state.
    pub(crate) fn state(&self) -> ConnectionState {
        self.state
    }
}

fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
    use std::time::Duration;

    use socket2::{SockRef, TcpKeepalive};

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));
    sock.set_tcp_keepalive(&keepalive)
}
