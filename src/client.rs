//! The public client surface.

use crate::commands;
use crate::config::Config;
use crate::connection::{Connection, ConnectionState};
use crate::error::Result;
use crate::reader::{LineReader, Reader};

/// A client for the chat service.
///
/// Owns exactly one connection and one pending-line queue. All operations
/// take `&mut self`; the client is single-consumer by design and callers
/// needing shared access must serialize it themselves.
#[derive(Debug)]
pub struct TmiClient {
    config: Config,
    conn: Connection,
    reader: LineReader,
}

impl TmiClient {
    /// Create a client from the given configuration. No I/O happens until
    /// [`connect`](Self::connect).
    pub fn new(config: Config) -> Self {
        let reader = LineReader::new(config.is_auto_pong());
        Self {
            config,
            conn: Connection::new(),
            reader,
        }
    }

    /// Connect to the chat server and send the authentication handshake.
    ///
    /// Any previous connection is discarded first. The whole sequence is
    /// bounded by the configured deadline.
    pub async fn connect(&mut self) -> Result<()> {
        self.conn.connect(&self.config).await
    }

    /// Send a chat message to a channel.
    pub async fn send_message(&mut self, message: &str, channel: &str) -> Result<()> {
        self.conn.send(&commands::privmsg(channel, message)).await
    }

    /// Join a channel.
    pub async fn join(&mut self, channel: &str) -> Result<()> {
        self.conn.send(&commands::join(channel)).await
    }

    /// Leave a channel.
    pub async fn part(&mut self, channel: &str) -> Result<()> {
        self.conn.send(&commands::part(channel)).await
    }

    /// Query a channel's member list.
    pub async fn who(&mut self, channel: &str) -> Result<()> {
        self.conn.send(&commands::who(channel)).await
    }

    /// Reply to a keep-alive probe by hand, given the raw probe line.
    ///
    /// Only needed when automatic replies are disabled in the
    /// [`Config`].
    pub async fn pong(&mut self, ping_line: &str) -> Result<()> {
        self.conn.send(&commands::pong_for(ping_line)).await
    }

    /// Whether a live connected transport exists. Never errors, including
    /// before the first connect.
    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    /// Current connection lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.conn.state()
    }

    /// Release the connection. Safe to call repeatedly or on a
    /// never-connected client.
    pub fn close(&mut self) {
        self.conn.close();
    }

    /// The incoming line sequence.
    ///
    /// Every call borrows the same underlying queue, so lines buffered
    /// through one `Reader` are visible through the next — there is never
    /// a second, independently-buffering consumer.
    pub fn reader(&mut self) -> Reader<'_> {
        Reader::new(&mut self.conn, &mut self.reader)
    }

    /// The configured display name.
    pub fn nickname(&self) -> &str {
        self.config.nickname()
    }
}
