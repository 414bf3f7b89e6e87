//! Pull-based line consumption.
//!
//! Decoded lines land in a FIFO queue owned by the client; [`Reader`] is a
//! borrow over that queue and the connection, so every `reader()` call
//! observes the same pending lines — there is no way to end up with two
//! independently-buffering consumers.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::commands;
use crate::connection::Connection;
use crate::error::{ClientError, Result};

/// Answers keep-alive probes before lines reach the application.
///
/// Purely inspecting: the probe line itself is still delivered to the
/// consumer.
#[derive(Debug, Clone)]
pub struct AutoPong {
    enabled: bool,
}

impl AutoPong {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// The reply to send for `line`, if it is a keep-alive probe and
    /// auto-reply is enabled.
    pub fn reply_for(&self, line: &str) -> Option<String> {
        if self.enabled && line.starts_with("PING ") {
            Some(commands::pong_for(line))
        } else {
            None
        }
    }
}

/// The pending-line queue plus the keep-alive responder. One per client,
/// for the client's lifetime.
#[derive(Debug)]
pub(crate) struct LineReader {
    queue: VecDeque<String>,
    responder: AutoPong,
}

impl LineReader {
    pub(crate) fn new(auto_pong: bool) -> Self {
        Self {
            queue: VecDeque::new(),
            responder: AutoPong::new(auto_pong),
        }
    }
}

/// Lazy, forward-only view over the incoming line sequence.
///
/// Querying for availability may perform one non-blocking read as a side
/// effect. The `&mut` receiver serializes every operation; the client is
/// single-consumer by design.
#[derive(Debug)]
pub struct Reader<'a> {
    conn: &'a mut Connection,
    inner: &'a mut LineReader,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(conn: &'a mut Connection, inner: &'a mut LineReader) -> Self {
        Self { conn, inner }
    }

    /// Whether a line is available to consume.
    ///
    /// If the queue is empty this runs one decode cycle first. Read
    /// failures are logged and reported as "no data"; use
    /// [`try_next`](Self::try_next) to observe them instead.
    pub async fn has_next(&mut self) -> bool {
        if !self.inner.queue.is_empty() {
            return true;
        }
        if let Err(e) = self.fill().await {
            warn!("read failed while polling for lines: {}", e);
        }
        !self.inner.queue.is_empty()
    }

    /// Dequeue the oldest pending line.
    ///
    /// # Errors
    ///
    /// [`ClientError::Exhausted`] if the queue is empty. Callers are
    /// expected to check [`has_next`](Self::has_next) first; an empty queue
    /// is caller misuse, not end of stream.
    pub fn next_line(&mut self) -> Result<String> {
        self.inner.queue.pop_front().ok_or(ClientError::Exhausted)
    }

    /// Explicit pull: one decode cycle if needed, then the oldest pending
    /// line, or `None` when no data is available yet.
    ///
    /// Unlike [`has_next`](Self::has_next), transport errors propagate.
    pub async fn try_next(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.inner.queue.pop_front() {
            return Ok(Some(line));
        }
        self.fill().await?;
        Ok(self.inner.queue.pop_front())
    }

    /// Number of decoded lines waiting to be consumed.
    pub fn pending(&self) -> usize {
        self.inner.queue.len()
    }

    async fn fill(&mut self) -> Result<()> {
        let mut lines = Vec::new();
        self.conn.try_read_lines(&mut lines)?;
        for line in lines {
            if let Some(reply) = self.inner.responder.reply_for(&line) {
                debug!(probe = %line, "answering keep-alive probe");
                self.conn.send(&reply).await?;
            }
            self.inner.queue.push_back(line);
        }
        Ok(())
    }
}
