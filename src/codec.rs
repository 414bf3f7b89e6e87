//! Line framing for the chat stream.
//!
//! [`TmiCodec`] turns raw bytes into terminator-delimited text lines and
//! encodes outbound lines with the CRLF terminator appended. Decoding is
//! lossy: malformed UTF-8 sequences become U+FFFD instead of failing the
//! read, so a corrupt burst degrades a single line rather than the stream.
//!
//! Bytes after the last newline stay in the buffer between calls, so a line
//! split across two socket reads is reassembled before it is ever emitted.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ClientError;

/// Maximum permitted line length in bytes, terminator included.
pub const MAX_LINE_LEN: usize = 8192;

/// Codec for CRLF-delimited chat lines.
#[derive(Debug, Clone)]
pub struct TmiCodec {
    max_line_len: usize,
}

impl TmiCodec {
    /// Create a codec with the default line limit.
    pub fn new() -> Self {
        Self {
            max_line_len: MAX_LINE_LEN,
        }
    }

    /// Create a codec with a custom line limit.
    pub fn with_max_line_len(max_line_len: usize) -> Self {
        Self { max_line_len }
    }
}

impl Default for TmiCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for TmiCodec {
    type Item = String;
    type Error = ClientError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, ClientError> {
        let Some(newline_pos) = buf.iter().position(|&b| b == b'\n') else {
            // No complete line yet. An unbounded fragment is backpressure,
            // not idleness; signal it instead of waiting forever.
            if buf.len() > self.max_line_len {
                return Err(ClientError::LineTooLong {
                    limit: self.max_line_len,
                });
            }
            return Ok(None);
        };

        let line_len = newline_pos + 1;
        if line_len > self.max_line_len {
            return Err(ClientError::LineTooLong {
                limit: self.max_line_len,
            });
        }

        let line = buf.split_to(line_len);
        let trimmed = trim_terminator(&line);
        Ok(Some(String::from_utf8_lossy(trimmed).into_owned()))
    }
}

impl Encoder<&str> for TmiCodec {
    type Error = ClientError;

    fn encode(&mut self, line: &str, buf: &mut BytesMut) -> Result<(), ClientError> {
        if line.len() + 2 > self.max_line_len {
            return Err(ClientError::LineTooLong {
                limit: self.max_line_len,
            });
        }
        buf.reserve(line.len() + 2);
        buf.put_slice(line.as_bytes());
        buf.put_slice(b"\r\n");
        Ok(())
    }
}

fn trim_terminator(line: &[u8]) -> &[u8] {
    let without_lf = line.strip_suffix(b"\n").unwrap_or(line);
    without_lf.strip_suffix(b"\r").unwrap_or(without_lf)
}
