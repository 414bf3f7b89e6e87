//! Error types for the TMI client.
//!
//! This module defines the error taxonomy for connection setup,
//! transport I/O, and reader misuse.

use std::time::Duration;

use thiserror::Error;

/// Convenience type alias for Results using [`ClientError`].
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Top-level client errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The socket never reached a connected state.
    #[error("connection failed: {0}")]
    Connect(#[source] std::io::Error),

    /// The connect deadline elapsed before the handshake completed.
    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// An operation that requires a live connection was invoked without one.
    #[error("not connected to the chat server")]
    NotConnected,

    /// I/O error on an established connection.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The receive buffer grew past the line limit without a terminator.
    #[error("line exceeds {limit} bytes without a terminator")]
    LineTooLong {
        /// Maximum permitted line length in bytes.
        limit: usize,
    },

    /// The reader was consumed while its queue was empty.
    ///
    /// This indicates caller misuse (availability was not checked first),
    /// not end of stream.
    #[error("no pending line to consume")]
    Exhausted,

    /// Protocol variant outside the accepted 1..=3 range.
    #[error("invalid protocol variant: {0}")]
    InvalidVariant(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::LineTooLong { limit: 8192 };
        assert_eq!(
            format!("{}", err),
            "line exceeds 8192 bytes without a terminator"
        );

        let err = ClientError::InvalidVariant(7);
        assert_eq!(format!("{}", err), "invalid protocol variant: 7");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");
        let err: ClientError = io_err.into();
        match err {
            ClientError::Io(_) => {}
            _ => panic!("Expected Io variant"),
        }
    }
}
