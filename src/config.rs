//! Client configuration: credentials and connection knobs.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default chat endpoint.
pub const DEFAULT_HOST: &str = "irc.twitch.tv";
/// Default chat port.
pub const DEFAULT_PORT: u16 = 6667;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Immutable credentials plus connection knobs, supplied at construction.
///
/// The nickname and oauth token are used only during the authentication
/// handshake. The protocol variant (1..=3) selects the extended message
/// feature set declared to the server; out-of-range values are rejected
/// when set, not at connect time.
#[derive(Debug, Clone)]
pub struct Config {
    nickname: String,
    token: String,
    auto_pong: bool,
    variant: u8,
    host: String,
    port: u16,
    connect_timeout: Duration,
}

impl Config {
    /// Create a configuration with the given nickname and oauth token
    /// (without the `oauth:` prefix).
    ///
    /// Defaults: keep-alive probes are answered automatically, protocol
    /// variant 3, a 10 second connect deadline, and the production chat
    /// endpoint.
    pub fn new(nickname: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            token: token.into(),
            auto_pong: true,
            variant: 3,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Enable or disable automatic keep-alive replies.
    #[must_use]
    pub fn auto_pong(mut self, enabled: bool) -> Self {
        self.auto_pong = enabled;
        self
    }

    /// Select the protocol variant declared during the handshake.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidVariant`] for values outside 1..=3.
    pub fn variant(mut self, variant: u8) -> Result<Self> {
        if !(1..=3).contains(&variant) {
            return Err(ClientError::InvalidVariant(variant));
        }
        self.variant = variant;
        Ok(self)
    }

    /// Override the chat endpoint. Intended for tests against a local server.
    #[must_use]
    pub fn server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Set the deadline for [`connect`](crate::TmiClient::connect).
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// The configured nickname.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// The configured oauth token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether keep-alive probes are answered automatically.
    pub fn is_auto_pong(&self) -> bool {
        self.auto_pong
    }

    /// The protocol variant sent during the handshake.
    pub fn protocol_variant(&self) -> u8 {
        self.variant
    }

    /// The endpoint host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The endpoint port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The connect deadline.
    pub fn timeout(&self) -> Duration {
        self.connect_timeout
    }
}
