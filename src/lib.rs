//! # tmi-client
//!
//! An async client for the Twitch chat service (TMI), an IRC-derivative
//! carried over a persistent TCP connection. It covers the connection
//! lifecycle, the authentication handshake, byte-to-line framing, and
//! automatic keep-alive replies, so callers can focus on processing chat
//! lines instead of socket mechanics.
//!
//! ## Features
//!
//! - Bounded, cancellable connect with the full authentication handshake
//! - Line framing that reassembles lines split across socket reads
//! - Lossy UTF-8 decoding: corrupt bytes degrade a line, never the stream
//! - Pull-based reading with explicit "no data yet" signalling
//! - Automatic `PING` → `PONG` replies, on by default
//!
//! ## Quick Start
//!
//! ```no_run
//! use tmi_client::{Config, TmiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = TmiClient::new(Config::new("mybot", "mytoken"));
//!     client.connect().await?;
//!     client.join("rustlang").await?;
//!
//!     loop {
//!         let mut reader = client.reader();
//!         if let Some(line) = reader.try_next().await? {
//!             println!("{line}");
//!         }
//!     }
//! }
//! ```
//!
//! This crate is a transport and framing layer, not a full protocol
//! implementation: it does not track channel membership or parse numeric
//! replies, and it speaks to a single server at a time.

#![deny(clippy::all)]

pub mod client;
pub mod codec;
pub mod commands;
pub mod config;
pub mod connection;
pub mod error;
pub mod reader;

pub use self::client::TmiClient;
pub use self::codec::{TmiCodec, MAX_LINE_LEN};
pub use self::config::{Config, DEFAULT_HOST, DEFAULT_PORT};
pub use self::connection::ConnectionState;
pub use self::error::{ClientError, Result};
pub use self::reader::{AutoPong, Reader};
