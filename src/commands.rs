//! Outbound command formatting.
//!
//! Every outbound line is a plain string template over the connection's
//! write primitive; none of these carry the CRLF terminator, which the
//! codec appends on send. Channel names are lowercased and `#`-prefixed
//! the way the chat service expects them.

/// Authentication line carrying the oauth token.
pub fn pass(token: &str) -> String {
    format!("PASS oauth:{token}")
}

/// Nickname registration line.
pub fn nick(nickname: &str) -> String {
    format!("NICK {nickname}")
}

/// Username registration line.
pub fn user(nickname: &str) -> String {
    format!("USER {nickname}")
}

/// Protocol-variant declaration selecting extended message features.
pub fn twitchclient(variant: u8) -> String {
    format!("TWITCHCLIENT {variant}")
}

/// Chat message to a channel.
pub fn privmsg(channel: &str, message: &str) -> String {
    format!("PRIVMSG #{} :{}", channel.to_lowercase(), message)
}

/// Join a channel.
pub fn join(channel: &str) -> String {
    format!("JOIN #{}", channel.to_lowercase())
}

/// Leave a channel.
pub fn part(channel: &str) -> String {
    format!("PART #{}", channel.to_lowercase())
}

/// Query a channel's member list.
pub fn who(channel: &str) -> String {
    format!("WHO #{}", channel.to_lowercase())
}

/// Keep-alive reply: the probe line with the verb swapped.
///
/// Only the leading `PING` verb is replaced; the payload is echoed
/// untouched.
pub fn pong_for(ping_line: &str) -> String {
    match ping_line.strip_prefix("PING") {
        Some(rest) => format!("PONG{rest}"),
        None => ping_line.to_string(),
    }
}
