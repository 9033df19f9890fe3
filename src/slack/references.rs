//! Mapping raw objects and mention text back to entity handles.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::core::models::{Channel, ChannelRef, Handle, Message, MessageRef, User, UserRef};

impl From<&Channel> for ChannelRef {
    fn from(channel: &Channel) -> Self {
        ChannelRef::id(channel.id.clone())
    }
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        UserRef::new(user.id.clone())
    }
}

impl MessageRef {
    /// Slack message objects do not carry their channel; the caller supplies it.
    #[must_use]
    pub fn of(channel_id: &str, message: &Message) -> Self {
        Self {
            channel_id: channel_id.to_string(),
            ts: message.ts.clone(),
        }
    }
}

// Trailing `<@U123>` / `<@U123|bob>`, or a bare user id.
static USER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:<@([UW][A-Z0-9]+)(?:\|[^>]*)?>|\b([UW][A-Z0-9]{2,}))\s*$")
        .expect("static regex compile")
});

// Trailing `<#C123>` / `<#C123|general>`, or a bare conversation id.
static CHANNEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:<#([CGD][A-Z0-9]+)(?:\|[^>]*)?>|\b([CGD][A-Z0-9]{2,}))\s*$")
        .expect("static regex compile")
});

fn trailing_match<'a>(re: &Regex, value: &'a str) -> Option<&'a str> {
    let caps = re.captures(value)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// The user id `value` ends with, from a `<@…>` mention or a bare `U`/`W` id.
#[must_use]
pub fn trailing_user_id(value: &str) -> Option<&str> {
    trailing_match(&USER_RE, value)
}

/// The conversation id `value` ends with, from a `<#…>` mention or a bare
/// `C`/`G`/`D` id.
#[must_use]
pub fn trailing_channel_id(value: &str) -> Option<&str> {
    trailing_match(&CHANNEL_RE, value)
}

/// Resolve a free-text reference of kind `name` into handles.
///
/// `user` and `channel` yield one handle when `value` ends in a mention or id
/// of that kind. Unknown kinds yield nothing. Message references have no
/// agreed text form yet and also yield nothing.
#[must_use]
pub fn parse_reference(name: &str, value: &str) -> Vec<Handle> {
    match name {
        "user" => trailing_user_id(value)
            .map(|id| vec![Handle::User(UserRef::new(id))])
            .unwrap_or_default(),
        "channel" => trailing_channel_id(value)
            .map(|id| vec![Handle::Channel(ChannelRef::id(id))])
            .unwrap_or_default(),
        "message" => {
            warn!(value = %value, "Message references are not supported");
            Vec::new()
        }
        _ => Vec::new(),
    }
}
