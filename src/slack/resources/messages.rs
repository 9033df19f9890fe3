//! Channel history, paged by timestamp.
//!
//! The next page is requested with `latest` set to the `ts` of the oldest
//! message already seen (Slack returns newest first), so an empty page or
//! `has_more: false` ends pagination.

use async_trait::async_trait;
use serde::Deserialize;

use super::{Collection, limit_param};
use crate::core::models::{Message, Page};
use crate::errors::SlackError;
use crate::slack::client::SlackClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageQuery {
    pub channel_id: String,
    /// Only messages strictly before this `ts`.
    pub latest: Option<String>,
    /// Only messages after this `ts`.
    pub oldest: Option<String>,
    pub limit: Option<u32>,
}

impl MessageQuery {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            latest: None,
            oldest: None,
            limit: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConversationsHistory {
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    has_more: Option<bool>,
}

#[derive(Debug, Clone, Copy)]
pub struct Messages<'a> {
    pub(crate) client: &'a SlackClient,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(client: &'a SlackClient) -> Self {
        Self { client }
    }

    /// The message at exactly `ts` in `channel_id`.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::NotFound` if no message has that timestamp.
    pub async fn one(&self, channel_id: &str, ts: &str) -> Result<Message, SlackError> {
        let history: ConversationsHistory = self
            .client
            .get(
                "conversations.history",
                &[
                    ("channel", Some(channel_id.to_string())),
                    ("latest", Some(ts.to_string())),
                    ("inclusive", Some("true".to_string())),
                    ("limit", Some("1".to_string())),
                ],
            )
            .await?;

        history
            .messages
            .into_iter()
            .find(|m| m.ts == ts)
            .ok_or_else(|| SlackError::NotFound(format!("message {ts} in channel {channel_id}")))
    }
}

/// Query for the page after `items`, or `None` when history is exhausted.
fn next_query(query: &MessageQuery, items: &[Message], has_more: Option<bool>) -> Option<MessageQuery> {
    if has_more == Some(false) {
        return None;
    }
    let last = items.last()?;
    Some(MessageQuery {
        latest: Some(last.ts.clone()),
        ..query.clone()
    })
}

#[async_trait]
impl Collection for Messages<'_> {
    type Item = Message;
    type Query = MessageQuery;

    async fn page(&self, query: &MessageQuery) -> Result<Page<Message, MessageQuery>, SlackError> {
        let history: ConversationsHistory = self
            .client
            .get(
                "conversations.history",
                &[
                    ("channel", Some(query.channel_id.clone())),
                    ("latest", query.latest.clone()),
                    ("oldest", query.oldest.clone()),
                    ("limit", limit_param(query.limit)),
                ],
            )
            .await?;

        let next = next_query(query, &history.messages, history.has_more);
        Ok(Page {
            items: history.messages,
            next,
        })
    }
}
