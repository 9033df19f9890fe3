//! Entity-scoped write calls.
//!
//! Each action takes the address of the entity it acts on and issues one POST
//! (two for direct messages: open the IM, then post into it).

use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::{Value, json};
use tracing::info;

use super::resources::{Channels, Messages, Users};
use crate::core::models::{Channel, ChannelRef, MessageRef, OutgoingMessage, UserRef};
use crate::errors::SlackError;

#[derive(Debug, Deserialize)]
struct ChannelEnvelope {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct OpenedConversation {
    channel: OpenedChannel,
}

#[derive(Debug, Deserialize)]
struct OpenedChannel {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PostedMessage {
    channel: String,
    ts: String,
}

/// JSON body for `chat.postMessage`.
#[must_use]
pub fn build_post_message_payload(channel: &str, message: &OutgoingMessage) -> Value {
    let mut payload = json!({
        "channel": channel,
        "text": message.text,
    });

    if let Some(blocks) = &message.blocks {
        payload["blocks"] = blocks.clone();
    }

    if let Some(thread_ts) = &message.thread_ts {
        payload["thread_ts"] = Value::String(thread_ts.clone());
    }

    payload
}

impl Channels<'_> {
    /// `conversations.create`
    ///
    /// # Errors
    ///
    /// Returns `SlackError::Api` (e.g. `name_taken`) or a transport error.
    pub async fn create(&self, name: &str, is_private: bool) -> Result<Channel, SlackError> {
        let created: ChannelEnvelope = self
            .client
            .post(
                "conversations.create",
                json!({ "name": name, "is_private": is_private }),
            )
            .await?;
        info!(channel_id = %created.channel.id, "Created channel");
        Ok(created.channel)
    }

    /// `conversations.invite`; Slack takes the user ids comma-separated.
    /// A name handle is resolved to its id first.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::NotFound` for an unknown name, `SlackError::Api`
    /// (e.g. `already_in_channel`) or a transport error.
    pub async fn invite(&self, channel: &ChannelRef, users: &[UserRef]) -> Result<(), SlackError> {
        let channel_id = self.resolve_id(channel).await?;
        let ids = users
            .iter()
            .map(|u| u.id.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let _: IgnoredAny = self
            .client
            .post(
                "conversations.invite",
                json!({ "channel": channel_id, "users": ids }),
            )
            .await?;
        Ok(())
    }

    /// `conversations.leave`; a name handle is resolved to its id first.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::NotFound` for an unknown name, `SlackError::Api`
    /// or a transport error.
    pub async fn leave(&self, channel: &ChannelRef) -> Result<(), SlackError> {
        let channel_id = self.resolve_id(channel).await?;
        let _: IgnoredAny = self
            .client
            .post("conversations.leave", json!({ "channel": channel_id }))
            .await?;
        Ok(())
    }
}

impl Messages<'_> {
    /// `chat.postMessage`; returns the address of the posted message.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::Api` (e.g. `not_in_channel`) or a transport error.
    pub async fn send(
        &self,
        channel: &ChannelRef,
        message: &OutgoingMessage,
    ) -> Result<MessageRef, SlackError> {
        let posted: PostedMessage = self
            .client
            .post(
                "chat.postMessage",
                build_post_message_payload(channel.as_api_arg(), message),
            )
            .await?;

        Ok(MessageRef {
            channel_id: posted.channel,
            ts: posted.ts,
        })
    }
}

impl Users<'_> {
    /// Open (or reuse) the IM channel with `user` and post into it.
    ///
    /// # Errors
    ///
    /// Returns the first failing call's error.
    pub async fn send_direct_message(
        &self,
        user: &UserRef,
        message: &OutgoingMessage,
    ) -> Result<MessageRef, SlackError> {
        let opened: OpenedConversation = self
            .client
            .post("conversations.open", json!({ "users": user.id }))
            .await?;

        self.client
            .messages()
            .send(&ChannelRef::id(opened.channel.id), message)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_message_payload_minimal() {
        let payload = build_post_message_payload("C1", &OutgoingMessage::text("hello"));
        assert_eq!(payload, json!({"channel": "C1", "text": "hello"}));
    }

    #[test]
    fn test_post_message_payload_with_thread_and_blocks() {
        let message = OutgoingMessage {
            text: "fallback".to_string(),
            blocks: Some(json!([{"type": "divider"}])),
            thread_ts: Some("1700000000.000100".to_string()),
        };
        let payload = build_post_message_payload("general", &message);
        assert_eq!(payload["channel"], "general");
        assert_eq!(payload["blocks"][0]["type"], "divider");
        assert_eq!(payload["thread_ts"], "1700000000.000100");
    }
}
