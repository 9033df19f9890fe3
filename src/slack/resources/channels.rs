use async_trait::async_trait;
use futures::TryStreamExt;
use serde::Deserialize;
use tracing::debug;

use super::{Collection, ResponseMetadata, continuation, limit_param, pages};
use crate::core::models::{Channel, ChannelRef, Page};
use crate::errors::SlackError;
use crate::slack::client::SlackClient;

/// Filters for `conversations.list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelQuery {
    /// Comma-separated conversation types, e.g. `public_channel,private_channel`.
    pub types: Option<String>,
    pub exclude_archived: Option<bool>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConversationsInfo {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct ConversationsList {
    #[serde(default)]
    channels: Vec<Channel>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, Copy)]
pub struct Channels<'a> {
    pub(crate) client: &'a SlackClient,
}

impl<'a> Channels<'a> {
    pub(crate) fn new(client: &'a SlackClient) -> Self {
        Self { client }
    }

    /// `conversations.info` for one channel.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::Api` (e.g. `channel_not_found`) or a transport error.
    pub async fn one(&self, id: &str) -> Result<Channel, SlackError> {
        let info: ConversationsInfo = self
            .client
            .get("conversations.info", &[("channel", Some(id.to_string()))])
            .await?;
        Ok(info.channel)
    }

    /// Conversation id for `channel`, looking names up in `conversations.list`.
    ///
    /// Most write endpoints accept ids only; a name handle (as slash commands
    /// produce) is matched against public and private channels, with or
    /// without a leading `#`.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::NotFound` if no channel has that name, or the
    /// first failing list request.
    pub async fn resolve_id(&self, channel: &ChannelRef) -> Result<String, SlackError> {
        let name = match channel {
            ChannelRef::Id { id } => return Ok(id.clone()),
            ChannelRef::Name { name } => name.trim_start_matches('#'),
        };

        let query = ChannelQuery {
            types: Some("public_channel,private_channel".to_string()),
            exclude_archived: Some(true),
            ..ChannelQuery::default()
        };
        let mut batches = std::pin::pin!(pages(self, query));
        while let Some(batch) = batches.try_next().await? {
            if let Some(found) = batch
                .into_iter()
                .find(|c| c.name.as_deref() == Some(name))
            {
                debug!(name = %name, channel_id = %found.id, "Resolved channel name");
                return Ok(found.id);
            }
        }

        Err(SlackError::NotFound(format!("channel named {name}")))
    }
}

#[async_trait]
impl Collection for Channels<'_> {
    type Item = Channel;
    type Query = ChannelQuery;

    async fn page(&self, query: &ChannelQuery) -> Result<Page<Channel, ChannelQuery>, SlackError> {
        let list: ConversationsList = self
            .client
            .get(
                "conversations.list",
                &[
                    ("types", query.types.clone()),
                    ("exclude_archived", query.exclude_archived.map(|b| b.to_string())),
                    ("limit", limit_param(query.limit)),
                    ("cursor", query.cursor.clone()),
                ],
            )
            .await?;

        let next = continuation(list.response_metadata.as_ref()).map(|cursor| ChannelQuery {
            cursor: Some(cursor),
            ..query.clone()
        });

        Ok(Page {
            items: list.channels,
            next,
        })
    }
}
