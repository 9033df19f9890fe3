//! Channel membership: users scoped to one conversation.

use async_trait::async_trait;
use serde::Deserialize;

use super::users::UsersInfo;
use super::{Collection, ResponseMetadata, continuation, limit_param};
use crate::core::models::{MemberRef, Page, User};
use crate::errors::SlackError;
use crate::slack::client::SlackClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberQuery {
    pub channel_id: String,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl MemberQuery {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            limit: None,
            cursor: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConversationsMembers {
    #[serde(default)]
    members: Vec<String>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, Copy)]
pub struct Members<'a> {
    client: &'a SlackClient,
}

impl<'a> Members<'a> {
    pub(crate) fn new(client: &'a SlackClient) -> Self {
        Self { client }
    }

    /// Resolve a member to the full user profile.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::Api` (e.g. `user_not_found`) or a transport error.
    pub async fn one(&self, member: &MemberRef) -> Result<User, SlackError> {
        let info: UsersInfo = self
            .client
            .get("users.info", &[("user", Some(member.user_id.clone()))])
            .await?;
        Ok(info.user)
    }
}

#[async_trait]
impl Collection for Members<'_> {
    type Item = MemberRef;
    type Query = MemberQuery;

    async fn page(&self, query: &MemberQuery) -> Result<Page<MemberRef, MemberQuery>, SlackError> {
        let list: ConversationsMembers = self
            .client
            .get(
                "conversations.members",
                &[
                    ("channel", Some(query.channel_id.clone())),
                    ("limit", limit_param(query.limit)),
                    ("cursor", query.cursor.clone()),
                ],
            )
            .await?;

        let items = list
            .members
            .into_iter()
            .map(|user_id| MemberRef {
                channel_id: query.channel_id.clone(),
                user_id,
            })
            .collect();

        let next = continuation(list.response_metadata.as_ref()).map(|cursor| MemberQuery {
            cursor: Some(cursor),
            ..query.clone()
        });

        Ok(Page { items, next })
    }
}
