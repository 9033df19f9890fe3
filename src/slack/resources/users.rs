use async_trait::async_trait;
use serde::Deserialize;

use super::{Collection, ResponseMetadata, continuation, limit_param};
use crate::core::models::{Page, User};
use crate::errors::SlackError;
use crate::slack::client::SlackClient;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersInfo {
    pub(crate) user: User,
}

#[derive(Debug, Deserialize)]
struct UsersList {
    #[serde(default)]
    members: Vec<User>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    pub(crate) client: &'a SlackClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a SlackClient) -> Self {
        Self { client }
    }

    /// `users.info` for one user.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::Api` (e.g. `user_not_found`) or a transport error.
    pub async fn one(&self, id: &str) -> Result<User, SlackError> {
        let info: UsersInfo = self
            .client
            .get("users.info", &[("user", Some(id.to_string()))])
            .await?;
        Ok(info.user)
    }
}

#[async_trait]
impl Collection for Users<'_> {
    type Item = User;
    type Query = UserQuery;

    async fn page(&self, query: &UserQuery) -> Result<Page<User, UserQuery>, SlackError> {
        let list: UsersList = self
            .client
            .get(
                "users.list",
                &[
                    ("limit", limit_param(query.limit)),
                    ("cursor", query.cursor.clone()),
                ],
            )
            .await?;

        let next = continuation(list.response_metadata.as_ref()).map(|cursor| UserQuery {
            cursor: Some(cursor),
            ..query.clone()
        });

        Ok(Page {
            items: list.members,
            next,
        })
    }
}
