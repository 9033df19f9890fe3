//! Read accessors for Slack collections.
//!
//! Every accessor exposes `one` (a single `*.info`-style call) and implements
//! [`Collection`] for forward-only paging. A page's `next` query is already
//! bound to the continuation; when Slack signals the end, `next` is `None`
//! and no further request can be issued.

pub mod channels;
pub mod members;
pub mod messages;
pub mod users;

use async_trait::async_trait;
use futures::{Stream, TryStreamExt, stream};
use serde::Deserialize;

pub use channels::{ChannelQuery, Channels};
pub use members::{MemberQuery, Members};
pub use messages::{MessageQuery, Messages};
pub use users::{UserQuery, Users};

use super::client::SlackClient;
use crate::core::models::Page;
use crate::errors::SlackError;

#[async_trait]
pub trait Collection: Sync {
    type Item: Send;
    type Query: Clone + Send + Sync;

    /// Fetch one page for `query`.
    async fn page(&self, query: &Self::Query) -> Result<Page<Self::Item, Self::Query>, SlackError>;
}

impl<T, Q> Page<T, Q>
where
    Q: Clone + Send + Sync,
{
    /// Fetch the following page, or `Ok(None)` if this page was the last.
    ///
    /// # Errors
    ///
    /// Propagates the collection's request error.
    pub async fn next_page<C>(&self, collection: &C) -> Result<Option<Page<T, Q>>, SlackError>
    where
        C: Collection<Item = T, Query = Q>,
    {
        match &self.next {
            Some(query) => collection.page(query).await.map(Some),
            None => Ok(None),
        }
    }
}

/// Stream of item batches, one per page, ending after the last page.
pub fn pages<'a, C>(
    collection: &'a C,
    first: C::Query,
) -> impl Stream<Item = Result<Vec<C::Item>, SlackError>> + 'a
where
    C: Collection,
    C::Query: 'a,
    C::Item: 'a,
{
    stream::try_unfold(Some(first), move |state| async move {
        let Some(query) = state else {
            return Ok::<_, SlackError>(None);
        };
        let page = collection.page(&query).await?;
        Ok(Some((page.items, page.next)))
    })
}

/// Walk every page starting at `first` and concatenate the items.
///
/// # Errors
///
/// Stops at and returns the first failing request.
pub async fn collect_all<C>(collection: &C, first: C::Query) -> Result<Vec<C::Item>, SlackError>
where
    C: Collection,
{
    pages(collection, first).try_concat().await
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Slack marks the last page with a missing or empty `next_cursor`.
pub(crate) fn continuation(meta: Option<&ResponseMetadata>) -> Option<String> {
    meta.and_then(|m| m.next_cursor.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn limit_param(limit: Option<u32>) -> Option<String> {
    limit.map(|n| n.to_string())
}

impl SlackClient {
    #[must_use]
    pub fn channels(&self) -> Channels<'_> {
        Channels::new(self)
    }

    #[must_use]
    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    #[must_use]
    pub fn members(&self) -> Members<'_> {
        Members::new(self)
    }

    #[must_use]
    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuation_requires_non_empty_cursor() {
        assert_eq!(continuation(None), None);

        let empty = ResponseMetadata {
            next_cursor: Some(String::new()),
        };
        assert_eq!(continuation(Some(&empty)), None);

        let blank = ResponseMetadata {
            next_cursor: Some("  ".to_string()),
        };
        assert_eq!(continuation(Some(&blank)), None);

        let cursor = ResponseMetadata {
            next_cursor: Some("dGVhbTpDMDYx".to_string()),
        };
        assert_eq!(continuation(Some(&cursor)).as_deref(), Some("dGVhbTpDMDYx"));
    }
}
