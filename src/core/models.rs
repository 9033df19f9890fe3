use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Entities (projections of Slack API objects)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_im: bool,
    #[serde(default)]
    pub num_members: Option<u64>,
    #[serde(default)]
    pub topic: Option<ChannelText>,
    #[serde(default)]
    pub purpose: Option<ChannelText>,
}

/// Topic or purpose of a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelText {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Best human-readable name: profile real name, then display name, then handle, then id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let profile = self.profile.as_ref();
        profile
            .and_then(|p| p.real_name.as_deref())
            .filter(|s| !s.is_empty())
            .or_else(|| {
                profile
                    .and_then(|p| p.display_name.as_deref())
                    .filter(|s| !s.is_empty())
            })
            .or(self.real_name.as_deref())
            .or(self.name.as_deref())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub ts: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
    /// Remaining Slack fields (blocks, reactions, files, ...) kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Handles (scalar addresses of entities)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppRef {
    pub id: String,
}

/// A channel is addressed by id, or by name when Slack only gives us a name
/// (slash-command payloads).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelRef {
    Id { id: String },
    Name { name: String },
}

impl ChannelRef {
    pub fn id(id: impl Into<String>) -> Self {
        ChannelRef::Id { id: id.into() }
    }

    pub fn named(name: impl Into<String>) -> Self {
        ChannelRef::Name { name: name.into() }
    }

    /// Value to pass as Slack's `channel` argument.
    #[must_use]
    pub fn as_api_arg(&self) -> &str {
        match self {
            ChannelRef::Id { id } => id,
            ChannelRef::Name { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
}

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    pub channel_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel_id: String,
    pub ts: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewRef {
    pub app_id: Option<String>,
    pub external_id: String,
}

/// Short-lived interaction capability. Slack invalidates `trigger_id` within
/// seconds; `response_url` accepts a bounded number of posts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerRef {
    pub app_id: Option<String>,
    #[serde(default)]
    pub trigger_id: Option<String>,
    #[serde(default)]
    pub response_url: Option<String>,
}

/// Any addressable entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Handle {
    App(AppRef),
    Channel(ChannelRef),
    User(UserRef),
    Member(MemberRef),
    Message(MessageRef),
    View(ViewRef),
    Trigger(TriggerRef),
}

// ============================================================================
// Outgoing payloads
// ============================================================================

/// A message to post with `chat.postMessage`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl From<&str> for OutgoingMessage {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

/// Body posted to a trigger's `response_url`.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerResponse {
    /// Posted verbatim.
    Json(Value),
    /// Wrapped as `{"text": ...}`.
    Text(String),
}

// ============================================================================
// Pagination
// ============================================================================

/// One page of a collection. `next` is the query for the following page,
/// already bound to the continuation cursor; `None` ends pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T, Q> {
    pub items: Vec<T>,
    pub next: Option<Q>,
}

impl<T, Q> Page<T, Q> {
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}
