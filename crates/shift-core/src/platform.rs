//! The chat-platform seam. Everything the engine needs from Slack (or a
//! fake in tests) goes through these traits.

use crate::error::PlatformError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHandle {
    pub id: String,
    pub name: String,
}

/// What an acknowledgement reaction is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ReactionTarget {
    /// A message, by its platform timestamp.
    Message(String),
    File(String),
}

impl fmt::Display for ReactionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactionTarget::Message(ts) => write!(f, "message:{ts}"),
            ReactionTarget::File(id) => write!(f, "file:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub mime_type: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub url: String,
}

impl FileMetadata {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Title when set, otherwise the file name.
    pub fn caption(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }
}

/// A message fetched back from channel history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub user: String,
    pub text: String,
    pub ts: String,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn display_name(&self, user_id: &str) -> PlatformResult<String>;
}

#[async_trait]
pub trait ChatPlatform: UserDirectory {
    async fn create_channel(&self, name: &str) -> PlatformResult<ChannelHandle>;

    async fn set_topic(&self, channel_id: &str, topic: &str) -> PlatformResult<()>;

    async fn set_purpose(&self, channel_id: &str, purpose: &str) -> PlatformResult<()>;

    async fn invite_user(&self, channel_id: &str, user_id: &str) -> PlatformResult<()>;

    /// Post `text` and return the new message's timestamp.
    async fn post_message(&self, channel: &str, text: &str) -> PlatformResult<String>;

    async fn add_reaction(
        &self,
        channel_id: &str,
        target: &ReactionTarget,
        emoji: &str,
    ) -> PlatformResult<()>;

    async fn file_metadata(&self, file_id: &str) -> PlatformResult<FileMetadata>;

    /// Most recent message at or before `ts` in `channel_id`.
    async fn fetch_message(
        &self,
        channel_id: &str,
        ts: &str,
    ) -> PlatformResult<Option<HistoryMessage>>;
}
