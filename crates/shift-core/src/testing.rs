//! In-memory [`ChatPlatform`] for tests. Enabled for this crate's unit
//! tests and, through the `testing` feature, for downstream test suites.

use crate::classifier::parse_platform_ts;
use crate::error::PlatformError;
use crate::platform::{
    ChannelHandle, ChatPlatform, FileMetadata, HistoryMessage, PlatformResult, ReactionTarget,
    UserDirectory,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Platform calls that can be told to fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailOn {
    CreateChannel,
    SetTopic,
    SetPurpose,
    InviteUser,
    /// Every post.
    PostMessage,
    /// Posts to one channel only.
    PostTo(String),
    AddReaction,
    UserInfo,
    FileInfo,
    FetchMessage,
}

#[derive(Default)]
struct State {
    users: HashMap<String, String>,
    files: HashMap<String, FileMetadata>,
    history: Vec<(String, HistoryMessage)>,
    channels: Vec<ChannelHandle>,
    topics: Vec<(String, String)>,
    purposes: Vec<(String, String)>,
    invites: Vec<(String, String)>,
    posts: Vec<(String, String)>,
    reactions: Vec<(String, ReactionTarget, String)>,
    failures: HashSet<FailOn>,
    user_lookups: usize,
    file_lookups: usize,
    history_lookups: usize,
}

#[derive(Default)]
pub struct FakePlatform {
    state: Mutex<State>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, call: FailOn, method: &str) -> PlatformResult<()> {
        if self.state().failures.contains(&call) {
            Err(PlatformError::api(method, "injected_failure"))
        } else {
            Ok(())
        }
    }

    pub fn add_user(&self, user_id: &str, name: &str) {
        self.state()
            .users
            .insert(user_id.to_string(), name.to_string());
    }

    pub fn add_file(&self, file_id: &str, metadata: FileMetadata) {
        self.state().files.insert(file_id.to_string(), metadata);
    }

    pub fn add_history(&self, channel_id: &str, message: HistoryMessage) {
        self.state()
            .history
            .push((channel_id.to_string(), message));
    }

    pub fn fail_on(&self, call: FailOn) {
        self.state().failures.insert(call);
    }

    pub fn channels(&self) -> Vec<ChannelHandle> {
        self.state().channels.clone()
    }

    pub fn topics(&self) -> Vec<(String, String)> {
        self.state().topics.clone()
    }

    pub fn purposes(&self) -> Vec<(String, String)> {
        self.state().purposes.clone()
    }

    pub fn invites(&self) -> Vec<(String, String)> {
        self.state().invites.clone()
    }

    /// Every `(channel, text)` posted, in order.
    pub fn posts(&self) -> Vec<(String, String)> {
        self.state().posts.clone()
    }

    pub fn posts_to(&self, channel: &str) -> Vec<String> {
        self.state()
            .posts
            .iter()
            .filter(|(c, _)| c == channel)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn reactions(&self) -> Vec<(String, ReactionTarget, String)> {
        self.state().reactions.clone()
    }

    pub fn user_lookups(&self) -> usize {
        self.state().user_lookups
    }

    pub fn file_lookups(&self) -> usize {
        self.state().file_lookups
    }

    pub fn history_lookups(&self) -> usize {
        self.state().history_lookups
    }
}

#[async_trait]
impl UserDirectory for FakePlatform {
    async fn display_name(&self, user_id: &str) -> PlatformResult<String> {
        self.state().user_lookups += 1;
        self.check(FailOn::UserInfo, "users.info")?;
        self.state()
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(format!("user {user_id}")))
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn create_channel(&self, name: &str) -> PlatformResult<ChannelHandle> {
        self.check(FailOn::CreateChannel, "conversations.create")?;
        let mut state = self.state();
        let handle = ChannelHandle {
            id: format!("C{:04}", state.channels.len() + 1),
            name: name.to_string(),
        };
        state.channels.push(handle.clone());
        Ok(handle)
    }

    async fn set_topic(&self, channel_id: &str, topic: &str) -> PlatformResult<()> {
        self.check(FailOn::SetTopic, "conversations.setTopic")?;
        self.state()
            .topics
            .push((channel_id.to_string(), topic.to_string()));
        Ok(())
    }

    async fn set_purpose(&self, channel_id: &str, purpose: &str) -> PlatformResult<()> {
        self.check(FailOn::SetPurpose, "conversations.setPurpose")?;
        self.state()
            .purposes
            .push((channel_id.to_string(), purpose.to_string()));
        Ok(())
    }

    async fn invite_user(&self, channel_id: &str, user_id: &str) -> PlatformResult<()> {
        self.check(FailOn::InviteUser, "conversations.invite")?;
        self.state()
            .invites
            .push((channel_id.to_string(), user_id.to_string()));
        Ok(())
    }

    async fn post_message(&self, channel: &str, text: &str) -> PlatformResult<String> {
        self.check(FailOn::PostMessage, "chat.postMessage")?;
        self.check(FailOn::PostTo(channel.to_string()), "chat.postMessage")?;
        let mut state = self.state();
        state.posts.push((channel.to_string(), text.to_string()));
        Ok(format!("{}.000100", 1_700_000_000 + state.posts.len()))
    }

    async fn add_reaction(
        &self,
        channel_id: &str,
        target: &ReactionTarget,
        emoji: &str,
    ) -> PlatformResult<()> {
        self.check(FailOn::AddReaction, "reactions.add")?;
        self.state()
            .reactions
            .push((channel_id.to_string(), target.clone(), emoji.to_string()));
        Ok(())
    }

    async fn file_metadata(&self, file_id: &str) -> PlatformResult<FileMetadata> {
        self.state().file_lookups += 1;
        self.check(FailOn::FileInfo, "files.info")?;
        self.state()
            .files
            .get(file_id)
            .cloned()
            .ok_or_else(|| PlatformError::api("files.info", "file_not_found"))
    }

    async fn fetch_message(
        &self,
        channel_id: &str,
        ts: &str,
    ) -> PlatformResult<Option<HistoryMessage>> {
        self.state().history_lookups += 1;
        self.check(FailOn::FetchMessage, "conversations.history")?;
        let state = self.state();
        let in_channel = state.history.iter().filter(|(c, _)| c == channel_id);

        if let Some((_, exact)) = in_channel.clone().find(|(_, m)| m.ts == ts) {
            return Ok(Some(exact.clone()));
        }
        let Some(latest) = parse_platform_ts(ts) else {
            return Ok(None);
        };
        Ok(in_channel
            .filter_map(|(_, m)| parse_platform_ts(&m.ts).map(|at| (at, m)))
            .filter(|(at, _)| *at <= latest)
            .max_by_key(|(at, _)| *at)
            .map(|(_, m)| m.clone()))
    }
}
