//! Slack Web API client backing [`ChatPlatform`].

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::Value;
use shift_core::platform::{
    ChannelHandle, ChatPlatform, FileMetadata, HistoryMessage, PlatformResult, ReactionTarget,
    UserDirectory,
};
use shift_core::PlatformError;

#[derive(Debug, Deserialize)]
struct CreateChannelResponse {
    channel: ChannelHandle,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ts: String,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    user: SlackUser,
}

#[derive(Debug, Deserialize)]
struct SlackUser {
    name: String,
}

#[derive(Debug, Deserialize)]
struct FileInfoResponse {
    file: SlackFile,
}

#[derive(Debug, Deserialize)]
struct SlackFile {
    #[serde(default)]
    mimetype: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url_private: String,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    messages: Vec<SlackMessage>,
}

#[derive(Debug, Deserialize)]
struct SlackMessage {
    #[serde(default)]
    user: String,
    #[serde(default)]
    text: String,
    ts: String,
}

#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl SlackClient {
    pub fn new(api_base: &str, bot_token: &str, request_timeout_ms: u64) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("shift-incident-bot"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create slack api client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.trim().to_string(),
        })
    }

    /// POST a form-encoded Web API call and decode the `{ok, error, ...}`
    /// envelope.
    async fn call<T>(&self, method: &str, params: &[(&str, &str)]) -> PlatformResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}/{method}", self.api_base))
            .bearer_auth(&self.bot_token)
            .form(params)
            .send()
            .await
            .map_err(|e| PlatformError::Transport(format!("{method}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::api(method, format!("http status {}", status.as_u16())));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PlatformError::Decode(format!("{method}: {e}")))?;

        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error");
            return Err(PlatformError::api(method, error));
        }

        serde_json::from_value(body).map_err(|e| PlatformError::Decode(format!("{method}: {e}")))
    }
}

#[async_trait]
impl UserDirectory for SlackClient {
    async fn display_name(&self, user_id: &str) -> PlatformResult<String> {
        let response: UserInfoResponse = self.call("users.info", &[("user", user_id)]).await?;
        Ok(response.user.name)
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn create_channel(&self, name: &str) -> PlatformResult<ChannelHandle> {
        let response: CreateChannelResponse = self
            .call("conversations.create", &[("name", name), ("is_private", "false")])
            .await?;
        Ok(response.channel)
    }

    async fn set_topic(&self, channel_id: &str, topic: &str) -> PlatformResult<()> {
        let _: IgnoredAny = self
            .call("conversations.setTopic", &[("channel", channel_id), ("topic", topic)])
            .await?;
        Ok(())
    }

    async fn set_purpose(&self, channel_id: &str, purpose: &str) -> PlatformResult<()> {
        let _: IgnoredAny = self
            .call(
                "conversations.setPurpose",
                &[("channel", channel_id), ("purpose", purpose)],
            )
            .await?;
        Ok(())
    }

    async fn invite_user(&self, channel_id: &str, user_id: &str) -> PlatformResult<()> {
        let _: IgnoredAny = self
            .call("conversations.invite", &[("channel", channel_id), ("users", user_id)])
            .await?;
        Ok(())
    }

    async fn post_message(&self, channel: &str, text: &str) -> PlatformResult<String> {
        let response: PostMessageResponse = self
            .call("chat.postMessage", &[("channel", channel), ("text", text)])
            .await?;
        Ok(response.ts)
    }

    async fn add_reaction(
        &self,
        channel_id: &str,
        target: &ReactionTarget,
        emoji: &str,
    ) -> PlatformResult<()> {
        let params: [(&str, &str); 3] = match target {
            ReactionTarget::Message(ts) => {
                [("channel", channel_id), ("timestamp", ts.as_str()), ("name", emoji)]
            }
            ReactionTarget::File(id) => {
                [("channel", channel_id), ("file", id.as_str()), ("name", emoji)]
            }
        };
        let _: IgnoredAny = self.call("reactions.add", &params).await?;
        Ok(())
    }

    async fn file_metadata(&self, file_id: &str) -> PlatformResult<FileMetadata> {
        let response: FileInfoResponse = self.call("files.info", &[("file", file_id)]).await?;
        Ok(FileMetadata {
            mime_type: response.file.mimetype,
            name: response.file.name,
            title: response.file.title,
            url: response.file.url_private,
        })
    }

    async fn fetch_message(
        &self,
        channel_id: &str,
        ts: &str,
    ) -> PlatformResult<Option<HistoryMessage>> {
        let response: HistoryResponse = self
            .call(
                "conversations.history",
                &[
                    ("channel", channel_id),
                    ("latest", ts),
                    ("limit", "1"),
                    ("inclusive", "true"),
                ],
            )
            .await?;
        Ok(response.messages.into_iter().next().map(|m| HistoryMessage {
            user: m.user,
            text: m.text,
            ts: m.ts,
        }))
    }
}
