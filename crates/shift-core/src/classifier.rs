//! Turns inbound platform events into timeline entries.
//!
//! Each event is handled on its own: any lookup failure drops that event
//! (logged) and leaves the timeline untouched.

use crate::error::Result;
use crate::followup::{execute_follow_ups, FollowUpReport};
use crate::platform::ChatPlatform;
use crate::timeline::{AddOutcome, Entry, TimelineStore};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Reactions that pull the reacted-to message onto the timeline.
pub const CALL_OUT_REACTIONS: &[&str] = &["point_up", "point_up_2"];

const FILE_HOST_MARKER: &str = "files.slack.com";
const IMAGE_TOKEN: &str = "image";

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

/// Inner event payloads, in the platform's own JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Message(MessageEvent),
    ReactionAdded(ReactionEvent),
    FileShared(FileSharedEvent),
    #[serde(other)]
    Other,
}

impl InboundEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Message(_) => "message",
            InboundEvent::ReactionAdded(_) => "reaction_added",
            InboundEvent::FileShared(_) => "file_shared",
            InboundEvent::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
}

impl MessageEvent {
    /// Human-authored content, as opposed to joins, edits, bot posts and
    /// other system messages.
    pub fn is_content(&self) -> bool {
        self.subtype.is_none() && self.bot_id.is_none() && !self.user.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReactionEvent {
    #[serde(default)]
    pub user: String,
    pub reaction: String,
    pub item: ReactionItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReactionItem {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub ts: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileSharedEvent {
    pub file_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub channel_id: String,
}

/// Coarse pre-filter for messages that embed an uploaded image. Not MIME
/// inspection.
pub fn looks_like_image_message(text: &str) -> bool {
    text.contains(FILE_HOST_MARKER) && text.contains(IMAGE_TOKEN)
}

/// Parse a platform message timestamp (`"1733063452.000200"`).
pub fn parse_platform_ts(ts: &str) -> Option<DateTime<Utc>> {
    let (secs, frac) = match ts.split_once('.') {
        Some((secs, frac)) => (secs, frac),
        None => (ts, ""),
    };
    let secs: i64 = secs.parse().ok()?;
    if frac.len() > 9 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let nanos: u32 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<9}").parse().ok()?
    };
    Utc.timestamp_opt(secs, nanos).single()
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// An event that qualified for the timeline, with everything needed to
/// record it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Message {
        incident_id: String,
        user_id: String,
        text: String,
        message_ts: String,
    },
    Image {
        incident_id: String,
        user_id: String,
        image_url: String,
        caption: String,
        file_id: String,
    },
    Highlight {
        incident_id: String,
        user_id: String,
        text: String,
        message_ts: String,
        reaction: String,
        original_at: DateTime<Utc>,
    },
}

impl Classification {
    pub fn incident_id(&self) -> &str {
        match self {
            Classification::Message { incident_id, .. }
            | Classification::Image { incident_id, .. }
            | Classification::Highlight { incident_id, .. } => incident_id,
        }
    }

    pub fn entry_id(&self) -> String {
        match self {
            Classification::Message { message_ts, .. } => Entry::message_id(message_ts),
            Classification::Image { file_id, .. } => Entry::image_id(file_id),
            Classification::Highlight { message_ts, .. } => Entry::highlight_id(message_ts),
        }
    }
}

#[derive(Debug)]
pub enum RouteOutcome {
    Ignored,
    Duplicate { incident_id: String, entry_id: String },
    Recorded {
        incident_id: String,
        entry_id: String,
        entry_count: usize,
        report: FollowUpReport,
    },
}

// ---------------------------------------------------------------------------
// EventRouter
// ---------------------------------------------------------------------------

pub struct EventRouter {
    store: Arc<TimelineStore>,
    platform: Arc<dyn ChatPlatform>,
    capture_all_messages: bool,
}

impl EventRouter {
    pub fn new(
        store: Arc<TimelineStore>,
        platform: Arc<dyn ChatPlatform>,
        capture_all_messages: bool,
    ) -> Self {
        Self {
            store,
            platform,
            capture_all_messages,
        }
    }

    /// Classify, record, then run the follow-ups of a fresh append.
    pub async fn route(&self, event: &InboundEvent) -> Result<RouteOutcome> {
        let Some(classification) = self.classify(event).await else {
            return Ok(RouteOutcome::Ignored);
        };
        let incident_id = classification.incident_id().to_string();
        let entry_id = classification.entry_id();

        match self.record(classification).await? {
            AddOutcome::Duplicate => Ok(RouteOutcome::Duplicate {
                incident_id,
                entry_id,
            }),
            AddOutcome::Appended {
                entry_count,
                follow_ups,
            } => {
                let report = execute_follow_ups(self.platform.as_ref(), follow_ups).await;
                Ok(RouteOutcome::Recorded {
                    incident_id,
                    entry_id,
                    entry_count,
                    report,
                })
            }
        }
    }

    /// Decide whether `event` belongs on a timeline. `None` means drop it.
    pub async fn classify(&self, event: &InboundEvent) -> Option<Classification> {
        match event {
            InboundEvent::Message(msg) => self.classify_message(msg),
            InboundEvent::ReactionAdded(reaction) => self.classify_reaction(reaction).await,
            InboundEvent::FileShared(file) => self.classify_file(file).await,
            InboundEvent::Other => {
                tracing::debug!("unhandled inbound event type");
                None
            }
        }
    }

    async fn record(&self, classification: Classification) -> Result<AddOutcome> {
        match classification {
            Classification::Message {
                incident_id,
                user_id,
                text,
                message_ts,
            } => {
                self.store
                    .add_message_entry(&incident_id, &user_id, &text, &message_ts)
                    .await
            }
            Classification::Image {
                incident_id,
                user_id,
                image_url,
                caption,
                file_id,
            } => {
                self.store
                    .add_image_entry(&incident_id, &user_id, &image_url, &caption, &file_id)
                    .await
            }
            Classification::Highlight {
                incident_id,
                user_id,
                text,
                message_ts,
                reaction,
                original_at,
            } => {
                self.store
                    .add_highlighted_entry(
                        &incident_id,
                        &user_id,
                        &text,
                        &message_ts,
                        &reaction,
                        original_at,
                    )
                    .await
            }
        }
    }

    fn classify_message(&self, msg: &MessageEvent) -> Option<Classification> {
        let Some(incident_id) = self.store.incident_for_channel(&msg.channel) else {
            tracing::debug!(channel_id = %msg.channel, "skipping non-incident channel message");
            return None;
        };

        if !msg.is_content() {
            tracing::debug!(
                incident_id = %incident_id,
                subtype = ?msg.subtype,
                "skipping non-content message"
            );
            return None;
        }

        if !self.capture_all_messages && !looks_like_image_message(&msg.text) {
            tracing::debug!(
                incident_id = %incident_id,
                channel_id = %msg.channel,
                user = %msg.user,
                message_length = msg.text.len(),
                "skipping message (capture-all off and no image detected)"
            );
            return None;
        }

        tracing::info!(
            incident_id = %incident_id,
            channel_id = %msg.channel,
            user = %msg.user,
            message_length = msg.text.len(),
            "adding message to incident timeline"
        );
        Some(Classification::Message {
            incident_id,
            user_id: msg.user.clone(),
            text: msg.text.clone(),
            message_ts: msg.ts.clone(),
        })
    }

    async fn classify_reaction(&self, reaction: &ReactionEvent) -> Option<Classification> {
        if !CALL_OUT_REACTIONS.contains(&reaction.reaction.as_str()) {
            tracing::debug!(reaction = %reaction.reaction, "skipping unhandled reaction");
            return None;
        }

        let channel_id = &reaction.item.channel;
        let Some(incident_id) = self.store.incident_for_channel(channel_id) else {
            tracing::debug!(channel_id = %channel_id, "no incident for reaction channel");
            return None;
        };

        if self
            .store
            .has_entry(&incident_id, &Entry::highlight_id(&reaction.item.ts))
        {
            tracing::debug!(
                incident_id = %incident_id,
                message_ts = %reaction.item.ts,
                "message already highlighted"
            );
            return None;
        }

        tracing::info!(
            incident_id = %incident_id,
            channel_id = %channel_id,
            user = %reaction.user,
            reaction = %reaction.reaction,
            message_ts = %reaction.item.ts,
            "processing call-out reaction"
        );

        let message = match self
            .platform
            .fetch_message(channel_id, &reaction.item.ts)
            .await
        {
            Ok(Some(message)) => message,
            Ok(None) => {
                tracing::warn!(
                    incident_id = %incident_id,
                    channel_id = %channel_id,
                    message_ts = %reaction.item.ts,
                    "no message found for reaction"
                );
                return None;
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    incident_id = %incident_id,
                    channel_id = %channel_id,
                    message_ts = %reaction.item.ts,
                    "failed to get message for reaction"
                );
                return None;
            }
        };

        let original_at = match parse_platform_ts(&message.ts) {
            Some(at) => at,
            None => {
                tracing::warn!(raw_ts = %message.ts, "failed to parse message timestamp, using current time");
                self.store.now()
            }
        };

        Some(Classification::Highlight {
            incident_id,
            user_id: message.user,
            text: message.text,
            message_ts: message.ts,
            reaction: reaction.reaction.clone(),
            original_at,
        })
    }

    async fn classify_file(&self, file: &FileSharedEvent) -> Option<Classification> {
        let Some(incident_id) = self.store.incident_for_channel(&file.channel_id) else {
            tracing::debug!(
                channel_id = %file.channel_id,
                file_id = %file.file_id,
                "no incident for file channel"
            );
            return None;
        };

        if self.store.has_entry(&incident_id, &Entry::image_id(&file.file_id)) {
            tracing::debug!(incident_id = %incident_id, file_id = %file.file_id, "image already recorded");
            return None;
        }

        let info = match self.platform.file_metadata(&file.file_id).await {
            Ok(info) => info,
            Err(e) => {
                tracing::error!(error = %e, file_id = %file.file_id, "failed to get file info");
                return None;
            }
        };

        if !info.is_image() {
            tracing::debug!(
                incident_id = %incident_id,
                file_id = %file.file_id,
                mime_type = %info.mime_type,
                "skipping non-image file"
            );
            return None;
        }

        tracing::info!(
            incident_id = %incident_id,
            channel_id = %file.channel_id,
            file_id = %file.file_id,
            file_name = %info.name,
            mime_type = %info.mime_type,
            "adding image to incident timeline"
        );
        Some(Classification::Image {
            incident_id,
            user_id: file.user_id.clone(),
            caption: info.caption().to_string(),
            image_url: info.url,
            file_id: file.file_id.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::command::parse_command;
    use crate::incident::Incident;
    use crate::platform::{FileMetadata, HistoryMessage, ReactionTarget};
    use crate::testing::{FailOn, FakePlatform};
    use crate::timeline::{EntryDetail, EntryKind};
    use chrono::Duration;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 1, 14, 30, 52).unwrap()
    }

    struct Fixture {
        platform: Arc<FakePlatform>,
        clock: Arc<ManualClock>,
        store: Arc<TimelineStore>,
    }

    impl Fixture {
        async fn new() -> Self {
            let platform = Arc::new(FakePlatform::new());
            platform.add_user("U1", "alice");
            platform.add_user("U2", "bob");
            let clock = Arc::new(ManualClock::new(start()));
            let store = Arc::new(TimelineStore::new(platform.clone(), clock.clone()));
            let cmd = parse_command("start SEV1 incident the website is down")
                .unwrap()
                .with_actor("U1", "alice");
            store
                .create_timeline(&Incident::open("inc_a", &cmd, start()), "C1")
                .await;
            Self {
                platform,
                clock,
                store,
            }
        }

        fn router(&self, capture_all: bool) -> EventRouter {
            EventRouter::new(self.store.clone(), self.platform.clone(), capture_all)
        }
    }

    fn message(channel: &str, text: &str, ts: &str) -> InboundEvent {
        InboundEvent::Message(MessageEvent {
            channel: channel.to_string(),
            user: "U2".to_string(),
            text: text.to_string(),
            ts: ts.to_string(),
            subtype: None,
            bot_id: None,
        })
    }

    fn reaction(name: &str, ts: &str) -> InboundEvent {
        InboundEvent::ReactionAdded(ReactionEvent {
            user: "U1".to_string(),
            reaction: name.to_string(),
            item: ReactionItem {
                kind: "message".to_string(),
                channel: "C1".to_string(),
                ts: ts.to_string(),
            },
        })
    }

    fn file_shared(file_id: &str) -> InboundEvent {
        InboundEvent::FileShared(FileSharedEvent {
            file_id: file_id.to_string(),
            user_id: "U2".to_string(),
            channel_id: "C1".to_string(),
        })
    }

    fn png(title: &str) -> FileMetadata {
        FileMetadata {
            mime_type: "image/png".to_string(),
            name: "graph.png".to_string(),
            title: title.to_string(),
            url: "https://files.slack.com/files-pri/T1-F1/graph.png".to_string(),
        }
    }

    #[test]
    fn parses_platform_timestamps() {
        let at = parse_platform_ts("1733063452.000200").unwrap();
        assert_eq!(at.timestamp(), 1_733_063_452);
        assert_eq!(at.timestamp_subsec_micros(), 200);
        assert_eq!(parse_platform_ts("1733063452").unwrap().timestamp(), 1_733_063_452);
        assert!(parse_platform_ts("not-a-ts").is_none());
        assert!(parse_platform_ts("12.3x").is_none());
    }

    #[test]
    fn image_heuristic_needs_host_and_token() {
        assert!(looks_like_image_message("<https://files.slack.com/files-pri/x/image.png>"));
        assert!(!looks_like_image_message("https://files.slack.com/report.pdf"));
        assert!(!looks_like_image_message("see image above"));
    }

    #[test]
    fn deserializes_platform_payloads() {
        let event: InboundEvent = serde_json::from_str(
            r#"{"type":"reaction_added","user":"U1","reaction":"point_up",
                "item":{"type":"message","channel":"C1","ts":"1.2"},"event_ts":"1.3"}"#,
        )
        .unwrap();
        assert_eq!(event, reaction("point_up", "1.2"));

        let event: InboundEvent =
            serde_json::from_str(r#"{"type":"channel_created","channel":{"id":"C9"}}"#).unwrap();
        assert_eq!(event, InboundEvent::Other);

        let event: InboundEvent = serde_json::from_str(
            r#"{"type":"message","subtype":"channel_join","channel":"C1","user":"U2","text":"joined","ts":"1.1"}"#,
        )
        .unwrap();
        let InboundEvent::Message(msg) = event else {
            panic!("expected message");
        };
        assert!(!msg.is_content());
    }

    #[tokio::test]
    async fn message_dropped_when_capture_all_off_and_no_image() {
        let fx = Fixture::new().await;
        let outcome = fx.router(false).route(&message("C1", "looking into it", "1.1")).await.unwrap();
        assert!(matches!(outcome, RouteOutcome::Ignored));
        assert_eq!(fx.store.entries("inc_a").unwrap().len(), 1);
        assert!(fx.platform.posts().is_empty());
    }

    #[tokio::test]
    async fn image_message_captured_when_capture_all_off() {
        let fx = Fixture::new().await;
        let text = "<https://files.slack.com/files-pri/T1-F1/image.png>";
        let outcome = fx.router(false).route(&message("C1", text, "1.1")).await.unwrap();
        assert!(matches!(outcome, RouteOutcome::Recorded { entry_count: 2, .. }));
    }

    #[tokio::test]
    async fn capture_all_records_message_renders_and_acks() {
        let fx = Fixture::new().await;
        let outcome = fx.router(true).route(&message("C1", "restarting api", "1.1")).await.unwrap();
        let RouteOutcome::Recorded { entry_id, report, .. } = outcome else {
            panic!("expected record");
        };
        assert_eq!(entry_id, "message_1.1");
        assert!(report.is_clean());

        let entries = fx.store.entries("inc_a").unwrap();
        assert_eq!(entries[1].username, "bob");
        assert_eq!(entries[1].timestamp, start());
        let posts = fx.platform.posts_to("C1");
        assert_eq!(posts.len(), 1);
        assert!(posts[0].contains("restarting api"));
        assert_eq!(
            fx.platform.reactions(),
            vec![(
                "C1".to_string(),
                ReactionTarget::Message("1.1".to_string()),
                "white_check_mark".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn message_outside_incident_channel_ignored() {
        let fx = Fixture::new().await;
        let outcome = fx.router(true).route(&message("C_OTHER", "hi", "1.1")).await.unwrap();
        assert!(matches!(outcome, RouteOutcome::Ignored));
    }

    #[tokio::test]
    async fn system_and_bot_messages_ignored() {
        let fx = Fixture::new().await;
        let router = fx.router(true);
        let mut join = MessageEvent {
            channel: "C1".to_string(),
            user: "U2".to_string(),
            text: "has joined".to_string(),
            ts: "1.1".to_string(),
            subtype: Some("channel_join".to_string()),
            bot_id: None,
        };
        assert!(router.classify(&InboundEvent::Message(join.clone())).await.is_none());
        join.subtype = None;
        join.bot_id = Some("B1".to_string());
        assert!(router.classify(&InboundEvent::Message(join)).await.is_none());
    }

    #[tokio::test]
    async fn redelivered_message_is_duplicate() {
        let fx = Fixture::new().await;
        let router = fx.router(true);
        router.route(&message("C1", "hi", "1.1")).await.unwrap();
        let again = router.route(&message("C1", "hi", "1.1")).await.unwrap();
        assert!(matches!(again, RouteOutcome::Duplicate { .. }));
        assert_eq!(fx.platform.posts().len(), 1);
        assert_eq!(fx.store.entries("inc_a").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn call_out_reaction_records_original_time() {
        let fx = Fixture::new().await;
        fx.platform.add_history(
            "C1",
            HistoryMessage {
                user: "U2".to_string(),
                text: "db cpu at 100%".to_string(),
                ts: "1733063572.000200".to_string(),
            },
        );
        fx.clock.advance(Duration::minutes(30));

        let outcome = fx.router(false).route(&reaction("point_up_2", "1733063572.000200")).await.unwrap();
        assert!(matches!(outcome, RouteOutcome::Recorded { .. }));

        let entries = fx.store.entries("inc_a").unwrap();
        let highlight = &entries[1];
        assert_eq!(highlight.id, "highlighted_1733063572.000200");
        assert_eq!(highlight.kind(), EntryKind::Highlighted);
        assert_eq!(highlight.username, "bob");
        assert_eq!(highlight.timestamp, parse_platform_ts("1733063572.000200").unwrap());
        assert_ne!(highlight.timestamp, fx.clock.now());
        assert_eq!(
            highlight.detail,
            EntryDetail::Highlighted {
                message_id: "1733063572.000200".to_string(),
                reaction: "point_up_2".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn unparseable_history_ts_falls_back_to_now() {
        let fx = Fixture::new().await;
        fx.platform.add_history(
            "C1",
            HistoryMessage {
                user: "U2".to_string(),
                text: "odd".to_string(),
                ts: "garbage".to_string(),
            },
        );
        fx.clock.advance(Duration::minutes(5));
        let classification = fx.router(false).classify(&reaction("point_up", "garbage")).await.unwrap();
        let Classification::Highlight { original_at, .. } = classification else {
            panic!("expected highlight");
        };
        assert_eq!(original_at, start() + Duration::minutes(5));
    }

    #[tokio::test]
    async fn other_reactions_ignored_without_lookup() {
        let fx = Fixture::new().await;
        let outcome = fx.router(true).route(&reaction("thumbsup", "1.1")).await.unwrap();
        assert!(matches!(outcome, RouteOutcome::Ignored));
        assert_eq!(fx.platform.history_lookups(), 0);
    }

    #[tokio::test]
    async fn history_failure_aborts_only_that_event() {
        let fx = Fixture::new().await;
        fx.platform.fail_on(FailOn::FetchMessage);
        let router = fx.router(true);
        let outcome = router.route(&reaction("point_up", "1.1")).await.unwrap();
        assert!(matches!(outcome, RouteOutcome::Ignored));

        let outcome = router.route(&message("C1", "still here", "2.2")).await.unwrap();
        assert!(matches!(outcome, RouteOutcome::Recorded { .. }));
    }

    #[tokio::test]
    async fn repeated_call_out_skips_history_lookup() {
        let fx = Fixture::new().await;
        fx.platform.add_history(
            "C1",
            HistoryMessage {
                user: "U2".to_string(),
                text: "this".to_string(),
                ts: "5.5".to_string(),
            },
        );
        let router = fx.router(false);
        router.route(&reaction("point_up", "5.5")).await.unwrap();
        let again = router.route(&reaction("point_up_2", "5.5")).await.unwrap();
        assert!(matches!(again, RouteOutcome::Ignored));
        assert_eq!(fx.platform.history_lookups(), 1);
        assert_eq!(fx.store.entries("inc_a").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn image_file_recorded_once() {
        let fx = Fixture::new().await;
        fx.platform.add_file("F1", png(""));
        let router = fx.router(false);

        let outcome = router.route(&file_shared("F1")).await.unwrap();
        assert!(matches!(outcome, RouteOutcome::Recorded { .. }));
        router.route(&file_shared("F1")).await.unwrap();

        let entries = fx.store.entries("inc_a").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].content, "graph.png");
        assert_eq!(
            entries[1].detail,
            EntryDetail::Image {
                image_url: "https://files.slack.com/files-pri/T1-F1/graph.png".to_string(),
                file_id: "F1".to_string(),
            }
        );
        assert_eq!(fx.platform.file_lookups(), 1);
        assert_eq!(
            fx.platform.reactions()[0].1,
            ReactionTarget::File("F1".to_string())
        );
    }

    #[tokio::test]
    async fn image_caption_prefers_title() {
        let fx = Fixture::new().await;
        fx.platform.add_file("F2", png("p99 latency"));
        let classification = fx.router(false).classify(&file_shared("F2")).await.unwrap();
        assert!(matches!(classification, Classification::Image { caption, .. } if caption == "p99 latency"));
    }

    #[tokio::test]
    async fn non_image_file_dropped() {
        let fx = Fixture::new().await;
        fx.platform.add_file(
            "F3",
            FileMetadata {
                mime_type: "application/pdf".to_string(),
                name: "runbook.pdf".to_string(),
                title: String::new(),
                url: "https://files.slack.com/F3".to_string(),
            },
        );
        let outcome = fx.router(true).route(&file_shared("F3")).await.unwrap();
        assert!(matches!(outcome, RouteOutcome::Ignored));
    }

    #[tokio::test]
    async fn file_info_failure_dropped() {
        let fx = Fixture::new().await;
        let outcome = fx.router(true).route(&file_shared("F_UNKNOWN")).await.unwrap();
        assert!(matches!(outcome, RouteOutcome::Ignored));
        assert_eq!(fx.store.entries("inc_a").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ack_failure_does_not_fail_route() {
        let fx = Fixture::new().await;
        fx.platform.fail_on(FailOn::AddReaction);
        let outcome = fx.router(true).route(&message("C1", "hi", "1.1")).await.unwrap();
        let RouteOutcome::Recorded { report, .. } = outcome else {
            panic!("expected record");
        };
        assert_eq!(report.failed.len(), 1);
        assert_eq!(fx.store.entries("inc_a").unwrap().len(), 2);
    }
}
