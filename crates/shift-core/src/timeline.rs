//! The per-incident, append-only timeline and the store that owns them.
//!
//! Locking: the incident registry and the channel index each have their own
//! lock, and every timeline guards its entries and `last_updated` together.
//! Appending to incident A never waits on incident B. No lock is held across
//! an `.await`; rendering and acknowledgements are handed back to the caller
//! as [`FollowUp`]s built from a copied snapshot.

use crate::clock::Clock;
use crate::error::{Result, ShiftError};
use crate::followup::FollowUp;
use crate::identity::IdentityCache;
use crate::incident::Incident;
use crate::platform::{ReactionTarget, UserDirectory};
use crate::render::render_channel_timeline;
use crate::types::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Reaction added to source messages once they are on the timeline.
pub const ACK_EMOJI: &str = "white_check_mark";

// ---------------------------------------------------------------------------
// EntryKind / EntryDetail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    IncidentStart,
    Message,
    Image,
    Highlighted,
    BotInteraction,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::IncidentStart => "incident_start",
            EntryKind::Message => "message",
            EntryKind::Image => "image",
            EntryKind::Highlighted => "highlighted",
            EntryKind::BotInteraction => "bot_interaction",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of an entry. Serialized as `kind` + `metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "metadata", rename_all = "snake_case")]
pub enum EntryDetail {
    IncidentStart {
        severity: Severity,
        title: String,
        description: String,
    },
    Message {
        message_id: String,
    },
    Image {
        image_url: String,
        file_id: String,
    },
    Highlighted {
        message_id: String,
        reaction: String,
    },
    BotInteraction,
}

impl EntryDetail {
    pub fn kind(&self) -> EntryKind {
        match self {
            EntryDetail::IncidentStart { .. } => EntryKind::IncidentStart,
            EntryDetail::Message { .. } => EntryKind::Message,
            EntryDetail::Image { .. } => EntryKind::Image,
            EntryDetail::Highlighted { .. } => EntryKind::Highlighted,
            EntryDetail::BotInteraction => EntryKind::BotInteraction,
        }
    }

    /// The platform-visible item this entry was recorded from, if any.
    pub fn source(&self) -> Option<ReactionTarget> {
        match self {
            EntryDetail::Message { message_id } | EntryDetail::Highlighted { message_id, .. } => {
                Some(ReactionTarget::Message(message_id.clone()))
            }
            EntryDetail::Image { file_id, .. } => Some(ReactionTarget::File(file_id.clone())),
            EntryDetail::IncidentStart { .. } | EntryDetail::BotInteraction => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Deterministic dedup key, see the `*_id` constructors.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub username: String,
    pub content: String,
    #[serde(flatten)]
    pub detail: EntryDetail,
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        self.detail.kind()
    }

    pub fn genesis_id(incident_id: &str) -> String {
        format!("incident_start_{incident_id}")
    }

    pub fn message_id(message_ts: &str) -> String {
        format!("message_{message_ts}")
    }

    pub fn image_id(file_id: &str) -> String {
        format!("image_{file_id}")
    }

    pub fn highlight_id(message_ts: &str) -> String {
        format!("highlighted_{message_ts}")
    }

    pub fn bot_interaction_id(user_id: &str, nanos: i64) -> String {
        format!("bot_interaction_{user_id}_{nanos}")
    }
}

// ---------------------------------------------------------------------------
// Timeline (exported copy)
// ---------------------------------------------------------------------------

/// A point-in-time copy of one incident's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub incident_id: String,
    pub channel_id: String,
    pub last_updated: DateTime<Utc>,
    pub entries: Vec<Entry>,
}

impl Timeline {
    pub fn genesis(&self) -> Option<&Entry> {
        self.entries
            .first()
            .filter(|e| e.kind() == EntryKind::IncidentStart)
    }
}

struct TimelineLog {
    entries: Vec<Entry>,
    last_updated: DateTime<Utc>,
}

struct TimelineCell {
    incident_id: String,
    channel_id: String,
    log: RwLock<TimelineLog>,
}

impl TimelineCell {
    fn snapshot(&self) -> Timeline {
        let log = self.log.read().unwrap_or_else(PoisonError::into_inner);
        Timeline {
            incident_id: self.incident_id.clone(),
            channel_id: self.channel_id.clone(),
            last_updated: log.last_updated,
            entries: log.entries.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// AddOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Appended {
        entry_count: usize,
        follow_ups: Vec<FollowUp>,
    },
    /// An entry with the same ID was already recorded; nothing changed.
    Duplicate,
}

impl AddOutcome {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, AddOutcome::Duplicate)
    }

    pub fn into_follow_ups(self) -> Vec<FollowUp> {
        match self {
            AddOutcome::Appended { follow_ups, .. } => follow_ups,
            AddOutcome::Duplicate => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// TimelineStore
// ---------------------------------------------------------------------------

pub struct TimelineStore {
    timelines: RwLock<HashMap<String, Arc<TimelineCell>>>,
    channels: RwLock<HashMap<String, String>>,
    identities: IdentityCache,
    clock: Arc<dyn Clock>,
    last_bot_nanos: AtomicI64,
}

impl TimelineStore {
    pub fn new(directory: Arc<dyn UserDirectory>, clock: Arc<dyn Clock>) -> Self {
        Self {
            timelines: RwLock::new(HashMap::new()),
            channels: RwLock::new(HashMap::new()),
            identities: IdentityCache::new(directory),
            clock,
            last_bot_nanos: AtomicI64::new(i64::MIN),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Register a timeline for `incident`, seeded with its genesis entry, and
    /// map `channel_id` to it. Calling this again for the same incident keeps
    /// the existing timeline. Nothing is posted to the channel.
    pub async fn create_timeline(&self, incident: &Incident, channel_id: &str) -> Timeline {
        tracing::info!(
            incident_id = %incident.id,
            channel_id,
            severity = %incident.severity,
            title = %incident.title,
            "creating timeline for incident"
        );

        let username = self.identities.resolve(&incident.started_by).await;
        let genesis = Entry {
            id: Entry::genesis_id(&incident.id),
            timestamp: incident.started_at,
            user_id: incident.started_by.clone(),
            username,
            content: format!("🚨 {} Incident Started", incident.severity),
            detail: EntryDetail::IncidentStart {
                severity: incident.severity,
                title: incident.title.clone(),
                description: incident.description.clone(),
            },
        };

        let cell = {
            let mut timelines = self.timelines.write().unwrap_or_else(PoisonError::into_inner);
            timelines
                .entry(incident.id.clone())
                .or_insert_with(|| {
                    Arc::new(TimelineCell {
                        incident_id: incident.id.clone(),
                        channel_id: channel_id.to_string(),
                        log: RwLock::new(TimelineLog {
                            entries: vec![genesis],
                            last_updated: self.clock.now(),
                        }),
                    })
                })
                .clone()
        };

        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(cell.channel_id.clone())
            .or_insert_with(|| incident.id.clone());

        let timeline = cell.snapshot();
        tracing::info!(
            incident_id = %incident.id,
            channel_id = %timeline.channel_id,
            entries = timeline.entries.len(),
            "timeline created"
        );
        timeline
    }

    fn cell(&self, incident_id: &str) -> Option<Arc<TimelineCell>> {
        self.timelines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(incident_id)
            .cloned()
    }

    pub fn get_timeline(&self, incident_id: &str) -> Option<Timeline> {
        let timeline = self.cell(incident_id).map(|cell| cell.snapshot());
        match &timeline {
            Some(t) => tracing::debug!(
                incident_id,
                entries = t.entries.len(),
                last_updated = %t.last_updated,
                "timeline retrieved"
            ),
            None => tracing::debug!(incident_id, "timeline not found"),
        }
        timeline
    }

    /// Incident ID for a channel, if the channel belongs to a tracked incident.
    pub fn incident_for_channel(&self, channel_id: &str) -> Option<String> {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel_id)
            .cloned()
    }

    pub fn incident_count(&self) -> usize {
        self.timelines.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Append `entry` unless an entry with the same ID already exists.
    ///
    /// On append, the returned follow-ups re-render the whole timeline to the
    /// incident channel and, for entries recorded from a platform item,
    /// acknowledge that item. The append has already happened whatever the
    /// follow-ups do.
    pub fn add_entry(&self, incident_id: &str, entry: Entry) -> Result<AddOutcome> {
        let Some(cell) = self.cell(incident_id) else {
            tracing::error!(
                incident_id,
                entry_kind = %entry.kind(),
                entry_id = %entry.id,
                "timeline not found for entry"
            );
            return Err(ShiftError::TimelineNotFound(incident_id.to_string()));
        };

        let snapshot = {
            let mut log = cell.log.write().unwrap_or_else(PoisonError::into_inner);
            if log.entries.iter().any(|e| e.id == entry.id) {
                tracing::debug!(
                    incident_id,
                    entry_id = %entry.id,
                    entry_kind = %entry.kind(),
                    "duplicate entry skipped"
                );
                return Ok(AddOutcome::Duplicate);
            }
            log.entries.push(entry.clone());
            log.last_updated = self.clock.now();
            log.entries.clone()
        };

        let entry_count = snapshot.len();
        tracing::info!(
            incident_id,
            entry_kind = %entry.kind(),
            entry_id = %entry.id,
            user = %entry.username,
            total_entries = entry_count,
            "entry added to timeline"
        );

        let mut follow_ups = vec![FollowUp::PostTimeline {
            channel_id: cell.channel_id.clone(),
            text: render_channel_timeline(&snapshot),
        }];
        if let Some(target) = entry.detail.source() {
            follow_ups.push(FollowUp::Acknowledge {
                channel_id: cell.channel_id.clone(),
                target,
                emoji: ACK_EMOJI.to_string(),
            });
        }

        Ok(AddOutcome::Appended {
            entry_count,
            follow_ups,
        })
    }

    async fn build_entry(
        &self,
        id: String,
        timestamp: DateTime<Utc>,
        user_id: &str,
        content: &str,
        detail: EntryDetail,
    ) -> Entry {
        let username = self.identities.resolve(user_id).await;
        Entry {
            id,
            timestamp,
            user_id: user_id.to_string(),
            username,
            content: content.to_string(),
            detail,
        }
    }

    pub async fn add_message_entry(
        &self,
        incident_id: &str,
        user_id: &str,
        text: &str,
        message_ts: &str,
    ) -> Result<AddOutcome> {
        tracing::debug!(incident_id, user_id, message_id = message_ts, "adding message entry");
        let entry = self
            .build_entry(
                Entry::message_id(message_ts),
                self.clock.now(),
                user_id,
                text,
                EntryDetail::Message {
                    message_id: message_ts.to_string(),
                },
            )
            .await;
        self.add_entry(incident_id, entry)
    }

    pub async fn add_image_entry(
        &self,
        incident_id: &str,
        user_id: &str,
        image_url: &str,
        caption: &str,
        file_id: &str,
    ) -> Result<AddOutcome> {
        tracing::debug!(incident_id, user_id, file_id, image_url, caption, "adding image entry");
        let entry = self
            .build_entry(
                Entry::image_id(file_id),
                self.clock.now(),
                user_id,
                caption,
                EntryDetail::Image {
                    image_url: image_url.to_string(),
                    file_id: file_id.to_string(),
                },
            )
            .await;
        self.add_entry(incident_id, entry)
    }

    /// Record a called-out message at the time it was originally posted.
    pub async fn add_highlighted_entry(
        &self,
        incident_id: &str,
        user_id: &str,
        text: &str,
        message_ts: &str,
        reaction: &str,
        original_at: DateTime<Utc>,
    ) -> Result<AddOutcome> {
        tracing::debug!(
            incident_id,
            user_id,
            message_id = message_ts,
            reaction,
            original_at = %original_at,
            "adding highlighted entry"
        );
        let entry = self
            .build_entry(
                Entry::highlight_id(message_ts),
                original_at,
                user_id,
                text,
                EntryDetail::Highlighted {
                    message_id: message_ts.to_string(),
                    reaction: reaction.to_string(),
                },
            )
            .await;
        self.add_entry(incident_id, entry)
    }

    pub async fn add_bot_interaction_entry(
        &self,
        incident_id: &str,
        user_id: &str,
        interaction: &str,
    ) -> Result<AddOutcome> {
        tracing::debug!(incident_id, user_id, interaction, "adding bot interaction entry");
        let now = self.clock.now();
        let id = Entry::bot_interaction_id(user_id, self.next_bot_nanos(now));
        let entry = self
            .build_entry(id, now, user_id, interaction, EntryDetail::BotInteraction)
            .await;
        self.add_entry(incident_id, entry)
    }

    /// Nanosecond stamp for bot-interaction IDs, strictly increasing per store
    /// so back-to-back calls within one clock tick still get distinct IDs.
    fn next_bot_nanos(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1000));
        let previous = self
            .last_bot_nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(candidate.max(last.saturating_add(1)))
            })
            .unwrap_or(i64::MIN);
        candidate.max(previous.saturating_add(1))
    }

    pub fn entries(&self, incident_id: &str) -> Result<Vec<Entry>> {
        let cell = self
            .cell(incident_id)
            .ok_or_else(|| ShiftError::TimelineNotFound(incident_id.to_string()))?;
        let log = cell.log.read().unwrap_or_else(PoisonError::into_inner);
        Ok(log.entries.clone())
    }

    pub fn last_updated(&self, incident_id: &str) -> Result<DateTime<Utc>> {
        let cell = self
            .cell(incident_id)
            .ok_or_else(|| ShiftError::TimelineNotFound(incident_id.to_string()))?;
        let log = cell.log.read().unwrap_or_else(PoisonError::into_inner);
        Ok(log.last_updated)
    }

    pub fn has_entry(&self, incident_id: &str, entry_id: &str) -> bool {
        let Some(cell) = self.cell(incident_id) else {
            return false;
        };
        let log = cell.log.read().unwrap_or_else(PoisonError::into_inner);
        log.entries.iter().any(|e| e.id == entry_id)
    }

    /// Pretty-printed JSON export of the whole timeline, taken under its
    /// read lock.
    pub fn export_timeline(&self, incident_id: &str) -> Result<String> {
        tracing::info!(incident_id, "exporting timeline");
        let Some(cell) = self.cell(incident_id) else {
            tracing::error!(incident_id, "timeline not found for export");
            return Err(ShiftError::TimelineNotFound(incident_id.to_string()));
        };
        let data = serde_json::to_string_pretty(&cell.snapshot())?;
        tracing::info!(incident_id, data_size = data.len(), "timeline exported");
        Ok(data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::command::parse_command;
    use crate::testing::FakePlatform;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 1, 14, 30, 52).unwrap()
    }

    fn incident(id: &str) -> Incident {
        let cmd = parse_command("start SEV1 incident the website is down -- 500s everywhere")
            .unwrap()
            .with_actor("U1", "alice");
        Incident::open(id, &cmd, start())
    }

    fn store() -> (Arc<FakePlatform>, Arc<ManualClock>, TimelineStore) {
        let platform = Arc::new(FakePlatform::new());
        platform.add_user("U1", "alice");
        platform.add_user("U2", "bob");
        let clock = Arc::new(ManualClock::new(start()));
        let store = TimelineStore::new(platform.clone(), clock.clone());
        (platform, clock, store)
    }

    #[tokio::test]
    async fn create_timeline_seeds_genesis_and_channel_index() {
        let (_, _, store) = store();
        let t = store.create_timeline(&incident("inc_a"), "C1").await;

        assert_eq!(t.entries.len(), 1);
        let genesis = t.genesis().unwrap();
        assert_eq!(genesis.id, "incident_start_inc_a");
        assert_eq!(genesis.username, "alice");
        assert_eq!(genesis.timestamp, start());
        assert_eq!(store.incident_for_channel("C1").as_deref(), Some("inc_a"));
        assert_eq!(store.incident_for_channel("C2"), None);
    }

    #[tokio::test]
    async fn create_timeline_twice_keeps_first() {
        let (_, _, store) = store();
        store.create_timeline(&incident("inc_a"), "C1").await;
        store.add_message_entry("inc_a", "U2", "hi", "1.1").await.unwrap();
        let again = store.create_timeline(&incident("inc_a"), "C1").await;
        assert_eq!(again.entries.len(), 2);
        assert_eq!(store.incident_count(), 1);
    }

    #[tokio::test]
    async fn add_entry_unknown_incident_is_not_found() {
        let (_, _, store) = store();
        store.create_timeline(&incident("inc_a"), "C1").await;

        let err = store.add_message_entry("inc_missing", "U2", "hi", "1.1").await.unwrap_err();
        assert!(matches!(err, ShiftError::TimelineNotFound(id) if id == "inc_missing"));
        assert_eq!(store.entries("inc_a").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_entry_is_a_silent_no_op() {
        let (_, clock, store) = store();
        store.create_timeline(&incident("inc_a"), "C1").await;

        let first = store
            .add_image_entry("inc_a", "U2", "https://files/F1", "graph", "F1")
            .await
            .unwrap();
        assert!(!first.is_duplicate());
        let updated = store.last_updated("inc_a").unwrap();

        clock.advance(Duration::seconds(30));
        let second = store
            .add_image_entry("inc_a", "U2", "https://files/F1", "graph", "F1")
            .await
            .unwrap();
        assert_eq!(second, AddOutcome::Duplicate);
        assert!(second.into_follow_ups().is_empty());
        assert_eq!(store.entries("inc_a").unwrap().len(), 2);
        assert_eq!(store.last_updated("inc_a").unwrap(), updated);
    }

    #[tokio::test]
    async fn append_returns_render_and_ack_follow_ups() {
        let (_, _, store) = store();
        store.create_timeline(&incident("inc_a"), "C1").await;

        let outcome = store.add_message_entry("inc_a", "U2", "rolled back", "1700.1").await.unwrap();
        let AddOutcome::Appended { entry_count, follow_ups } = outcome else {
            panic!("expected append");
        };
        assert_eq!(entry_count, 2);
        assert_eq!(follow_ups.len(), 2);
        assert!(matches!(
            &follow_ups[0],
            FollowUp::PostTimeline { channel_id, text } if channel_id == "C1" && text.contains("rolled back")
        ));
        assert_eq!(
            follow_ups[1],
            FollowUp::Acknowledge {
                channel_id: "C1".to_string(),
                target: ReactionTarget::Message("1700.1".to_string()),
                emoji: ACK_EMOJI.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn bot_interaction_has_no_ack_and_unique_ids() {
        let (_, _, store) = store();
        store.create_timeline(&incident("inc_a"), "C1").await;

        let a = store.add_bot_interaction_entry("inc_a", "U1", "viewed timeline").await.unwrap();
        let b = store.add_bot_interaction_entry("inc_a", "U1", "viewed timeline").await.unwrap();
        assert_eq!(a.into_follow_ups().len(), 1);
        assert!(!b.is_duplicate());

        let entries = store.entries("inc_a").unwrap();
        assert_eq!(entries.len(), 3);
        assert_ne!(entries[1].id, entries[2].id);
        let nanos = start().timestamp_nanos_opt().unwrap();
        assert_eq!(entries[1].id, format!("bot_interaction_U1_{nanos}"));
        assert_eq!(entries[2].id, format!("bot_interaction_U1_{}", nanos + 1));
    }

    #[tokio::test]
    async fn highlighted_entry_keeps_original_time() {
        let (_, clock, store) = store();
        store.create_timeline(&incident("inc_a"), "C1").await;
        clock.advance(Duration::minutes(10));

        let original = start() + Duration::minutes(2);
        store
            .add_highlighted_entry("inc_a", "U2", "db is at 100% cpu", "1733063572.000200", "point_up", original)
            .await
            .unwrap();

        let entries = store.entries("inc_a").unwrap();
        assert_eq!(entries[1].id, "highlighted_1733063572.000200");
        assert_eq!(entries[1].timestamp, original);
        assert_eq!(store.last_updated("inc_a").unwrap(), start() + Duration::minutes(10));
    }

    #[tokio::test]
    async fn entries_are_copies() {
        let (_, _, store) = store();
        store.create_timeline(&incident("inc_a"), "C1").await;
        let mut copy = store.entries("inc_a").unwrap();
        copy.clear();
        assert_eq!(store.entries("inc_a").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn has_entry_probe() {
        let (_, _, store) = store();
        store.create_timeline(&incident("inc_a"), "C1").await;
        store.add_message_entry("inc_a", "U2", "hi", "9.9").await.unwrap();
        assert!(store.has_entry("inc_a", "message_9.9"));
        assert!(!store.has_entry("inc_a", "message_1.0"));
        assert!(!store.has_entry("inc_missing", "message_9.9"));
    }

    #[tokio::test]
    async fn export_is_field_labelled() {
        let (_, _, store) = store();
        let mut inc = incident("inc_a");
        inc.description.clear();
        inc.title = "the website is down".to_string();
        store.create_timeline(&inc, "C1").await;

        let json: serde_json::Value = serde_json::from_str(&store.export_timeline("inc_a").unwrap()).unwrap();
        assert_eq!(json["incident_id"], "inc_a");
        assert_eq!(json["channel_id"], "C1");
        assert!(json["last_updated"].is_string());
        let first = &json["entries"][0];
        assert_eq!(first["kind"], "incident_start");
        assert_eq!(first["metadata"]["title"], "the website is down");
        assert_eq!(first["metadata"]["severity"], "SEV1");
        assert_eq!(first["user_id"], "U1");

        assert!(matches!(
            store.export_timeline("nope"),
            Err(ShiftError::TimelineNotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_lose_nothing() {
        let (_, _, store) = store();
        let store = Arc::new(store);
        store.create_timeline(&incident("inc_a"), "C1").await;
        store.create_timeline(&incident("inc_b"), "C2").await;

        let mut handles = Vec::new();
        for worker in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..50 {
                    // Every ID is submitted by two workers.
                    let ts = format!("{}.{}", worker % 4, i);
                    store.add_message_entry("inc_a", "U2", "msg", &ts).await.unwrap();
                    let seen = store.entries("inc_a").unwrap();
                    assert_eq!(seen[0].kind(), EntryKind::IncidentStart);
                    store.add_message_entry("inc_b", "U1", "msg", &ts).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.entries("inc_a").unwrap().len(), 1 + 4 * 50);
        assert_eq!(store.entries("inc_b").unwrap().len(), 1 + 4 * 50);
    }
}
