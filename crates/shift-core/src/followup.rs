use crate::error::PlatformError;
use crate::platform::{ChatPlatform, ReactionTarget};
use serde::Serialize;

/// Side effects requested by a timeline mutation, run by the caller after
/// the mutation has committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FollowUp {
    /// Post the freshly rendered timeline as a new message.
    PostTimeline { channel_id: String, text: String },
    /// Mark a source item as recorded.
    Acknowledge {
        channel_id: String,
        target: ReactionTarget,
        emoji: String,
    },
}

#[derive(Debug, Default)]
pub struct FollowUpReport {
    pub completed: usize,
    pub failed: Vec<(FollowUp, PlatformError)>,
}

impl FollowUpReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run every follow-up; one failing does not stop the rest.
pub async fn execute_follow_ups(
    platform: &dyn ChatPlatform,
    follow_ups: Vec<FollowUp>,
) -> FollowUpReport {
    let mut report = FollowUpReport::default();
    for follow_up in follow_ups {
        let result = match &follow_up {
            FollowUp::PostTimeline { channel_id, text } => {
                tracing::debug!(channel_id, message_length = text.len(), "posting timeline to channel");
                platform.post_message(channel_id, text).await.map(|_| ())
            }
            FollowUp::Acknowledge {
                channel_id,
                target,
                emoji,
            } => platform.add_reaction(channel_id, target, emoji).await,
        };

        match result {
            Ok(()) => report.completed += 1,
            Err(e) => {
                match &follow_up {
                    FollowUp::PostTimeline { channel_id, .. } => {
                        tracing::error!(error = %e, channel_id, "failed to update timeline in channel");
                    }
                    FollowUp::Acknowledge { channel_id, target, .. } => {
                        tracing::warn!(
                            error = %e,
                            channel_id,
                            target = %target,
                            "failed to add reaction to source (non-critical)"
                        );
                    }
                }
                report.failed.push((follow_up, e));
            }
        }
    }
    report
}
