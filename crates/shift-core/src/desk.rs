//! Slash-command handling: help, timeline views, and incident start-up.

use crate::clock::Clock;
use crate::command::{help_message, parse_command, Command};
use crate::error::{Result, ShiftError};
use crate::ident::generate_incident_id;
use crate::incident::Incident;
use crate::platform::{ChannelHandle, ChatPlatform};
use crate::render::render_timeline_view;
use crate::timeline::TimelineStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const TIMELINE_SUBCOMMAND: &str = "timeline";
pub const HELP_SUBCOMMAND: &str = "help";

pub const MSG_NOT_INCIDENT_CHANNEL: &str = "❌ This command can only be used in incident channels.";
pub const MSG_TIMELINE_NOT_FOUND: &str = "❌ Timeline not found for this incident.";
pub const MSG_INCIDENT_CREATED: &str =
    "Incident created successfully! Check the notifications channel for details.";

/// A slash-command invocation as delivered by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashRequest {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub channel_id: String,
}

/// Ephemeral reply shown only to the invoking user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlashReply {
    pub text: String,
}

impl SlashReply {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// What `start_incident` produced.
#[derive(Debug, Clone)]
pub struct StartedIncident {
    pub incident: Incident,
    pub channel: ChannelHandle,
}

pub struct IncidentDesk {
    platform: Arc<dyn ChatPlatform>,
    store: Arc<TimelineStore>,
    clock: Arc<dyn Clock>,
    slash_command: String,
    notifications_channel: String,
}

impl IncidentDesk {
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        store: Arc<TimelineStore>,
        clock: Arc<dyn Clock>,
        slash_command: impl Into<String>,
        notifications_channel: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            store,
            clock,
            slash_command: slash_command.into(),
            notifications_channel: notifications_channel.into(),
        }
    }

    pub fn help(&self) -> String {
        help_message(&self.slash_command)
    }

    pub async fn handle_command(&self, request: SlashRequest) -> SlashReply {
        tracing::info!(
            command = %request.command,
            user = %request.user_name,
            text = %request.text,
            channel_id = %request.channel_id,
            "received slash command"
        );

        let text = request.text.trim();
        if text == TIMELINE_SUBCOMMAND {
            return self.timeline_reply(&request);
        }
        if text.is_empty() || text == HELP_SUBCOMMAND {
            return SlashReply::new(self.help());
        }

        let command = match parse_command(text) {
            Ok(command) => command.with_actor(&request.user_id, &request.user_name),
            Err(e) => {
                tracing::debug!(error = %e, user = %request.user_name, "rejected slash command");
                return SlashReply::new(format!("Error: {e}\n\n{}", self.help()));
            }
        };

        match self.start_incident(&command).await {
            Ok(_) => SlashReply::new(MSG_INCIDENT_CREATED),
            Err(e) => {
                tracing::error!(error = %e, user = %request.user_name, "failed to create incident");
                SlashReply::new(format!("Failed to create incident: {e}"))
            }
        }
    }

    fn timeline_reply(&self, request: &SlashRequest) -> SlashReply {
        tracing::info!(
            user = %request.user_name,
            channel_id = %request.channel_id,
            "processing timeline command"
        );
        match self.timeline_view(&request.channel_id) {
            Ok(text) => SlashReply::new(text),
            Err(ShiftError::NotInIncidentChannel(_)) => {
                tracing::warn!(
                    user = %request.user_name,
                    channel_id = %request.channel_id,
                    "timeline command used in non-incident channel"
                );
                SlashReply::new(MSG_NOT_INCIDENT_CHANNEL)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    user = %request.user_name,
                    channel_id = %request.channel_id,
                    "timeline not found for incident"
                );
                SlashReply::new(MSG_TIMELINE_NOT_FOUND)
            }
        }
    }

    /// Rendered timeline for the incident owning `channel_id`.
    pub fn timeline_view(&self, channel_id: &str) -> Result<String> {
        let incident_id = self
            .store
            .incident_for_channel(channel_id)
            .ok_or_else(|| ShiftError::NotInIncidentChannel(channel_id.to_string()))?;
        let timeline = self
            .store
            .get_timeline(&incident_id)
            .ok_or(ShiftError::TimelineNotFound(incident_id))?;
        Ok(render_timeline_view(&timeline))
    }

    /// Open an incident: channel, channel dressing, timeline, announcements.
    ///
    /// Only channel creation and the notification post are fatal.
    pub async fn start_incident(&self, command: &Command) -> Result<StartedIncident> {
        let incident = Incident::open(generate_incident_id(), command, self.clock.now());

        let channel = self
            .platform
            .create_channel(&incident.channel_name)
            .await
            .map_err(ShiftError::ChannelCreate)?;

        let topic = format!("{} Incident: {}", incident.severity, incident.title);
        if let Err(e) = self.platform.set_topic(&channel.id, &topic).await {
            tracing::warn!(error = %e, channel_id = %channel.id, "failed to set channel topic");
        }
        if let Err(e) = self.platform.set_purpose(&channel.id, incident.summary()).await {
            tracing::warn!(error = %e, channel_id = %channel.id, "failed to set channel purpose");
        }
        match self.platform.invite_user(&channel.id, &incident.started_by).await {
            Ok(()) => tracing::info!(
                user_id = %incident.started_by,
                username = %command.username,
                channel_id = %channel.id,
                "user invited to incident channel"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                user_id = %incident.started_by,
                channel_id = %channel.id,
                "failed to invite user to incident channel"
            ),
        }

        self.store.create_timeline(&incident, &channel.id).await;

        if let Err(e) = self
            .platform
            .post_message(&channel.id, &initial_message(&incident))
            .await
        {
            tracing::error!(error = %e, channel_id = %channel.id, "failed to post initial message");
        }

        self.platform
            .post_message(
                &self.notifications_channel,
                &notification_message(&incident, &channel.id),
            )
            .await
            .map_err(ShiftError::Notify)?;

        tracing::info!(
            incident_id = %incident.id,
            title = %incident.title,
            severity = %incident.severity,
            user = %command.username,
            channel_id = %channel.id,
            channel_name = %channel.name,
            "incident created"
        );
        Ok(StartedIncident { incident, channel })
    }
}

fn initial_message(incident: &Incident) -> String {
    format!(
        "🚨 *{sev} Incident Started*\n\n\
         *Severity:* {sev}\n\
         *Started by:* <@{user}>\n\
         *Title:* {title}\n\
         *Description:* {summary}\n\
         *Started at:* {at} UTC\n\n\
         Please provide updates and coordinate the response in this channel.",
        sev = incident.severity,
        user = incident.started_by,
        title = incident.title,
        summary = incident.summary(),
        at = incident.started_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

fn notification_message(incident: &Incident, channel_id: &str) -> String {
    let mut text = format!(
        "🚨 <@{}> started an incident: *{}*: <#{}>\n*Title:* {}",
        incident.started_by, incident.severity, channel_id, incident.title
    );
    if !incident.description.is_empty() {
        text.push_str("\n*Description:* ");
        text.push_str(&incident.description);
    }
    text
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
