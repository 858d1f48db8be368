use crate::command::Command;
use crate::ident::generate_channel_name;
use crate::types::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked incident. Immutable once opened, apart from the resolution
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub severity: Severity,
    pub channel_name: String,
    /// Platform user ID of the initiator.
    pub started_by: String,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Incident {
    /// Open an incident from a parsed command. The channel name is derived
    /// from the title and `started_at`.
    pub fn open(id: impl Into<String>, command: &Command, started_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: command.title.clone(),
            description: command.description.clone(),
            severity: command.severity,
            channel_name: generate_channel_name(&command.title, started_at),
            started_by: command.user_id.clone(),
            started_at,
            resolved_by: None,
            resolved_at: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }

    /// Description when given, otherwise the title.
    pub fn summary(&self) -> &str {
        if self.description.is_empty() {
            &self.title
        } else {
            &self.description
        }
    }
}
