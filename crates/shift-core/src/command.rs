use crate::error::ParseError;
use crate::types::Severity;
use serde::{Deserialize, Serialize};

/// Separator between the incident title and its optional description.
pub const DESCRIPTION_SEPARATOR: &str = " -- ";

const INCIDENT_KEYWORD: &str = "incident";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Start,
}

/// A validated `start` command. `user_id` / `username` are empty after
/// parsing; the caller fills them from the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub action: Action,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
}

impl Command {
    pub fn with_actor(mut self, user_id: impl Into<String>, username: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self.username = username.into();
        self
    }
}

/// Parse `start <severity> incident <title> [-- <description>]`.
///
/// Single pass over whitespace-delimited tokens; the severity token is
/// upper-cased before validation, every other keyword is case-sensitive.
pub fn parse_command(text: &str) -> Result<Command, ParseError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(ParseError::InsufficientArguments);
    }

    if parts[0] != "start" {
        return Err(ParseError::UnknownAction(parts[0].to_string()));
    }

    let severity: Severity = parts[1]
        .to_uppercase()
        .parse()
        .map_err(|_| ParseError::InvalidSeverity(parts[1].to_string()))?;

    if parts[2] != INCIDENT_KEYWORD {
        return Err(ParseError::MissingKeyword(parts[2].to_string()));
    }

    let remainder = parts[3..].join(" ");
    let (title, description) = match remainder.split_once(DESCRIPTION_SEPARATOR) {
        Some((title, description)) => (title.trim().to_string(), description.trim().to_string()),
        None => (remainder, String::new()),
    };

    if title.is_empty() {
        return Err(ParseError::EmptyTitle);
    }

    Ok(Command {
        action: Action::Start,
        severity,
        title,
        description,
        user_id: String::new(),
        username: String::new(),
    })
}

/// Usage text for the slash command, naming every severity.
pub fn help_message(slash_command: &str) -> String {
    let mut lines = vec![
        format!("Usage: {slash_command} start <severity> incident <incident title> [-- <description>]"),
        String::new(),
        "Examples:".to_string(),
        format!("  {slash_command} start SEV0 incident the website is down"),
        format!(
            "  {slash_command} start SEV1 incident database connection issues -- Connection pool exhausted, affecting all users"
        ),
        format!(
            "  {slash_command} start SEV2 incident slow response times -- API response times > 5s, investigating root cause"
        ),
        String::new(),
        "Valid severities:".to_string(),
    ];
    for sev in Severity::all() {
        lines.push(format!("  {}: {}", sev, sev.impact()));
    }
    lines.push(String::new());
    lines.push(format!(
        "Use `{slash_command} timeline` inside an incident channel to view its timeline."
    ));
    lines.push("This will create an incident channel and post a notification.".to_string());
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
