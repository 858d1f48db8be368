use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShiftError {
    #[error("timeline not found for incident: {0}")]
    TimelineNotFound(String),

    #[error("channel {0} is not an incident channel")]
    NotInIncidentChannel(String),

    #[error("failed to create channel: {0}")]
    ChannelCreate(#[source] PlatformError),

    #[error("failed to post notification: {0}")]
    Notify(#[source] PlatformError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShiftError>;

/// Failures reported by the chat platform collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("{method} failed: {error}")]
    Api { method: String, error: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl PlatformError {
    pub fn api(method: impl Into<String>, error: impl Into<String>) -> Self {
        PlatformError::Api {
            method: method.into(),
            error: error.into(),
        }
    }
}

/// Why a slash-command text was rejected.
///
/// Kept apart from [`ShiftError`]: these are user input problems, surfaced
/// back to the requester with the help text and never logged as failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("insufficient arguments")]
    InsufficientArguments,

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid severity: {0}")]
    InvalidSeverity(String),

    #[error("expected 'incident' keyword, got: {0}")]
    MissingKeyword(String),

    #[error("incident title cannot be empty")]
    EmptyTitle,
}
