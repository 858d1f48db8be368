use crate::error::{Result, ShiftError};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// SlackConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_secret: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_api_base() -> String {
    "https://slack.com/api".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            signing_secret: None,
            api_base: default_api_base(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bearer token for the `/api/*` routes. Unset leaves them open, so only
    /// expose the port on a trusted network in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            api_token: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_slash_command")]
    pub slash_command: String,
    #[serde(default = "default_notifications_channel")]
    pub notifications_channel: String,
    /// Record every human message in an incident channel, not only ones that
    /// look like image shares.
    #[serde(default)]
    pub capture_all_messages: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub slack: SlackConfig,
}

fn default_slash_command() -> String {
    "/shift".to_string()
}

fn default_notifications_channel() -> String {
    "general".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 4] = ["debug", "info", "warn", "error"];

impl Default for Config {
    fn default() -> Self {
        Self {
            slash_command: default_slash_command(),
            notifications_channel: default_notifications_channel(),
            capture_all_messages: false,
            log_level: default_log_level(),
            server: ServerConfig::default(),
            slack: SlackConfig::default(),
        }
    }
}

impl Config {
    /// Read a YAML config file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShiftError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`Config::load`], but `None` yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Overlay values from the environment. `lookup` is usually
    /// `|k| std::env::var(k).ok()`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("SLACK_BOT_TOKEN").filter(|v| !v.is_empty()) {
            self.slack.bot_token = Some(token);
        }
        if let Some(secret) = lookup("SLACK_SIGNING_SECRET").filter(|v| !v.is_empty()) {
            self.slack.signing_secret = Some(secret);
        }
        if let Some(cmd) = lookup("SLASH_COMMAND").filter(|v| !v.is_empty()) {
            self.slash_command = cmd;
        }
        if let Some(channel) = lookup("NOTIFICATIONS_CHANNEL").filter(|v| !v.is_empty()) {
            self.notifications_channel = channel;
        }
        if let Some(level) = lookup("LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.log_level = level;
        }
        if let Some(token) = lookup("SHIFT_API_TOKEN").filter(|v| !v.is_empty()) {
            self.server.api_token = Some(token);
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %port, "ignoring invalid PORT"),
            }
        }
        if let Some(flag) = lookup("ADD_ALL_MESSAGES_TO_TIMELINE") {
            match flag.to_ascii_lowercase().as_str() {
                "true" => self.capture_all_messages = true,
                "false" => self.capture_all_messages = false,
                _ => tracing::warn!(value = %flag, "ignoring invalid ADD_ALL_MESSAGES_TO_TIMELINE"),
            }
        }
    }

    /// The configured `log_level` as a tracing directive. Anything other than
    /// `debug`, `info`, `warn` or `error` (case-insensitive) becomes `info`.
    pub fn effective_log_level(&self) -> &'static str {
        let level = self.log_level.trim().to_ascii_lowercase();
        LOG_LEVELS
            .into_iter()
            .find(|known| *known == level)
            .unwrap_or("info")
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.slack.bot_token.as_deref().unwrap_or("").is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "slack.bot_token is not set (SLACK_BOT_TOKEN)".to_string(),
            });
        }

        if self.slack.signing_secret.as_deref().unwrap_or("").is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "slack.signing_secret is not set (SLACK_SIGNING_SECRET)".to_string(),
            });
        }

        if !self.slash_command.starts_with('/') {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "slash_command '{}' does not start with '/'",
                    self.slash_command
                ),
            });
        }

        if self.notifications_channel.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "notifications_channel is empty".to_string(),
            });
        }

        if self.server.port == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "server.port must be non-zero".to_string(),
            });
        }

        let level = self.log_level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "log_level '{}' is not one of debug, info, warn, error; using info",
                    self.log_level
                ),
            });
        }

        if self.slack.request_timeout_ms == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "slack.request_timeout_ms is 0; requests will fail immediately"
                    .to_string(),
            });
        }

        warnings
    }

    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|w| w.level == WarnLevel::Error)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
