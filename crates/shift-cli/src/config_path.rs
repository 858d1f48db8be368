use anyhow::Context;
use shift_core::config::Config;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "shift.yaml";

/// Resolve the config file to read.
///
/// Priority:
/// 1. `--config` flag / `SHIFT_CONFIG` env var (passed in as `explicit`)
/// 2. `shift.yaml` in `cwd`, if present
/// 3. None: built-in defaults only
pub fn resolve_config_path(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    let candidate = cwd.join(DEFAULT_CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}

/// Load the effective config: file (if any), then environment overrides.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let path = resolve_config_path(explicit, &cwd);
    let mut config = Config::load_or_default(path.as_deref()).with_context(|| match &path {
        Some(p) => format!("failed to load config from {}", p.display()),
        None => "failed to load config".to_string(),
    })?;
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}
