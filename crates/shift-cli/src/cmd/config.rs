use crate::output::print_json;
use clap::Subcommand;
use shift_core::config::{Config, WarnLevel};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration (secrets redacted)
    Show,

    /// Validate the configuration for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(config: &Config, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(config, json),
        ConfigSubcommand::Validate => validate(config, json),
    }
}

const REDACTED: &str = "********";

fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.slack.bot_token.is_some() {
        shown.slack.bot_token = Some(REDACTED.to_string());
    }
    if shown.slack.signing_secret.is_some() {
        shown.slack.signing_secret = Some(REDACTED.to_string());
    }
    if shown.server.api_token.is_some() {
        shown.server.api_token = Some(REDACTED.to_string());
    }
    shown
}

fn show(config: &Config, json: bool) -> anyhow::Result<()> {
    let shown = redacted(config);
    if json {
        print_json(&shown)?;
    } else {
        print!("{}", shown.to_yaml()?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(config: &Config, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if config.has_errors() {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
