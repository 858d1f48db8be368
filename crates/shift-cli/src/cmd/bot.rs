use shift_core::config::{Config, WarnLevel};

/// Run the bot: validate config, then serve Slack webhooks until shutdown.
pub fn run(mut config: Config, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let warnings = config.validate();
    for w in &warnings {
        match w.level {
            WarnLevel::Warning => tracing::warn!("{}", w.message),
            WarnLevel::Error => tracing::error!("{}", w.message),
        }
    }
    if config.has_errors() {
        anyhow::bail!("refusing to start: config validation found errors (run `shift config validate`)");
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(shift_server::serve(&config))
}
