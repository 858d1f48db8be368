use clap::{Parser, Subcommand};
use shift_cli::cmd::{self, config::ConfigSubcommand};
use shift_cli::config_path::load_config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "shift",
    about = "Incident bot: opens incident channels and keeps their timelines",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: ./shift.yaml when present)
    #[arg(long, global = true, env = "SHIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot's Slack webhook server
    Bot {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Parse slash-command text without starting anything
    Parse {
        /// Command text, e.g. start SEV1 incident db down -- replica lag
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Show the channel name an incident title would get
    ChannelName {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Start time as RFC 3339 (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Print the slash-command help text
    Usage,

    /// Inspect or validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| {
        let default_level = match &cli.command {
            Commands::Bot { .. } => config.effective_log_level(),
            _ => "warn",
        };
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
            )
            .with_target(false)
            .init();

        match cli.command {
            Commands::Bot { port } => cmd::bot::run(config, port),
            Commands::Parse { text } => cmd::parse::run(&text, cli.json),
            Commands::ChannelName { title, at } => {
                cmd::channel_name::run(&title, at.as_deref(), cli.json)
            }
            Commands::Usage => cmd::usage::run(&config, cli.json),
            Commands::Config { subcommand } => cmd::config::run(&config, subcommand, cli.json),
        }
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
