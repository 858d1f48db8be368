use crate::output::print_json;
use anyhow::Context;
use chrono::{DateTime, Utc};
use shift_core::ident::{generate_channel_name, slugify};

/// Print the channel name an incident with `title` would get if started at
/// `at` (RFC 3339, default now).
pub fn run(title: &[String], at: Option<&str>, json: bool) -> anyhow::Result<()> {
    let title = title.join(" ");
    let started_at = match at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("invalid --at timestamp '{raw}' (expected RFC 3339)"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let name = generate_channel_name(&title, started_at);

    if json {
        print_json(&serde_json::json!({
            "title": title,
            "slug": slugify(&title),
            "started_at": started_at,
            "channel_name": name,
        }))?;
    } else {
        println!("{name}");
    }
    Ok(())
}
