//! Pure text rendering of timelines into Slack mrkdwn.

use crate::timeline::{Entry, EntryDetail, EntryKind, Timeline};
use std::fmt::Write as _;

const TIME_OF_DAY: &str = "%H:%M:%S";
const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";

pub fn entry_icon(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::IncidentStart => "🚨",
        EntryKind::Message => "💬",
        EntryKind::Image => "🖼️",
        EntryKind::Highlighted => "👆",
        EntryKind::BotInteraction => "🤖",
    }
}

fn display_name(entry: &Entry) -> &str {
    if !entry.username.is_empty() {
        &entry.username
    } else if !entry.user_id.is_empty() {
        &entry.user_id
    } else {
        "unknown_user"
    }
}

/// Key/value lines shown under an entry in the channel rendering.
fn metadata(detail: &EntryDetail) -> Vec<(&'static str, &str)> {
    match detail {
        EntryDetail::IncidentStart {
            severity,
            title,
            description,
        } => vec![
            ("severity", severity.as_str()),
            ("title", title.as_str()),
            ("description", description.as_str()),
        ],
        EntryDetail::Message { message_id } => vec![("message_id", message_id.as_str())],
        EntryDetail::Image { image_url, file_id } => {
            vec![("image_url", image_url.as_str()), ("file_id", file_id.as_str())]
        }
        EntryDetail::Highlighted {
            message_id,
            reaction,
        } => vec![("reaction", reaction.as_str()), ("message_id", message_id.as_str())],
        EntryDetail::BotInteraction => Vec::new(),
    }
}

fn write_genesis_header(out: &mut String, entry: &Entry) {
    let EntryDetail::IncidentStart {
        severity,
        title,
        description,
    } = &entry.detail
    else {
        return;
    };
    let _ = writeln!(out, "🚨 *{severity} Incident Started*");
    let _ = writeln!(out, "*Severity:* {severity}");
    let _ = writeln!(out, "*Started by:* @{}", display_name(entry));
    let _ = writeln!(out, "*Title:* {title}");
    if !description.is_empty() {
        let _ = writeln!(out, "*Description:* {description}");
    }
    let _ = writeln!(out, "*Started at:* {} UTC", entry.timestamp.format(DATE_TIME));
}

/// The message re-posted to the incident channel after every append.
///
/// A leading genesis entry becomes a structured header; every other entry
/// is `icon *HH:MM:SS* - @name`, its content, then its metadata.
pub fn render_channel_timeline(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "📋 *Timeline*\nNo entries yet.".to_string();
    }

    let mut blocks = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut block = String::new();
        if entry.kind() == EntryKind::IncidentStart {
            write_genesis_header(&mut block, entry);
        } else {
            let _ = writeln!(
                block,
                "{} *{}* - @{}",
                entry_icon(entry.kind()),
                entry.timestamp.format(TIME_OF_DAY),
                display_name(entry)
            );
            let _ = writeln!(block, "   {}", entry.content);
            for (key, value) in metadata(&entry.detail) {
                let _ = writeln!(block, "   • {key}: {value}");
            }
        }
        blocks.push(block);
    }

    format!("📋 *Incident Timeline*\n\n{}", blocks.join("\n"))
}

/// The on-demand view returned by the `timeline` slash command.
pub fn render_timeline_view(timeline: &Timeline) -> String {
    if timeline.entries.is_empty() {
        return "📋 *Incident Timeline*\n\nNo entries yet.".to_string();
    }

    let mut out = String::from("📋 *Incident Timeline*\n\n");

    out.push_str(":new: *Incident Created*\n");
    if let Some(genesis) = timeline.genesis() {
        if let EntryDetail::IncidentStart {
            severity,
            title,
            description,
        } = &genesis.detail
        {
            let _ = writeln!(out, "*Date/Time:* {}", genesis.timestamp.format(DATE_TIME));
            let _ = writeln!(out, "*Severity:* {severity}");
            let _ = writeln!(out, "*Created by:* @{}", display_name(genesis));
            let _ = writeln!(out, "*Title:* {title}");
            let _ = writeln!(out, "*Description:* {description}");
        }
    }
    out.push('\n');

    let rest: Vec<&Entry> = timeline
        .entries
        .iter()
        .filter(|e| e.kind() != EntryKind::IncidentStart)
        .collect();
    for (i, entry) in rest.iter().enumerate() {
        let _ = writeln!(
            out,
            "{} *{}* - @{}",
            entry_icon(entry.kind()),
            entry.timestamp.format(TIME_OF_DAY),
            display_name(entry)
        );
        match &entry.detail {
            EntryDetail::Image { image_url, .. } => {
                let _ = writeln!(out, "   📷 {}", entry.content);
                let _ = writeln!(out, "   <{image_url}|View Image>");
            }
            EntryDetail::Highlighted { reaction, .. } => {
                let _ = writeln!(out, "   Highlighted with :{reaction}:");
                let _ = writeln!(out, "   > {}", entry.content);
            }
            EntryDetail::BotInteraction => {
                let _ = writeln!(out, "   🤖 {}", entry.content);
            }
            EntryDetail::Message { .. } | EntryDetail::IncidentStart { .. } => {
                let _ = writeln!(out, "   {}", entry.content);
            }
        }
        if i + 1 < rest.len() {
            out.push('\n');
        }
    }

    let _ = write!(
        out,
        "\n---\n*Timeline last updated: {}*",
        timeline.last_updated.format(DATE_TIME)
    );
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 1, h, m, s).unwrap()
    }

    fn genesis(description: &str) -> Entry {
        Entry {
            id: "incident_start_inc_a".to_string(),
            timestamp: at(14, 30, 52),
            user_id: "U1".to_string(),
            username: "alice".to_string(),
            content: "🚨 SEV1 Incident Started".to_string(),
            detail: EntryDetail::IncidentStart {
                severity: Severity::Sev1,
                title: "the website is down".to_string(),
                description: description.to_string(),
            },
        }
    }

    fn message() -> Entry {
        Entry {
            id: "message_1.1".to_string(),
            timestamp: at(14, 35, 0),
            user_id: "U2".to_string(),
            username: "bob".to_string(),
            content: "rolled back deploy".to_string(),
            detail: EntryDetail::Message {
                message_id: "1.1".to_string(),
            },
        }
    }

    fn image() -> Entry {
        Entry {
            id: "image_F1".to_string(),
            timestamp: at(14, 36, 0),
            user_id: "U2".to_string(),
            username: String::new(),
            content: "error graph".to_string(),
            detail: EntryDetail::Image {
                image_url: "https://files.slack.com/F1".to_string(),
                file_id: "F1".to_string(),
            },
        }
    }

    #[test]
    fn empty_channel_timeline() {
        assert_eq!(render_channel_timeline(&[]), "📋 *Timeline*\nNo entries yet.");
    }

    #[test]
    fn channel_timeline_renders_header_then_entries() {
        let text = render_channel_timeline(&[genesis(""), message()]);
        let expected = "📋 *Incident Timeline*\n\n\
            🚨 *SEV1 Incident Started*\n\
            *Severity:* SEV1\n\
            *Started by:* @alice\n\
            *Title:* the website is down\n\
            *Started at:* 2024-12-01 14:30:52 UTC\n\
            \n\
            💬 *14:35:00* - @bob\n   rolled back deploy\n   • message_id: 1.1\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn channel_timeline_includes_description_when_present() {
        let text = render_channel_timeline(&[genesis("500s on checkout")]);
        assert!(text.contains("*Description:* 500s on checkout\n"));
    }

    #[test]
    fn falls_back_to_user_id_without_username() {
        let text = render_channel_timeline(&[image()]);
        assert!(text.contains("🖼️ *14:36:00* - @U2\n"));
        assert!(text.contains("   • image_url: https://files.slack.com/F1\n"));
    }

    #[test]
    fn rendering_is_pure() {
        let entries = vec![genesis("x"), message(), image()];
        assert_eq!(render_channel_timeline(&entries), render_channel_timeline(&entries));
    }

    #[test]
    fn view_has_created_block_and_footer() {
        let timeline = Timeline {
            incident_id: "inc_a".to_string(),
            channel_id: "C1".to_string(),
            last_updated: at(14, 40, 0),
            entries: vec![genesis("500s"), message(), image()],
        };
        let text = render_timeline_view(&timeline);
        assert!(text.starts_with("📋 *Incident Timeline*\n\n:new: *Incident Created*\n"));
        assert!(text.contains("*Date/Time:* 2024-12-01 14:30:52\n"));
        assert!(text.contains("*Created by:* @alice\n"));
        assert!(text.contains("*Description:* 500s\n"));
        assert!(text.contains("💬 *14:35:00* - @bob\n   rolled back deploy\n\n🖼️"));
        assert!(text.contains("   📷 error graph\n   <https://files.slack.com/F1|View Image>\n"));
        assert!(text.ends_with("\n---\n*Timeline last updated: 2024-12-01 14:40:00*"));
        assert!(!text.contains("incident_start_inc_a"));
    }

    #[test]
    fn view_of_highlight_quotes_original() {
        let timeline = Timeline {
            incident_id: "inc_a".to_string(),
            channel_id: "C1".to_string(),
            last_updated: at(14, 40, 0),
            entries: vec![
                genesis(""),
                Entry {
                    id: "highlighted_2.2".to_string(),
                    timestamp: at(14, 31, 0),
                    user_id: "U2".to_string(),
                    username: "bob".to_string(),
                    content: "cpu pegged".to_string(),
                    detail: EntryDetail::Highlighted {
                        message_id: "2.2".to_string(),
                        reaction: "point_up".to_string(),
                    },
                },
            ],
        };
        let text = render_timeline_view(&timeline);
        assert!(text.contains("👆 *14:31:00* - @bob\n   Highlighted with :point_up:\n   > cpu pegged\n"));
    }
}
