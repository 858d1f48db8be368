use chrono::{DateTime, Utc};
use rand::RngCore;
use regex::Regex;
use std::sync::OnceLock;

/// Every incident channel name starts with this prefix.
pub const CHANNEL_PREFIX: &str = "_inc-";

/// Slack's channel-name limit.
pub const MAX_CHANNEL_NAME_LEN: usize = 64;
const CHANNEL_BOUNDARY_MIN: usize = 50;

pub const MAX_SLUG_LEN: usize = 30;
const SLUG_BOUNDARY_MIN: usize = 20;

const INCIDENT_ID_PREFIX: &str = "inc_";
const INCIDENT_ID_BYTES: usize = 8;

// ---------------------------------------------------------------------------
// Incident IDs
// ---------------------------------------------------------------------------

/// Generate an incident ID from 8 bytes of OS entropy, e.g. `inc_9f86d081884c7d65`.
pub fn generate_incident_id() -> String {
    generate_incident_id_with(&mut rand::rngs::OsRng, Utc::now())
}

/// Falls back to a nanosecond timestamp (`inc_<nanos>`) when `rng` fails.
/// That fallback is not collision-free.
pub fn generate_incident_id_with<R: RngCore>(rng: &mut R, now: DateTime<Utc>) -> String {
    let mut bytes = [0u8; INCIDENT_ID_BYTES];
    match rng.try_fill_bytes(&mut bytes) {
        Ok(()) => {
            let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
            format!("{INCIDENT_ID_PREFIX}{hex}")
        }
        Err(e) => {
            tracing::warn!(error = %e, "entropy source failed, using timestamp incident id");
            let nanos = now
                .timestamp_nanos_opt()
                .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1000));
            format!("{INCIDENT_ID_PREFIX}{nanos}")
        }
    }
}

// ---------------------------------------------------------------------------
// Channel names
// ---------------------------------------------------------------------------

/// Derive the channel name `_inc-YYYYMMDD-HHMMSS-<slug>` for an incident.
///
/// The timestamp is rendered in UTC. Pure: the same title and start time
/// always yield the same name, never longer than 64 characters.
pub fn generate_channel_name(title: &str, started_at: DateTime<Utc>) -> String {
    let timestamp = started_at.format("%Y%m%d-%H%M%S");
    let name = format!("{CHANNEL_PREFIX}{timestamp}-{}", slugify(title));
    truncate_at_boundary(name, MAX_CHANNEL_NAME_LEN, CHANNEL_BOUNDARY_MIN)
}

static NON_SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn non_slug_re() -> &'static Regex {
    NON_SLUG_RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static regex is valid"))
}

/// Lower-case, collapse every run of non-`[a-z0-9]` characters into one
/// hyphen, trim hyphens, and cap at 30 characters (preferring a hyphen
/// boundary past index 20).
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = non_slug_re().replace_all(&lowered, "-");
    let slug = hyphenated.trim_matches('-').to_string();
    truncate_at_boundary(slug, MAX_SLUG_LEN, SLUG_BOUNDARY_MIN)
}

/// Cut `s` to `max` bytes, then back to the last hyphen if that hyphen sits
/// past `boundary_min`. Only called on ASCII input.
fn truncate_at_boundary(mut s: String, max: usize, boundary_min: usize) -> String {
    if s.len() <= max {
        return s;
    }
    s.truncate(max);
    if let Some(last_dash) = s.rfind('-') {
        if last_dash > boundary_min {
            s.truncate(last_dash);
        }
    }
    s
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
