use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Requests older (or newer) than this are rejected as replays.
pub const MAX_CLOCK_SKEW_SECS: i64 = 60 * 5;

const MAX_BODY_BYTES: usize = 1024 * 1024;
const SIGNATURE_VERSION: &str = "v0";

/// Axum middleware that checks Slack's request signature.
///
/// 1. No signing secret configured → passthrough.
/// 2. Missing or stale `X-Slack-Request-Timestamp` → 401.
/// 3. `X-Slack-Signature` must equal `v0=` + hex HMAC-SHA256 of
///    `v0:<timestamp>:<body>` → otherwise 401.
///
/// The body is buffered for verification and handed on unchanged.
pub async fn verify_slack_signature(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let Some(secret) = state.signing_secret.clone() else {
        return next.run(req).await;
    };

    let (parts, body) = req.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => return AppError::bad_request(format!("unreadable body: {e}")).into_response(),
    };

    let now = state.clock.now().timestamp();
    if let Err(reason) = check(&parts.headers, &bytes, &secret, now) {
        tracing::warn!(path = %parts.uri.path(), reason, "rejected unsigned slack request");
        return AppError::unauthorized(reason).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn check(headers: &HeaderMap, body: &[u8], secret: &str, now: i64) -> Result<(), &'static str> {
    let timestamp = headers
        .get(TIMESTAMP_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or("missing request timestamp")?;
    let sent_at: i64 = timestamp.trim().parse().map_err(|_| "invalid request timestamp")?;
    if (now - sent_at).abs() > MAX_CLOCK_SKEW_SECS {
        return Err("request timestamp outside allowed window");
    }

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or("missing signature")?;
    let digest_hex = signature
        .strip_prefix("v0=")
        .ok_or("signature must use v0=<hex> format")?;
    let expected = decode_hex(digest_hex).ok_or("signature is not valid hex")?;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| "failed to initialize hmac verifier")?;
    mac.update(SIGNATURE_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.trim().as_bytes());
    mac.update(b":");
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| "signature verification failed")
}

/// Axum middleware that gates the `/api/*` routes behind a bearer token.
///
/// When no token is configured the middleware passes every request through;
/// those routes expose recorded message text, so the port then belongs on a
/// trusted network only.
pub async fn require_api_token(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(token) = state.api_token.clone() else {
        return next.run(req).await;
    };
    if let Err(reason) = check_bearer(req.headers(), &token) {
        tracing::warn!(path = %req.uri().path(), reason, "rejected api request");
        return AppError::unauthorized(reason).into_response();
    }
    next.run(req).await
}

fn check_bearer(headers: &HeaderMap, token: &str) -> Result<(), &'static str> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or("missing bearer token")?;
    if presented.trim() != token {
        return Err("invalid bearer token");
    }
    Ok(())
}

/// Signature header value for `body` sent at `timestamp`.
pub fn sign(secret: &str, timestamp: i64, body: &[u8]) -> String {
    let mut mac = match Hmac::<Sha256>::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        // HMAC accepts keys of any length.
        Err(_) => return String::new(),
    };
    mac.update(format!("{SIGNATURE_VERSION}:{timestamp}:").as_bytes());
    mac.update(body);
    let digest = mac.finalize().into_bytes();
    let hex: String = digest.iter().map(|byte| format!("{byte:02x}")).collect();
    format!("{SIGNATURE_VERSION}={hex}")
}

fn decode_hex(raw: &str) -> Option<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() % 2 != 0 || !trimmed.is_ascii() {
        return None;
    }
    (0..trimmed.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&trimmed[i..i + 2], 16).ok())
        .collect()
}
