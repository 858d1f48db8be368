use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use shift_core::classifier::{InboundEvent, RouteOutcome};

use crate::error::AppError;
use crate::state::AppState;

/// Outer Events API payload.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    UrlVerification {
        challenge: String,
    },
    EventCallback {
        #[serde(default)]
        event_id: String,
        event: InboundEvent,
    },
    #[serde(other)]
    Other,
}

/// POST /slack/events: Events API webhook.
///
/// Callbacks are acknowledged with an empty 200 and routed on a spawned task.
pub async fn receive_event(State(app): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let envelope: EventEnvelope = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(format!("malformed event payload: {e}")))?;

    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            tracing::info!("answering url verification challenge");
            Ok(Json(json!({ "challenge": challenge })).into_response())
        }
        EventEnvelope::EventCallback { event_id, event } => {
            tracing::debug!(event_id = %event_id, kind = event.kind(), "received event callback");
            let router = app.events.clone();
            tokio::spawn(async move {
                match router.route(&event).await {
                    Ok(RouteOutcome::Recorded {
                        incident_id,
                        entry_id,
                        entry_count,
                        report,
                    }) => tracing::info!(
                        event_id = %event_id,
                        incident_id = %incident_id,
                        entry_id = %entry_id,
                        entry_count,
                        follow_up_failures = report.failed.len(),
                        "event recorded"
                    ),
                    Ok(RouteOutcome::Duplicate {
                        incident_id,
                        entry_id,
                    }) => tracing::debug!(
                        event_id = %event_id,
                        incident_id = %incident_id,
                        entry_id = %entry_id,
                        "duplicate event ignored"
                    ),
                    Ok(RouteOutcome::Ignored) => {}
                    Err(e) => tracing::error!(error = %e, event_id = %event_id, "failed to route event"),
                }
            });
            Ok(StatusCode::OK.into_response())
        }
        EventEnvelope::Other => Ok(StatusCode::OK.into_response()),
    }
}
