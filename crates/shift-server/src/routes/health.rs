use axum::Json;
use serde_json::json;

/// GET /healthz: liveness probe.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "bot": "shift",
        "mode": "events",
    }))
}
