use axum::extract::State;
use axum::{Form, Json};
use serde_json::json;
use shift_core::desk::SlashRequest;

use crate::state::AppState;

/// POST /slack/commands: slash-command webhook. Always answers 200 with an
/// ephemeral reply; failures are described in the reply text.
pub async fn slash_command(
    State(app): State<AppState>,
    Form(request): Form<SlashRequest>,
) -> Json<serde_json::Value> {
    let reply = app.desk.handle_command(request).await;
    Json(json!({
        "response_type": "ephemeral",
        "text": reply.text,
    }))
}
