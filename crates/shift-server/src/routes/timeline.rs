use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/incidents/{id}/timeline: full JSON export of one timeline.
///
/// Requires `Authorization: Bearer <server.api_token>` when a token is set.
pub async fn export_timeline(
    State(app): State<AppState>,
    Path(incident_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let data = app.store.export_timeline(&incident_id)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], data))
}
