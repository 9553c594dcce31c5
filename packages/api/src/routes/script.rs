use axum::{
    Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/ShadowWatcher", get(reporter_script))
}

/// Serves the client-side reporter that posts errors to `/api/report-error`.
#[tracing::instrument(name = "GET /ShadowWatcher", skip(state))]
pub async fn reporter_script(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let script = state
        .config
        .reporter_script
        .clone()
        .ok_or(ApiError::NOT_FOUND)?;

    Ok((
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        script,
    ))
}
