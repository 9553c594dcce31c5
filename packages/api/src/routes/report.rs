use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use overlord_types::ErrorReport;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(report_error))
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportAccepted {
    pub message: String,
    pub id: i64,
}

#[utoipa::path(
    post,
    path = "/report-error",
    tag = "reports",
    request_body = ErrorReport,
    responses(
        (status = 200, description = "Report accepted and stored", body = ReportAccepted),
        (status = 400, description = "Malformed or invalid report")
    )
)]
#[tracing::instrument(name = "POST /report-error", skip(state, payload))]
pub async fn report_error(
    State(state): State<AppState>,
    payload: Result<Json<ErrorReport>, JsonRejection>,
) -> Result<Json<ReportAccepted>, ApiError> {
    let Json(report) = payload?;
    let stored = state.ingest(report).await?;

    tracing::info!(id = stored.id, domain = %stored.report.domain, "Error report accepted");
    Ok(Json(ReportAccepted {
        message: "Success".to_string(),
        id: stored.id,
    }))
}
