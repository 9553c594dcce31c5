use axum::{
    Extension, Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use overlord_types::{ErrorReport, StoredReport};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::middleware::auth::AppUser;
use crate::not_found;
use crate::routes::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, ReportListParams};
use crate::state::AppState;
use crate::store::ReportQuery;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_reports)).route(
        "/{id}",
        get(get_report).put(update_report).delete(delete_report),
    )
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportPage {
    pub total: u64,
    pub reports: Vec<StoredReport>,
}

#[utoipa::path(
    get,
    path = "/reports",
    tag = "reports",
    params(ReportListParams),
    responses(
        (status = 200, description = "Stored reports, newest first", body = ReportPage),
        (status = 401, description = "Missing or invalid admin token")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "GET /reports", skip(state, user))]
pub async fn list_reports(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    query: Result<Query<ReportListParams>, QueryRejection>,
) -> Result<Json<ReportPage>, ApiError> {
    user.require_admin()?;

    let Query(params) = query?;
    let domain = params
        .domain
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    let query = ReportQuery {
        domain,
        limit: params.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        offset: params.offset.unwrap_or(0),
    };

    let total = state.store.count(query.domain.as_deref()).await?;
    let reports = state.store.list(&query).await?;

    Ok(Json(ReportPage { total, reports }))
}

#[utoipa::path(
    get,
    path = "/reports/{id}",
    tag = "reports",
    params(("id" = i64, Path, description = "Report id")),
    responses(
        (status = 200, description = "Stored report", body = StoredReport),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "No report with this id")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "GET /reports/{id}", skip(state, user))]
pub async fn get_report(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<StoredReport>, ApiError> {
    user.require_admin()?;

    let Path(id) = path?;
    let report = state
        .store
        .find(id)
        .await?
        .ok_or_else(|| not_found!("report {} not found", id))?;
    Ok(Json(report))
}

#[utoipa::path(
    put,
    path = "/reports/{id}",
    tag = "reports",
    params(("id" = i64, Path, description = "Report id")),
    request_body = ErrorReport,
    responses(
        (status = 200, description = "Updated report", body = StoredReport),
        (status = 400, description = "Malformed or invalid report"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "No report with this id")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "PUT /reports/{id}", skip(state, user, payload))]
pub async fn update_report(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ErrorReport>, JsonRejection>,
) -> Result<Json<StoredReport>, ApiError> {
    user.require_admin()?;

    let Path(id) = path?;
    let Json(report) = payload?;
    let report = state.validator.validate(report)?;
    let updated = state
        .store
        .update(id, report)
        .await?
        .ok_or_else(|| not_found!("report {} not found", id))?;

    tracing::info!(id, "Error report updated");
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/reports/{id}",
    tag = "reports",
    params(("id" = i64, Path, description = "Report id")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "No report with this id")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "DELETE /reports/{id}", skip(state, user))]
pub async fn delete_report(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    user.require_admin()?;

    let Path(id) = path?;
    if !state.store.delete(id).await? {
        return Err(not_found!("report {} not found", id));
    }

    tracing::info!(id, "Error report deleted");
    Ok(StatusCode::NO_CONTENT)
}
