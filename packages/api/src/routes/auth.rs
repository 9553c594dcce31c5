use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::middleware::auth::AppUser;
use crate::routes::MessageResponse;
use crate::state::AppState;
use crate::{internal, unauthorized};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/status", get(status))
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// RFC3339 expiry of the token.
    pub expires_at: String,
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin token issued", body = LoginResponse),
        (status = 401, description = "Wrong username or password")
    )
)]
#[tracing::instrument(name = "POST /auth/login", skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;

    if !state
        .config
        .auth
        .check_credentials(&request.username, &request.password)
    {
        return Err(unauthorized!("invalid credentials for {}", request.username));
    }

    let (token, claims) = state
        .tokens
        .issue(&request.username)
        .map_err(|e| internal!("{}", e))?;
    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true);

    tracing::info!(sub = %claims.sub, "Admin logged in");
    Ok(Json(LoginResponse { token, expires_at }))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Token revoked", body = MessageResponse),
        (status = 401, description = "Missing or invalid admin token")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "POST /auth/logout", skip(state, user))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<Json<MessageResponse>, ApiError> {
    let admin = user.require_admin()?;
    state.revoke_token(&admin.jti);

    tracing::info!(sub = %admin.sub, "Admin logged out");
    Ok(Json(MessageResponse::new("Success")))
}

#[utoipa::path(
    get,
    path = "/auth/status",
    tag = "auth",
    responses(
        (status = 200, description = "Token is valid", body = MessageResponse),
        (status = 401, description = "Not authenticated")
    )
)]
#[tracing::instrument(name = "GET /auth/status", skip(user))]
pub async fn status(
    Extension(user): Extension<AppUser>,
) -> Result<Json<MessageResponse>, ApiError> {
    match user {
        AppUser::Admin(_) => Ok(Json(MessageResponse::new("Authenticated"))),
        AppUser::Unauthorized => Err(ApiError::UNAUTHORIZED),
    }
}
