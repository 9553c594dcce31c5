use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AdminUser {
    pub sub: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum AppUser {
    Admin(AdminUser),
    Unauthorized,
}

impl AppUser {
    pub fn require_admin(&self) -> Result<&AdminUser, ApiError> {
        match self {
            AppUser::Admin(user) => Ok(user),
            AppUser::Unauthorized => Err(ApiError::unauthorized("admin token required")),
        }
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves the caller and attaches an [`AppUser`] to every request.
///
/// Requests without a token pass through as [`AppUser::Unauthorized`]; a token
/// that is present but invalid or revoked is rejected outright.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = match bearer_token(&request) {
        Some(token) => {
            let claims = state
                .tokens
                .verify(token)
                .map_err(|e| ApiError::unauthorized(e.to_string()))?;

            if state.is_token_revoked(&claims.jti) {
                return Err(ApiError::unauthorized("token has been revoked"));
            }

            AppUser::Admin(AdminUser {
                sub: claims.sub,
                jti: claims.jti,
                expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
            })
        }
        None => AppUser::Unauthorized,
    };

    request.extensions_mut().insert::<AppUser>(user);
    Ok(next.run(request).await)
}
