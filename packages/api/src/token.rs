//! Admin session tokens
//!
//! HS256 JWTs signed with the `JWT_SECRET` shared by every instance. Each token
//! carries a random `jti` so a single session can be revoked on logout.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ISSUER: &str = "overlord";

/// Error type for token operations
#[derive(Debug)]
pub enum TokenError {
    EncodingError(String),
    DecodingError(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::EncodingError(msg) => write!(f, "Failed to encode JWT: {}", msg),
            TokenError::DecodingError(msg) => write!(f, "Failed to decode JWT: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub jti: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn from_secret(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    /// Sign a fresh token for `sub`, returning it with the claims it carries.
    pub fn issue(&self, sub: &str) -> Result<(String, AdminClaims), TokenError> {
        let iat = Utc::now().timestamp();
        let claims = AdminClaims {
            sub: sub.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iss: ISSUER.to_string(),
            iat,
            exp: iat + self.ttl_seconds,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::EncodingError(e.to_string()))?;
        Ok((token, claims))
    }

    /// Verify signature, issuer and expiry.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let token_data = decode::<AdminClaims>(token, &self.decoding, &validation)
            .map_err(|e| TokenError::DecodingError(e.to_string()))?;
        Ok(token_data.claims)
    }
}
