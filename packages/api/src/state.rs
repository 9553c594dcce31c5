use overlord_types::{ErrorReport, ReportValidator, StoredReport};
use std::{sync::Arc, time::Duration};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::store::DynReportStore;
use crate::token::TokenKeys;

pub type AppState = Arc<State>;

pub struct State {
    pub config: ApiConfig,
    pub store: DynReportStore,
    pub validator: ReportValidator,
    pub tokens: TokenKeys,
    /// Revoked token ids (jti). Entries outlive any token they could match.
    pub revoked_tokens: moka::sync::Cache<String, ()>,
}

impl State {
    pub fn new(config: ApiConfig, store: DynReportStore) -> Self {
        let ttl_seconds = config.auth.token_ttl_seconds.max(1);
        let tokens = TokenKeys::from_secret(&config.auth.jwt_secret, ttl_seconds);
        let validator = ReportValidator::new().with_strict_user_agent(config.strict_user_agent);

        let revoked_tokens = moka::sync::Cache::builder()
            .max_capacity(100_000)
            .time_to_live(Duration::from_secs(ttl_seconds as u64))
            .build();

        Self {
            config,
            store,
            validator,
            tokens,
            revoked_tokens,
        }
    }

    /// Validate a report and persist the sanitized result.
    pub async fn ingest(&self, report: ErrorReport) -> Result<StoredReport, ApiError> {
        let report = self.validator.validate(report)?;
        let stored = self.store.create(report).await?;
        Ok(stored)
    }

    pub fn revoke_token(&self, jti: &str) {
        self.revoked_tokens.insert(jti.to_string(), ());
    }

    pub fn is_token_revoked(&self, jti: &str) -> bool {
        self.revoked_tokens.contains_key(jti)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::store::MemoryReportStore;
    use overlord_types::{Field, ValidationError};

    fn state() -> State {
        let config = ApiConfig::new(AuthConfig::new("admin", "hunter2", "test-secret", 60));
        State::new(config, Arc::new(MemoryReportStore::new()))
    }

    #[tokio::test]
    async fn test_ingest_rejects_before_storing() {
        let state = state();
        let err = state.ingest(ErrorReport::default()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "400 Bad Request: validation error: {}",
                ValidationError::MissingField(Field::Domain)
            )
        );
        assert_eq!(state.store.count(None).await.unwrap(), 0);
    }

    #[test]
    fn test_revoke_token() {
        let state = state();
        assert!(!state.is_token_revoked("abc"));
        state.revoke_token("abc");
        assert!(state.is_token_revoked("abc"));
    }
}
