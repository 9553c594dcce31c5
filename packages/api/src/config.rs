//! Runtime settings the API layer needs, resolved by the server binary.

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 8 * 60 * 60;

/// Admin credentials and token signing settings.
///
/// The password is only kept as a digest.
#[derive(Clone)]
pub struct AuthConfig {
    pub admin_username: String,
    password_digest: blake3::Hash,
    pub jwt_secret: String,
    pub token_ttl_seconds: i64,
}

impl AuthConfig {
    pub fn new(
        admin_username: impl Into<String>,
        admin_password: &str,
        jwt_secret: impl Into<String>,
        token_ttl_seconds: i64,
    ) -> Self {
        Self {
            admin_username: admin_username.into(),
            password_digest: blake3::hash(admin_password.as_bytes()),
            jwt_secret: jwt_secret.into(),
            token_ttl_seconds,
        }
    }

    /// `blake3::Hash` equality is constant time.
    pub fn check_credentials(&self, username: &str, password: &str) -> bool {
        let password_ok = blake3::hash(password.as_bytes()) == self.password_digest;
        password_ok && username == self.admin_username
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_username", &self.admin_username)
            .field("password_digest", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub auth: AuthConfig,
    /// Enforce the Fire TV user agent pattern on ingest.
    pub strict_user_agent: bool,
    pub mock_mode: bool,
    /// Contents of the reporter script served at `/ShadowWatcher`.
    pub reporter_script: Option<String>,
}

impl ApiConfig {
    pub fn new(auth: AuthConfig) -> Self {
        Self {
            auth,
            strict_user_agent: false,
            mock_mode: false,
            reporter_script: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_credentials() {
        let auth = AuthConfig::new("admin", "hunter2", "secret", 60);
        assert!(auth.check_credentials("admin", "hunter2"));
        assert!(!auth.check_credentials("admin", "hunter3"));
        assert!(!auth.check_credentials("root", "hunter2"));
        assert!(!auth.check_credentials("admin", ""));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let auth = AuthConfig::new("admin", "hunter2", "very-secret", 60);
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("admin"));
    }
}
