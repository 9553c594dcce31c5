use overlord_api::config::{AuthConfig, DEFAULT_ADMIN_USERNAME, DEFAULT_TOKEN_TTL_SECONDS};
use overlord_api::store_config::StoreConfig;
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub strict_user_agent: bool,
    pub mock_mode: bool,
    pub reporter_script: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?;
        let admin_password =
            non_empty("ADMIN_PASSWORD").ok_or(ConfigError::MissingVar("ADMIN_PASSWORD"))?;
        let admin_username =
            non_empty("ADMIN_USERNAME").unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string());

        let token_ttl_seconds = match non_empty("TOKEN_TTL_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or_else(|| ConfigError::InvalidValue("TOKEN_TTL_SECONDS".to_string()))?,
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };

        let port = non_empty("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?;

        let store = match non_empty("DATABASE_URL") {
            Some(url) => StoreConfig::new(url.trim()),
            None => StoreConfig::default(),
        };
        store
            .backend()
            .map_err(|e| ConfigError::InvalidValue(format!("DATABASE_URL: {}", e)))?;

        Ok(Config {
            port,
            store,
            auth: AuthConfig::new(
                admin_username,
                &admin_password,
                jwt_secret,
                token_ttl_seconds,
            ),
            strict_user_agent: parse_flag("STRICT_USER_AGENT", non_empty("STRICT_USER_AGENT"))?,
            mock_mode: parse_flag("MOCK_MODE", non_empty("MOCK_MODE"))?,
            reporter_script: non_empty("REPORTER_SCRIPT").map(PathBuf::from),
        })
    }
}

/// Unset means `false`.
fn parse_flag(name: &str, value: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(name.to_string())),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVar(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
        }
    }
}

impl std::error::Error for ConfigError {}
