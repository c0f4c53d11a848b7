/// Configuration management for Yatube Service
///
/// All settings come from environment variables (optionally seeded from a
/// `.env` file by the binary). Values that would be unsafe in production are
/// rejected there instead of silently falling back to development defaults.
use db_pool::env_utils::{parse_env_strict, parse_env_with_default};
use serde::{Deserialize, Serialize};

/// Development-only signing secret; refused when `APP_ENV=production`.
pub const DEV_JWT_SECRET: &str = "yatube-development-secret";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Which store backs the service
    pub storage: StorageBackend,
    /// Caller identity settings
    pub auth: AuthConfig,
    /// Feed pagination settings
    pub feed: FeedConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Number of HTTP workers
    pub workers: usize,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Caller identity settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret that session tokens are signed with
    pub jwt_secret: String,
    /// Cookie carrying the session token
    pub session_cookie: String,
    /// Authentication entry point used as redirect target
    pub login_url: String,
    /// Lifetime of tokens issued by `SessionKeys::issue`
    pub token_ttl_secs: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("session_cookie", &self.session_cookie)
            .field("login_url", &self.login_url)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            session_cookie: "sessionid".to_string(),
            login_url: "/auth/login/".to_string(),
            token_ttl_secs: 14 * 24 * 3600,
        }
    }
}

/// Feed pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Posts per feed page
    pub page_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let auth_defaults = AuthConfig::default();
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if production => {
                return Err("JWT_SECRET must be set in production".to_string())
            }
            Err(_) => auth_defaults.jwt_secret.clone(),
        };
        if production && (jwt_secret.trim().is_empty() || jwt_secret == DEV_JWT_SECRET) {
            return Err("JWT_SECRET must be set to a non-default value in production".to_string());
        }

        let page_size: usize = parse_env_strict("FEED_PAGE_SIZE", FeedConfig::default().page_size)?;
        if page_size == 0 {
            return Err("FEED_PAGE_SIZE must be greater than zero".to_string());
        }

        let storage: StorageBackend = match std::env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Postgres,
        };

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("YATUBE_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_with_default("YATUBE_SERVICE_PORT", 8000),
                workers: parse_env_with_default("YATUBE_SERVICE_WORKERS", 4),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/yatube".to_string()),
                max_connections: parse_env_with_default("DATABASE_MAX_CONNECTIONS", 10),
            },
            storage,
            auth: AuthConfig {
                jwt_secret,
                session_cookie: std::env::var("SESSION_COOKIE_NAME")
                    .unwrap_or(auth_defaults.session_cookie),
                login_url: std::env::var("LOGIN_URL").unwrap_or(auth_defaults.login_url),
                token_ttl_secs: parse_env_with_default(
                    "SESSION_TOKEN_TTL_SECS",
                    auth_defaults.token_ttl_secs,
                ),
            },
            feed: FeedConfig { page_size },
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }
}
