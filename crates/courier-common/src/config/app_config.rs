//! Application configuration structs
//!
//! Loads configuration from environment variables.

use serde::Deserialize;
use std::env;

/// Minimum accepted JWT signing secret length in bytes
const MIN_JWT_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    pub gateway: GatewayConfig,
    pub smtp: Option<SmtpConfig>,
    /// Base URL of the browser client, used to build reset links
    pub client_base_url: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_db_min_connections")]
    pub min_connections: u32,
    /// Per-statement timeout in seconds
    #[serde(default = "default_db_query_timeout")]
    pub query_timeout_secs: u64,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub url: String,
    #[serde(default = "default_cache_max_connections")]
    pub max_connections: u32,
    /// Per-operation timeout in seconds
    #[serde(default = "default_cache_op_timeout")]
    pub op_timeout_secs: u64,
}

/// Token lifetimes and signing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_token_ttl")]
    pub refresh_token_ttl_secs: i64,
    #[serde(default = "default_reset_token_ttl")]
    pub reset_token_ttl_secs: u64,
}

/// WebSocket gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_max_connections_per_user")]
    pub max_connections_per_user: usize,
    /// Presence key TTL, refreshed by heartbeat
    #[serde(default = "default_heartbeat_ttl")]
    pub heartbeat_ttl_secs: u64,
    /// Idle time without any inbound frame before the server closes
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    /// Bounded outbound channel capacity per socket
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
    /// Offline queue TTL
    #[serde(default = "default_offline_queue_ttl")]
    pub offline_queue_ttl_secs: u64,
}

/// SMTP credentials for reset emails (optional)
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_max_connections() -> u32 {
    20
}

fn default_db_min_connections() -> u32 {
    5
}

fn default_db_query_timeout() -> u64 {
    5
}

fn default_cache_max_connections() -> u32 {
    10
}

fn default_cache_op_timeout() -> u64 {
    1
}

fn default_access_token_ttl() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_ttl() -> i64 {
    604_800 // 7 days
}

fn default_reset_token_ttl() -> u64 {
    3_600 // 1 hour
}

fn default_max_connections_per_user() -> usize {
    5
}

fn default_heartbeat_ttl() -> u64 {
    60
}

fn default_idle_timeout() -> u64 {
    90
}

fn default_outbound_buffer() -> usize {
    256
}

fn default_offline_queue_ttl() -> u64 {
    604_800 // 7 days
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required environment variable is missing or
    /// the JWT secret is too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET",
                format!("must be at least {MIN_JWT_SECRET_LEN} bytes"),
            ));
        }

        let smtp = match (
            env::var("SMTP_HOST").ok(),
            env::var("SMTP_USERNAME").ok(),
            env::var("SMTP_PASSWORD").ok(),
            env::var("SMTP_FROM").ok(),
        ) {
            (Some(host), Some(username), Some(password), Some(from_address)) => Some(SmtpConfig {
                host,
                port: env_parse("SMTP_PORT", 587),
                username,
                password,
                from_address,
            }),
            _ => None,
        };

        Ok(Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| default_host()),
                port: env_parse("SERVER_PORT", default_port()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env_parse("DATABASE_MAX_CONNECTIONS", default_db_max_connections()),
                min_connections: env_parse("DATABASE_MIN_CONNECTIONS", default_db_min_connections()),
                query_timeout_secs: env_parse("DATABASE_QUERY_TIMEOUT", default_db_query_timeout()),
            },
            cache: CacheConfig {
                url: env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL"))?,
                max_connections: env_parse("REDIS_MAX_CONNECTIONS", default_cache_max_connections()),
                op_timeout_secs: env_parse("REDIS_OP_TIMEOUT", default_cache_op_timeout()),
            },
            auth: AuthConfig {
                jwt_secret,
                access_token_ttl_secs: env_parse("ACCESS_TOKEN_TTL", default_access_token_ttl()),
                refresh_token_ttl_secs: env_parse("REFRESH_TOKEN_TTL", default_refresh_token_ttl()),
                reset_token_ttl_secs: env_parse("RESET_TOKEN_TTL", default_reset_token_ttl()),
            },
            gateway: GatewayConfig {
                max_connections_per_user: env_parse(
                    "MAX_CONNECTIONS_PER_USER",
                    default_max_connections_per_user(),
                ),
                heartbeat_ttl_secs: env_parse("HEARTBEAT_TTL", default_heartbeat_ttl()),
                idle_timeout_secs: env_parse("SOCKET_IDLE_TIMEOUT", default_idle_timeout()),
                outbound_buffer: env_parse("SOCKET_OUTBOUND_BUFFER", default_outbound_buffer()),
                offline_queue_ttl_secs: env_parse(
                    "OFFLINE_QUEUE_TTL",
                    default_offline_queue_ttl(),
                ),
            },
            smtp,
            client_base_url: env::var("CLIENT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
