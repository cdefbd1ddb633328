//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, CacheConfig, ConfigError, DatabaseConfig, GatewayConfig, ServerConfig,
    SmtpConfig,
};
