//! # courier-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    generate_opaque_token, hash_opaque_token, hash_password, validate_password_strength,
    verify_password, AccessClaims, JwtService, TokenPair,
};
pub use config::{
    AppConfig, AuthConfig, CacheConfig, ConfigError, DatabaseConfig, GatewayConfig, ServerConfig,
    SmtpConfig,
};
pub use error::{AppError, AppResult, ErrorBody};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig};
