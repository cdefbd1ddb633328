//! Server setup and initialization
//!
//! Builds every dependency once (pools, repositories, stores, JWT,
//! registry), wires them into the shared state and runs the axum
//! server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use courier_cache::{OfflineQueueStore, PresenceStore, RedisPool, ResetTokenStore};
use courier_common::{AppConfig, AppError, JwtService};
use courier_db::{
    create_pool, DatabaseConfig, PgDirectMessageRepository, PgGroupMessageRepository,
    PgGroupRepository, PgRefreshTokenRepository, PgUserRepository,
};
use courier_service::{LogMailer, ServiceContext};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::gateway::ConnectionRegistry;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    create_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Initialize all dependencies and create the shared state
///
/// # Errors
/// Returns an error when a backing store is unreachable.
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        acquire_timeout: Duration::from_secs(config.database.query_timeout_secs),
        statement_timeout: Duration::from_secs(config.database.query_timeout_secs),
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    info!("Connecting to Redis...");
    let redis_pool =
        RedisPool::from_config(&config.cache).map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis connection established");

    let jwt_service = Arc::new(JwtService::new(
        &config.auth.jwt_secret,
        config.auth.access_token_ttl_secs,
    ));

    let services = ServiceContext::builder()
        .pool(pool.clone())
        .redis_pool(redis_pool.clone())
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .message_repo(Arc::new(PgDirectMessageRepository::new(pool.clone())))
        .group_repo(Arc::new(PgGroupRepository::new(pool.clone())))
        .group_message_repo(Arc::new(PgGroupMessageRepository::new(pool.clone())))
        .refresh_token_repo(Arc::new(PgRefreshTokenRepository::new(pool)))
        .presence_store(PresenceStore::with_ttl(
            redis_pool.clone(),
            config.gateway.heartbeat_ttl_secs,
        ))
        .offline_queue(OfflineQueueStore::with_ttl(
            redis_pool.clone(),
            config.gateway.offline_queue_ttl_secs,
        ))
        .reset_token_store(ResetTokenStore::with_ttl(
            redis_pool,
            config.auth.reset_token_ttl_secs,
        ))
        .jwt_service(jwt_service)
        .mailer(Arc::new(LogMailer))
        .auth_config(config.auth.clone())
        .build()
        .map_err(|missing| {
            AppError::Internal(anyhow::anyhow!("missing dependency: {missing}"))
        })?;

    let registry = ConnectionRegistry::new(config.gateway.max_connections_per_user);

    Ok(AppState::new(services, registry, config))
}

/// Run the server until it exits
///
/// # Errors
/// Returns an error when startup fails.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.server.address();
    let state = create_app_state(config).await?;
    let app = create_app(state);

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to bind {address}: {e}")))?;

    info!("Server listening on http://{address}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("server error: {e}")))?;

    Ok(())
}
