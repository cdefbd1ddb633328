//! Health and status endpoints

use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// `GET /health` — process liveness
pub async fn health() -> ApiResponse<HealthStatus> {
    ApiResponse::ok(HealthStatus { status: "ok" })
}

/// `GET /health/ready` — checks the log store and the cache
pub async fn ready(State(state): State<AppState>) -> Result<ApiResponse<HealthStatus>, StatusCode> {
    let db_ok = sqlx_ping(&state).await;
    let redis_ok = state.services().redis_pool().health_check().await.is_ok();

    if db_ok && redis_ok {
        Ok(ApiResponse::ok(HealthStatus { status: "ready" }))
    } else {
        tracing::warn!(db_ok, redis_ok, "Readiness check failed");
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

async fn sqlx_ping(state: &AppState) -> bool {
    sqlx::query("SELECT 1")
        .execute(state.services().pool())
        .await
        .is_ok()
}

#[derive(Debug, Serialize)]
pub struct GatewayStatus {
    pub connected_users: usize,
    pub total_connections: usize,
}

/// `GET /ws/status` — registry counters
pub async fn gateway_status(State(state): State<AppState>) -> ApiResponse<GatewayStatus> {
    ApiResponse::ok(GatewayStatus {
        connected_users: state.registry().user_count(),
        total_connections: state.registry().connection_count(),
    })
}
