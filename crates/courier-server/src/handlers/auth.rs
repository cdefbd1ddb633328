//! Authentication endpoints

use axum::extract::State;
use courier_service::{
    AuthResponse, AuthService, ConfirmResetRequest, LoginRequest, LogoutRequest, RefreshRequest,
    RequestResetRequest, SessionResponse, SignupRequest,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResponse, ApiResult, Created};
use crate::state::AppState;

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(state.services(), state.config().client_base_url.clone())
}

/// `POST /api/v1/auth/signup`
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> ApiResult<Created<AuthResponse>> {
    let response = auth_service(&state).signup(request).await?;
    Ok(Created(ApiResponse::ok(response)))
}

/// `POST /api/v1/auth/login`
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<ApiResponse<AuthResponse>> {
    let response = auth_service(&state).login(request).await?;
    Ok(ApiResponse::ok(response))
}

/// `POST /api/v1/auth/logout` — revokes the refresh token; idempotent
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LogoutRequest>,
) -> ApiResult<ApiResponse<()>> {
    auth_service(&state).logout(&request.refresh_token).await?;
    Ok(ApiResponse::ok(()))
}

/// `POST /api/v1/auth/refresh` — token rotation
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> ApiResult<ApiResponse<AuthResponse>> {
    let response = auth_service(&state).refresh(request).await?;
    Ok(ApiResponse::ok(response))
}

/// `GET /api/v1/auth/session`
pub async fn session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<SessionResponse>> {
    let response = auth_service(&state).session_check(auth.user_id).await?;
    Ok(ApiResponse::ok(response))
}

/// `POST /api/v1/auth/reset/request` — always reports success
pub async fn request_reset(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RequestResetRequest>,
) -> ApiResult<ApiResponse<()>> {
    auth_service(&state).request_reset(request).await?;
    Ok(ApiResponse::ok(()))
}

/// `POST /api/v1/auth/reset/confirm` — single-use redemption
pub async fn confirm_reset(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ConfirmResetRequest>,
) -> ApiResult<ApiResponse<()>> {
    auth_service(&state).confirm_reset(request).await?;
    Ok(ApiResponse::ok(()))
}
