//! User lookup endpoint

use axum::extract::{Path, State};
use courier_service::{AuthService, LookupUserResponse};

use crate::extractors::AuthUser;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// `GET /api/v1/users/lookup/{username}` — translate a username to an
/// id before routing messages
pub async fn lookup(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<ApiResponse<LookupUserResponse>> {
    let service = AuthService::new(state.services(), state.config().client_base_url.clone());
    let response = service.lookup_user(&username).await?;
    Ok(ApiResponse::ok(response))
}
