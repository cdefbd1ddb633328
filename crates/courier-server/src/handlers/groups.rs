//! Group endpoints

use axum::extract::{Path, State};
use courier_service::{
    AddMembersRequest, CreateGroupRequest, GroupMessageResponse, GroupResponse, GroupService,
    UserGroupResponse,
};
use serde::Serialize;
use uuid::Uuid;

use crate::extractors::{AuthUser, PageQuery, ValidatedJson};
use crate::response::{ApiResponse, ApiResult, Created, Pagination};
use crate::state::AppState;

/// `POST /api/v1/groups` — create a group; the creator becomes admin
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateGroupRequest>,
) -> ApiResult<Created<GroupResponse>> {
    let service = GroupService::new(state.services());
    let group = service.create(auth.user_id, request).await?;
    Ok(Created(ApiResponse::ok(group)))
}

/// `GET /api/v1/groups/my`
pub async fn my_groups(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<Vec<UserGroupResponse>>> {
    let service = GroupService::new(state.services());
    let groups = service.my_groups(auth.user_id).await?;
    Ok(ApiResponse::ok(groups))
}

/// Body of the add-members response
#[derive(Debug, Serialize)]
pub struct MembersAdded {
    pub added: usize,
}

/// `POST /api/v1/groups/{group_id}/members` — admin only
pub async fn add_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AddMembersRequest>,
) -> ApiResult<ApiResponse<MembersAdded>> {
    let service = GroupService::new(state.services());
    let added = service
        .add_members(group_id, auth.user_id, request.member_ids)
        .await?;
    Ok(ApiResponse::ok(MembersAdded { added }))
}

/// `DELETE /api/v1/groups/{group_id}/members/{user_id}` — self-removal
/// or admin removal
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<ApiResponse<()>> {
    let service = GroupService::new(state.services());
    service.remove_member(group_id, auth.user_id, user_id).await?;
    Ok(ApiResponse::ok(()))
}

/// `GET /api/v1/groups/{group_id}/messages?limit&offset` — members only
pub async fn messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<Uuid>,
    page: PageQuery,
) -> ApiResult<ApiResponse<Vec<GroupMessageResponse>>> {
    let service = GroupService::new(state.services());
    let (messages, total) = service
        .messages(group_id, auth.user_id, page.limit, page.offset)
        .await?;

    Ok(ApiResponse::ok_paginated(
        messages,
        Pagination::from_limit_offset(page.limit, page.offset, total),
    ))
}
