//! Group and membership API endpoints

use api_types::group::{GroupJoin, GroupNew};
use api_types::membership::{MemberView, MembersResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::Group;
use uuid::Uuid;

use crate::ServerError;
use crate::server::{AuthUser, ServerState};

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<Group>), ServerError> {
    let group = state
        .engine
        .create_group(&user.0, &payload.name, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn current(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Group>, ServerError> {
    let group = state.engine.current_group(&user.0).await?;
    Ok(Json(group))
}

pub async fn join(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupJoin>,
) -> Result<Json<Group>, ServerError> {
    let group = state
        .engine
        .join_group(&user.0, &payload.invite_code)
        .await?;
    Ok(Json(group))
}

pub async fn leave(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.leave_group(&user.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn members(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<MembersResponse>, ServerError> {
    let members = state
        .engine
        .list_members(&user.0, group_id)
        .await?
        .into_iter()
        .map(|member| MemberView {
            uid: member.uid,
            role: member.role.as_str().to_string(),
            email: member.email,
            display_name: member.display_name,
        })
        .collect();
    Ok(Json(MembersResponse { members }))
}

pub async fn remove_member(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path((group_id, member_uid)): Path<(Uuid, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_member(&user.0, group_id, &member_uid)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
