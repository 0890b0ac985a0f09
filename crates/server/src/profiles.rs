//! Profile API endpoints

use api_types::profile::{ProfileNew, ProfileUpdate};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use chrono::Utc;
use engine::{ProfilePatch, UserProfile};

use crate::ServerError;
use crate::server::{AuthUser, ServerState};

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<ProfileNew>,
) -> Result<(StatusCode, Json<UserProfile>), ServerError> {
    let profile = state
        .engine
        .create_profile(
            &user.0,
            &payload.email,
            &payload.display_name,
            &payload.currency,
            &payload.language,
            Utc::now(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn me(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<UserProfile>, ServerError> {
    let profile = state.engine.user_profile(&user.0).await?;
    Ok(Json(profile))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, ServerError> {
    let patch = ProfilePatch {
        display_name: payload.display_name,
        currency: payload.currency,
        language: payload.language,
        budget_period: payload.budget_period,
        budget_start_date: payload.budget_start_date,
        budget_end_date: payload.budget_end_date,
        selected_budget_period_id: payload.selected_budget_period_id,
    };
    let profile = state.engine.update_profile(&user.0, patch).await?;
    Ok(Json(profile))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user_data(&user.0).await?;
    Ok(StatusCode::NO_CONTENT)
}
