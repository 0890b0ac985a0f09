//! Category API endpoints

use api_types::category::{CategoryNew, CategoryRename};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::Category;
use uuid::Uuid;

use crate::ServerError;
use crate::server::{AuthUser, ServerState};

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Category>>, ServerError> {
    let categories = state.engine.list_categories(&user.0).await?;
    Ok(Json(categories))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<Category>), ServerError> {
    let category = state.engine.add_category(&user.0, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn rename(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRename>,
) -> Result<Json<Category>, ServerError> {
    let category = state
        .engine
        .rename_category(&user.0, id, &payload.name)
        .await?;
    Ok(Json(category))
}

pub async fn remove(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_category(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
