//! Income API endpoints

use api_types::income::{IncomeNew, IncomeUpdate};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::Income;
use uuid::Uuid;

use crate::ServerError;
use crate::server::{AuthUser, ServerState};

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Income>>, ServerError> {
    let incomes = state.engine.list_incomes(&user.0).await?;
    Ok(Json(incomes))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<IncomeNew>,
) -> Result<(StatusCode, Json<Income>), ServerError> {
    let new = engine::IncomeNew {
        date: payload.date,
        amount: payload.amount,
        currency: payload.currency,
        description: payload.description,
        device: payload.device,
    };
    let income = state.engine.add_income(&user.0, new, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(income)))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<IncomeUpdate>,
) -> Result<Json<Income>, ServerError> {
    let patch = engine::IncomePatch {
        date: payload.date,
        amount: payload.amount,
        currency: payload.currency,
        description: payload.description,
        device: payload.device,
    };
    let income = state
        .engine
        .update_income(&user.0, id, patch, Utc::now())
        .await?;
    Ok(Json(income))
}

pub async fn remove(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_income(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
