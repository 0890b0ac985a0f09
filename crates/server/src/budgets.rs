//! Budget API endpoints

use api_types::budget::{BudgetNew, BudgetUpdate};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Budget, BudgetType};
use uuid::Uuid;

use crate::ServerError;
use crate::server::{AuthUser, ServerState};

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Budget>>, ServerError> {
    let budgets = state.engine.list_budgets(&user.0).await?;
    Ok(Json(budgets))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<Budget>), ServerError> {
    let new = engine::BudgetNew {
        budget_type: BudgetType::try_from(payload.budget_type.as_str())?,
        period: payload.period,
        amount: payload.amount,
        currency: payload.currency,
        device: payload.device,
    };
    let budget = state.engine.add_budget(&user.0, new, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<Budget>, ServerError> {
    let budget_type = match payload.budget_type {
        Some(value) => Some(BudgetType::try_from(value.as_str())?),
        None => None,
    };
    let patch = engine::BudgetPatch {
        budget_type,
        period: payload.period,
        amount: payload.amount,
        currency: payload.currency,
        device: payload.device,
    };
    let budget = state
        .engine
        .update_budget(&user.0, id, patch, Utc::now())
        .await?;
    Ok(Json(budget))
}

pub async fn remove(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_budget(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
