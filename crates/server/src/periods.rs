//! Custom budget period API endpoints

use api_types::period::BudgetPeriodNew;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::CustomBudgetPeriod;
use uuid::Uuid;

use crate::ServerError;
use crate::server::{AuthUser, ServerState};

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CustomBudgetPeriod>>, ServerError> {
    let periods = state.engine.list_budget_periods(&user.0).await?;
    Ok(Json(periods))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetPeriodNew>,
) -> Result<(StatusCode, Json<CustomBudgetPeriod>), ServerError> {
    let new = engine::CustomBudgetPeriodNew {
        name: payload.name,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };
    let period = state
        .engine
        .add_budget_period(&user.0, new, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(period)))
}

pub async fn remove(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_budget_period(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
