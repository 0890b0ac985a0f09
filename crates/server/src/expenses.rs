//! Expense API endpoints

use api_types::expense::{ExpenseNew, ExpenseUpdate};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::Expense;
use uuid::Uuid;

use crate::ServerError;
use crate::server::{AuthUser, ServerState};

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Expense>>, ServerError> {
    let expenses = state.engine.list_expenses(&user.0).await?;
    Ok(Json(expenses))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<Expense>), ServerError> {
    let new = engine::ExpenseNew {
        date: payload.date,
        category: payload.category,
        item_name: payload.item_name,
        quantity: payload.quantity,
        unit: payload.unit,
        price: payload.price,
        currency: payload.currency,
        device: payload.device,
    };
    let expense = state.engine.add_expense(&user.0, new, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<Expense>, ServerError> {
    let patch = engine::ExpensePatch {
        date: payload.date,
        category: payload.category,
        item_name: payload.item_name,
        quantity: payload.quantity,
        unit: payload.unit,
        price: payload.price,
        currency: payload.currency,
        device: payload.device,
    };
    let expense = state
        .engine
        .update_expense(&user.0, id, patch, Utc::now())
        .await?;
    Ok(Json(expense))
}

pub async fn remove(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_expense(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
