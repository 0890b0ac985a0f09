//! Expense records.
//!
//! `total_cost` is derived: the service recomputes `quantity * price` on
//! every write that touches either factor, reading the stored counterpart
//! when a patch supplies only one of the two.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Scope};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub scope: Scope,
    pub date: NaiveDate,
    /// Category name, denormalized (no foreign key).
    pub category: String,
    pub item_name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub price: f64,
    pub currency: String,
    pub total_cost: f64,
    /// Creator uid; never changed by updates.
    pub user_id: String,
    pub created_by_name: Option<String>,
    pub device: Option<String>,
    pub edited_device: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an expense. Audit fields are stamped by the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpenseNew {
    pub date: NaiveDate,
    pub category: String,
    pub item_name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub price: f64,
    pub currency: String,
    pub device: Option<String>,
}

/// Typed partial update: only supplied fields are merged. `id`,
/// `created_at`, `user_id` and the scope columns are never patchable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePatch {
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub item_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub device: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub scope_kind: String,
    pub scope_id: String,
    pub date: Date,
    pub category: String,
    pub item_name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub price: f64,
    pub currency: String,
    pub total_cost: f64,
    pub user_id: String,
    pub created_by_name: Option<String>,
    pub device: Option<String>,
    pub edited_device: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            scope_kind: ActiveValue::Set(expense.scope.kind().to_string()),
            scope_id: ActiveValue::Set(expense.scope.id().to_string()),
            date: ActiveValue::Set(expense.date),
            category: ActiveValue::Set(expense.category.clone()),
            item_name: ActiveValue::Set(expense.item_name.clone()),
            quantity: ActiveValue::Set(expense.quantity),
            unit: ActiveValue::Set(expense.unit.clone()),
            price: ActiveValue::Set(expense.price),
            currency: ActiveValue::Set(expense.currency.clone()),
            total_cost: ActiveValue::Set(expense.total_cost),
            user_id: ActiveValue::Set(expense.user_id.clone()),
            created_by_name: ActiveValue::Set(expense.created_by_name.clone()),
            device: ActiveValue::Set(expense.device.clone()),
            edited_device: ActiveValue::Set(expense.edited_device.clone()),
            created_at: ActiveValue::Set(expense.created_at),
            updated_at: ActiveValue::Set(expense.updated_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            scope: Scope::from_parts(&model.scope_kind, &model.scope_id)?,
            date: model.date,
            category: model.category,
            item_name: model.item_name,
            quantity: model.quantity,
            unit: model.unit,
            price: model.price,
            currency: model.currency,
            total_cost: model.total_cost,
            user_id: model.user_id,
            created_by_name: model.created_by_name,
            device: model.device,
            edited_device: model.edited_device,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
