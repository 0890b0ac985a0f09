//! Income records.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Scope};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: Uuid,
    pub scope: Scope,
    pub date: NaiveDate,
    pub amount: f64,
    pub currency: String,
    pub description: Option<String>,
    pub user_id: String,
    pub device: Option<String>,
    pub edited_device: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncomeNew {
    pub date: NaiveDate,
    pub amount: f64,
    pub currency: String,
    pub description: Option<String>,
    pub device: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomePatch {
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub device: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub scope_kind: String,
    pub scope_id: String,
    pub date: Date,
    pub amount: f64,
    pub currency: String,
    pub description: Option<String>,
    pub user_id: String,
    pub device: Option<String>,
    pub edited_device: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Income> for ActiveModel {
    fn from(income: &Income) -> Self {
        Self {
            id: ActiveValue::Set(income.id.to_string()),
            scope_kind: ActiveValue::Set(income.scope.kind().to_string()),
            scope_id: ActiveValue::Set(income.scope.id().to_string()),
            date: ActiveValue::Set(income.date),
            amount: ActiveValue::Set(income.amount),
            currency: ActiveValue::Set(income.currency.clone()),
            description: ActiveValue::Set(income.description.clone()),
            user_id: ActiveValue::Set(income.user_id.clone()),
            device: ActiveValue::Set(income.device.clone()),
            edited_device: ActiveValue::Set(income.edited_device.clone()),
            created_at: ActiveValue::Set(income.created_at),
            updated_at: ActiveValue::Set(income.updated_at),
        }
    }
}

impl TryFrom<Model> for Income {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("income not exists".to_string()))?,
            scope: Scope::from_parts(&model.scope_kind, &model.scope_id)?,
            date: model.date,
            amount: model.amount,
            currency: model.currency,
            description: model.description,
            user_id: model.user_id,
            device: model.device,
            edited_device: model.edited_device,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
