//! Custom budget periods: user-named explicit start/end windows, always
//! stored under the user's profile (never group-scoped). A profile's
//! `selected_budget_period_id` references one of these when the chosen
//! budget period is not a named token.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomBudgetPeriod {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomBudgetPeriodNew {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "custom_budget_periods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Uid"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CustomBudgetPeriod> for ActiveModel {
    fn from(period: &CustomBudgetPeriod) -> Self {
        Self {
            id: ActiveValue::Set(period.id.to_string()),
            user_id: ActiveValue::Set(period.user_id.clone()),
            name: ActiveValue::Set(period.name.clone()),
            start_date: ActiveValue::Set(period.start_date),
            end_date: ActiveValue::Set(period.end_date),
            created_at: ActiveValue::Set(period.created_at),
        }
    }
}

impl TryFrom<Model> for CustomBudgetPeriod {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("budget period not exists".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            start_date: model.start_date,
            end_date: model.end_date,
            created_at: model.created_at,
        })
    }
}
