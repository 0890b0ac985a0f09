//! Budget records.
//!
//! A budget declares an amount for a period. The period token's format
//! depends on the type: an ISO date for the weekly start, `YYYY-MM` for
//! monthly, a year for yearly. Reports include a budget whenever its
//! period overlaps the active date range, not on exact equality.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Scope};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetType {
    Weekly,
    Monthly,
    Yearly,
}

impl BudgetType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl TryFrom<&str> for BudgetType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::InvalidInput(format!(
                "invalid budget type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub scope: Scope,
    pub budget_type: BudgetType,
    pub period: String,
    pub amount: f64,
    pub currency: String,
    pub user_id: String,
    pub device: Option<String>,
    pub edited_device: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetNew {
    pub budget_type: BudgetType,
    pub period: String,
    pub amount: f64,
    pub currency: String,
    pub device: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetPatch {
    pub budget_type: Option<BudgetType>,
    pub period: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub device: Option<String>,
}

/// Inclusive calendar window a budget period covers, or `None` when the
/// period token cannot be parsed for its type.
pub fn period_window(budget_type: BudgetType, period: &str) -> Option<(NaiveDate, NaiveDate)> {
    match budget_type {
        BudgetType::Yearly => {
            let year: i32 = period.trim().parse().ok()?;
            let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
            let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
            Some((start, end))
        }
        BudgetType::Monthly => {
            let (year, month) = period.trim().split_once('-')?;
            let year: i32 = year.parse().ok()?;
            let month: u32 = month.parse().ok()?;
            let start = NaiveDate::from_ymd_opt(year, month, 1)?;
            // Last day of the month: first of next month minus one day.
            let next = if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)?
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)?
            };
            Some((start, next.pred_opt()?))
        }
        BudgetType::Weekly => {
            let start = NaiveDate::parse_from_str(period.trim(), "%Y-%m-%d").ok()?;
            Some((start, start + chrono::Days::new(6)))
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub scope_kind: String,
    pub scope_id: String,
    pub budget_type: String,
    pub period: String,
    pub amount: f64,
    pub currency: String,
    pub user_id: String,
    pub device: Option<String>,
    pub edited_device: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id.to_string()),
            scope_kind: ActiveValue::Set(budget.scope.kind().to_string()),
            scope_id: ActiveValue::Set(budget.scope.id().to_string()),
            budget_type: ActiveValue::Set(budget.budget_type.as_str().to_string()),
            period: ActiveValue::Set(budget.period.clone()),
            amount: ActiveValue::Set(budget.amount),
            currency: ActiveValue::Set(budget.currency.clone()),
            user_id: ActiveValue::Set(budget.user_id.clone()),
            device: ActiveValue::Set(budget.device.clone()),
            edited_device: ActiveValue::Set(budget.edited_device.clone()),
            created_at: ActiveValue::Set(budget.created_at),
            updated_at: ActiveValue::Set(budget.updated_at),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("budget not exists".to_string()))?,
            scope: Scope::from_parts(&model.scope_kind, &model.scope_id)?,
            budget_type: BudgetType::try_from(model.budget_type.as_str())?,
            period: model.period,
            amount: model.amount,
            currency: model.currency,
            user_id: model.user_id,
            device: model.device,
            edited_device: model.edited_device,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_window_covers_whole_month() {
        let (start, end) = period_window(BudgetType::Monthly, "2024-02").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn weekly_window_spans_seven_days() {
        let (start, end) = period_window(BudgetType::Weekly, "2024-06-10").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 6, 16).unwrap());
    }

    #[test]
    fn yearly_window_is_calendar_year() {
        let (start, end) = period_window(BudgetType::Yearly, "2023").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn malformed_period_yields_none() {
        assert_eq!(period_window(BudgetType::Monthly, "02-2024"), None);
        assert_eq!(period_window(BudgetType::Yearly, "year"), None);
        assert_eq!(period_window(BudgetType::Weekly, "2024/06/10"), None);
    }
}
