//! User profiles.
//!
//! A profile is the single source of truth for scope routing: the
//! `account_type` and `group_id` columns decide whether the user's records
//! live under the personal or the group namespace.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, scope};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Personal,
    Group,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => scope::PERSONAL_KIND,
            Self::Group => scope::GROUP_KIND,
        }
    }
}

impl TryFrom<&str> for AccountType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            scope::PERSONAL_KIND => Ok(Self::Personal),
            scope::GROUP_KIND => Ok(Self::Group),
            other => Err(EngineError::InvalidInput(format!(
                "invalid account type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub currency: String,
    pub language: String,
    pub account_type: AccountType,
    pub group_id: Option<String>,
    /// Role held in the current group, if any.
    pub group_role: Option<String>,
    pub budget_period: Option<String>,
    pub budget_start_date: Option<NaiveDate>,
    pub budget_end_date: Option<NaiveDate>,
    pub selected_budget_period_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields a profile-edit operation may change. Scope routing fields are
/// owned by the group ops and are not patchable here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub currency: Option<String>,
    pub language: Option<String>,
    pub budget_period: Option<String>,
    pub budget_start_date: Option<NaiveDate>,
    pub budget_end_date: Option<NaiveDate>,
    pub selected_budget_period_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub currency: String,
    pub language: String,
    pub account_type: String,
    pub group_id: Option<String>,
    pub group_role: Option<String>,
    pub budget_period: Option<String>,
    pub budget_start_date: Option<Date>,
    pub budget_end_date: Option<Date>,
    pub selected_budget_period_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&UserProfile> for ActiveModel {
    fn from(profile: &UserProfile) -> Self {
        Self {
            uid: ActiveValue::Set(profile.uid.clone()),
            email: ActiveValue::Set(profile.email.clone()),
            display_name: ActiveValue::Set(profile.display_name.clone()),
            currency: ActiveValue::Set(profile.currency.clone()),
            language: ActiveValue::Set(profile.language.clone()),
            account_type: ActiveValue::Set(profile.account_type.as_str().to_string()),
            group_id: ActiveValue::Set(profile.group_id.clone()),
            group_role: ActiveValue::Set(profile.group_role.clone()),
            budget_period: ActiveValue::Set(profile.budget_period.clone()),
            budget_start_date: ActiveValue::Set(profile.budget_start_date),
            budget_end_date: ActiveValue::Set(profile.budget_end_date),
            selected_budget_period_id: ActiveValue::Set(profile.selected_budget_period_id.clone()),
            created_at: ActiveValue::Set(profile.created_at),
        }
    }
}

impl TryFrom<Model> for UserProfile {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            uid: model.uid,
            email: model.email,
            display_name: model.display_name,
            currency: model.currency,
            language: model.language,
            account_type: AccountType::try_from(model.account_type.as_str())?,
            group_id: model.group_id,
            group_role: model.group_role,
            budget_period: model.budget_period,
            budget_start_date: model.budget_start_date,
            budget_end_date: model.budget_end_date,
            selected_budget_period_id: model.selected_budget_period_id,
            created_at: model.created_at,
        })
    }
}
