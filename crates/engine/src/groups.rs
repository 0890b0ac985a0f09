//! Groups: shared namespaces with an owner, an invite code, and shared
//! currency/budget-period settings. The members map is a separate relation
//! (see [`crate::group_members`]).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub owner_id: String,
    pub invite_code: String,
    pub currency: String,
    pub budget_period: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(name: String, owner_id: String, currency: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            owner_id,
            invite_code: generate_invite_code(),
            currency,
            budget_period: None,
            created_at,
        }
    }
}

/// Short shareable code resolving to a group id.
fn generate_invite_code() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("GR-{}", raw[..8].to_uppercase())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub invite_code: String,
    pub currency: String,
    pub budget_period: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::group_members::Entity")]
    Members,
}

impl Related<super::group_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Group> for ActiveModel {
    fn from(group: &Group) -> Self {
        Self {
            id: ActiveValue::Set(group.id.to_string()),
            name: ActiveValue::Set(group.name.clone()),
            owner_id: ActiveValue::Set(group.owner_id.clone()),
            invite_code: ActiveValue::Set(group.invite_code.clone()),
            currency: ActiveValue::Set(group.currency.clone()),
            budget_period: ActiveValue::Set(group.budget_period.clone()),
            created_at: ActiveValue::Set(group.created_at),
        }
    }
}

impl TryFrom<Model> for Group {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("group not exists".to_string()))?,
            name: model.name,
            owner_id: model.owner_id,
            invite_code: model.invite_code,
            currency: model.currency,
            budget_period: model.budget_period,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_codes_are_prefixed_and_distinct() {
        let a = generate_invite_code();
        let b = generate_invite_code();
        assert!(a.starts_with("GR-"));
        assert_eq!(a.len(), 11);
        assert_ne!(a, b);
    }
}
