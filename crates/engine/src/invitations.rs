//! Group invitations.
//!
//! An invitation is a pending record only: accept is implicit (the invitee
//! joins with the group's invite code and membership creation supersedes
//! the record), revoke deletes it. Email delivery is a side effect owned
//! by the caller and never rolls the record back.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

pub const STATUS_PENDING: &str = "pending";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: Uuid,
    pub group_id: Uuid,
    /// Stored lowercased; the duplicate-member guard compares on this.
    pub email: String,
    pub inviter_id: String,
    pub inviter_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invitations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub email: String,
    pub inviter_id: String,
    pub inviter_name: String,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    Group,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Invitation> for ActiveModel {
    fn from(invitation: &Invitation) -> Self {
        Self {
            id: ActiveValue::Set(invitation.id.to_string()),
            group_id: ActiveValue::Set(invitation.group_id.to_string()),
            email: ActiveValue::Set(invitation.email.clone()),
            inviter_id: ActiveValue::Set(invitation.inviter_id.clone()),
            inviter_name: ActiveValue::Set(invitation.inviter_name.clone()),
            status: ActiveValue::Set(invitation.status.clone()),
            created_at: ActiveValue::Set(invitation.created_at),
        }
    }
}

impl TryFrom<Model> for Invitation {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("invitation not exists".to_string()))?,
            group_id: Uuid::parse_str(&model.group_id)
                .map_err(|_| EngineError::KeyNotFound("group not exists".to_string()))?,
            email: model.email,
            inviter_id: model.inviter_id,
            inviter_name: model.inviter_name,
            status: model.status,
            created_at: model.created_at,
        })
    }
}
