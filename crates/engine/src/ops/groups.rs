use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::feed::RecordKind;
use crate::group_members::{self, Member, MemberRole};
use crate::groups::{self, Group};
use crate::users::{self, AccountType};
use crate::{EngineError, ResultEngine, Scope};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Creates a group and moves the creator into it: group row, admin
    /// membership, profile flip and default category seeding all commit
    /// together or not at all.
    pub async fn create_group(
        &self,
        uid: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Group> {
        let name = normalize_required_text(name, "group name")?;
        let group = with_tx!(self, |db_tx| {
            async {
                let profile = self.profile_on(&db_tx, uid).await?;
                if profile.group_id.is_some() {
                    return Err(EngineError::MemberAlreadyExists(uid.to_string()));
                }

                let group = Group::new(name, uid.to_string(), profile.currency.clone(), now);
                groups::ActiveModel::from(&group).insert(&db_tx).await?;

                insert_membership(&db_tx, &group.id, uid, MemberRole::Admin).await?;
                flip_to_group(&db_tx, uid, &group.id, MemberRole::Admin).await?;

                let scope = Scope::Group(group.id.to_string());
                self.seed_default_categories(&db_tx, &scope, &profile.language)
                    .await?;
                Ok(group)
            }
            .await
        })?;
        self.feed
            .publish(Scope::Group(group.id.to_string()), RecordKind::Membership);
        Ok(group)
    }

    /// Joins the group the invite code resolves to. A user already in a
    /// group cannot join another.
    pub async fn join_group(&self, uid: &str, invite_code: &str) -> ResultEngine<Group> {
        let invite_code = invite_code.trim().to_string();
        let group = with_tx!(self, |db_tx| {
            async {
                let profile = self.profile_on(&db_tx, uid).await?;
                if profile.group_id.is_some() {
                    return Err(EngineError::MemberAlreadyExists(uid.to_string()));
                }

                let model = groups::Entity::find()
                    .filter(groups::Column::InviteCode.eq(invite_code.clone()))
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::InvalidInviteCode(invite_code.clone()))?;
                let group = Group::try_from(model)?;

                insert_membership(&db_tx, &group.id, uid, MemberRole::Member).await?;
                flip_to_group(&db_tx, uid, &group.id, MemberRole::Member).await?;
                Ok(group)
            }
            .await
        })?;
        self.feed
            .publish(Scope::Group(group.id.to_string()), RecordKind::Membership);
        Ok(group)
    }

    /// Removes a member (admin-only) and reverts their profile to the
    /// personal scope in the same transaction. The owner cannot be
    /// removed.
    pub async fn remove_member(
        &self,
        admin_uid: &str,
        group_id: Uuid,
        member_uid: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            async {
                let group = require_group(&db_tx, group_id).await?;
                require_admin(&db_tx, group_id, admin_uid).await?;
                if member_uid == group.owner_id {
                    return Err(EngineError::Forbidden(
                        "the group owner cannot be removed".to_string(),
                    ));
                }

                let result = group_members::Entity::delete_by_id((
                    group_id.to_string(),
                    member_uid.to_string(),
                ))
                .exec(&db_tx)
                .await?;
                if result.rows_affected == 0 {
                    return Err(EngineError::KeyNotFound("member not exists".to_string()));
                }

                revert_to_personal(&db_tx, member_uid).await?;
                Ok(())
            }
            .await
        })?;
        self.feed
            .publish(Scope::Group(group_id.to_string()), RecordKind::Membership);
        Ok(())
    }

    /// Member-initiated exit; the symmetric revert of a removal. The
    /// owner cannot leave their own group.
    pub async fn leave_group(&self, uid: &str) -> ResultEngine<()> {
        let group_id = with_tx!(self, |db_tx| {
            async {
                let profile = self.profile_on(&db_tx, uid).await?;
                let group_id = profile
                    .group_id
                    .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))?;
                let group_uuid = Uuid::parse_str(&group_id)
                    .map_err(|_| EngineError::KeyNotFound("group not exists".to_string()))?;
                let group = require_group(&db_tx, group_uuid).await?;
                if group.owner_id == uid {
                    return Err(EngineError::Forbidden(
                        "the group owner cannot leave".to_string(),
                    ));
                }

                group_members::Entity::delete_by_id((group_id.clone(), uid.to_string()))
                    .exec(&db_tx)
                    .await?;
                revert_to_personal(&db_tx, uid).await?;
                Ok(group_id)
            }
            .await
        })?;
        self.feed
            .publish(Scope::Group(group_id), RecordKind::Membership);
        Ok(())
    }

    /// Lists the group's members enriched with profile fields. Callers
    /// must belong to the group.
    pub async fn list_members(&self, uid: &str, group_id: Uuid) -> ResultEngine<Vec<Member>> {
        require_member(&self.database, group_id, uid).await?;

        let rows = group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group_id.to_string()))
            .find_also_related(users::Entity)
            .all(&self.database)
            .await?;

        let mut members = Vec::with_capacity(rows.len());
        for (membership, profile) in rows {
            let role = MemberRole::try_from(membership.role.as_str())?;
            let (email, display_name) = match profile {
                Some(profile) => (profile.email, profile.display_name),
                None => (String::new(), String::new()),
            };
            members.push(Member {
                uid: membership.user_id,
                role,
                email,
                display_name,
            });
        }
        Ok(members)
    }

    /// The group the caller currently belongs to.
    pub async fn current_group(&self, uid: &str) -> ResultEngine<Group> {
        let profile = self.profile_on(&self.database, uid).await?;
        let group_id = profile
            .group_id
            .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))?;
        let group_uuid = Uuid::parse_str(&group_id)
            .map_err(|_| EngineError::KeyNotFound("group not exists".to_string()))?;
        require_group(&self.database, group_uuid).await
    }
}

async fn require_group<C: ConnectionTrait>(db: &C, group_id: Uuid) -> ResultEngine<Group> {
    let model = groups::Entity::find_by_id(group_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))?;
    Group::try_from(model)
}

async fn membership<C: ConnectionTrait>(
    db: &C,
    group_id: Uuid,
    uid: &str,
) -> ResultEngine<Option<group_members::Model>> {
    Ok(
        group_members::Entity::find_by_id((group_id.to_string(), uid.to_string()))
            .one(db)
            .await?,
    )
}

pub(super) async fn require_member<C: ConnectionTrait>(
    db: &C,
    group_id: Uuid,
    uid: &str,
) -> ResultEngine<MemberRole> {
    let model = membership(db, group_id, uid)
        .await?
        .ok_or_else(|| EngineError::Forbidden(format!("not a member of the group: {uid}")))?;
    MemberRole::try_from(model.role.as_str())
}

pub(super) async fn require_admin<C: ConnectionTrait>(
    db: &C,
    group_id: Uuid,
    uid: &str,
) -> ResultEngine<()> {
    let role = require_member(db, group_id, uid).await?;
    if !role.is_admin() {
        return Err(EngineError::Forbidden(format!(
            "admin role required: {uid}"
        )));
    }
    Ok(())
}

async fn insert_membership(
    db_tx: &DatabaseTransaction,
    group_id: &Uuid,
    uid: &str,
    role: MemberRole,
) -> ResultEngine<()> {
    let active = group_members::ActiveModel {
        group_id: ActiveValue::Set(group_id.to_string()),
        user_id: ActiveValue::Set(uid.to_string()),
        role: ActiveValue::Set(role.as_str().to_string()),
    };
    active.insert(db_tx).await?;
    Ok(())
}

async fn flip_to_group(
    db_tx: &DatabaseTransaction,
    uid: &str,
    group_id: &Uuid,
    role: MemberRole,
) -> ResultEngine<()> {
    let active = users::ActiveModel {
        uid: ActiveValue::Set(uid.to_string()),
        account_type: ActiveValue::Set(AccountType::Group.as_str().to_string()),
        group_id: ActiveValue::Set(Some(group_id.to_string())),
        group_role: ActiveValue::Set(Some(role.as_str().to_string())),
        ..Default::default()
    };
    active.update(db_tx).await?;
    Ok(())
}

async fn revert_to_personal(db_tx: &DatabaseTransaction, uid: &str) -> ResultEngine<()> {
    let active = users::ActiveModel {
        uid: ActiveValue::Set(uid.to_string()),
        account_type: ActiveValue::Set(AccountType::Personal.as_str().to_string()),
        group_id: ActiveValue::Set(None),
        group_role: ActiveValue::Set(None),
        ..Default::default()
    };
    active.update(db_tx).await?;
    Ok(())
}
