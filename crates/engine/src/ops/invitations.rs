use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::feed::RecordKind;
use crate::invitations::{self, Invitation, STATUS_PENDING};
use crate::users;
use crate::{EngineError, ResultEngine, Scope};

use super::groups::{require_admin, require_member};
use super::{Engine, normalize_email, with_tx};

impl Engine {
    /// Records a pending invitation (admin-only). Re-inviting an email
    /// with a pending invitation returns the existing record unchanged;
    /// inviting a current member is rejected. Email delivery is the
    /// caller's side effect and never rolls the record back.
    pub async fn send_invitation(
        &self,
        uid: &str,
        group_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Invitation> {
        let email = normalize_email(email)?;
        let invitation = with_tx!(self, |db_tx| {
            async {
                let inviter = self.profile_on(&db_tx, uid).await?;
                require_admin(&db_tx, group_id, uid).await?;

                let member_emails: Vec<String> = users::Entity::find()
                    .filter(users::Column::GroupId.eq(group_id.to_string()))
                    .all(&db_tx)
                    .await?
                    .into_iter()
                    .map(|profile| profile.email.to_lowercase())
                    .collect();
                if member_emails.contains(&email) {
                    return Err(EngineError::MemberAlreadyExists(email.clone()));
                }

                if let Some(existing) = invitations::Entity::find()
                    .filter(invitations::Column::GroupId.eq(group_id.to_string()))
                    .filter(invitations::Column::Email.eq(email.clone()))
                    .filter(invitations::Column::Status.eq(STATUS_PENDING))
                    .one(&db_tx)
                    .await?
                {
                    return Invitation::try_from(existing);
                }

                let invitation = Invitation {
                    id: Uuid::new_v4(),
                    group_id,
                    email,
                    inviter_id: uid.to_string(),
                    inviter_name: inviter.display_name,
                    status: STATUS_PENDING.to_string(),
                    created_at: now,
                };
                invitations::ActiveModel::from(&invitation)
                    .insert(&db_tx)
                    .await?;
                Ok(invitation)
            }
            .await
        })?;
        self.feed
            .publish(Scope::Group(group_id.to_string()), RecordKind::Invitation);
        Ok(invitation)
    }

    /// Pending invitations of a group, visible to its members.
    pub async fn pending_invitations(
        &self,
        uid: &str,
        group_id: Uuid,
    ) -> ResultEngine<Vec<Invitation>> {
        require_member(&self.database, group_id, uid).await?;
        let models = invitations::Entity::find()
            .filter(invitations::Column::GroupId.eq(group_id.to_string()))
            .filter(invitations::Column::Status.eq(STATUS_PENDING))
            .order_by_desc(invitations::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Invitation::try_from).collect()
    }

    /// Revokes (deletes) a pending invitation, admin-only.
    pub async fn revoke_invitation(&self, uid: &str, invitation_id: Uuid) -> ResultEngine<()> {
        let group_id = with_tx!(self, |db_tx| {
            async {
                let model = invitations::Entity::find_by_id(invitation_id.to_string())
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| {
                        EngineError::KeyNotFound("invitation not exists".to_string())
                    })?;
                let invitation = Invitation::try_from(model)?;
                require_admin(&db_tx, invitation.group_id, uid).await?;

                invitations::Entity::delete_by_id(invitation_id.to_string())
                    .exec(&db_tx)
                    .await?;
                Ok::<_, EngineError>(invitation.group_id)
            }
            .await
        })?;
        self.feed
            .publish(Scope::Group(group_id.to_string()), RecordKind::Invitation);
        Ok(())
    }
}
