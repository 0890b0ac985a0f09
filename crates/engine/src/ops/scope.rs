//! Per-operation scope resolution.
//!
//! The profile row is the single source of truth and is re-read on every
//! operation; nothing caches the resolved scope across calls.

use sea_orm::prelude::*;

use crate::users::{self, AccountType, UserProfile};
use crate::{EngineError, ResultEngine, Scope};

use super::Engine;

pub(super) fn scope_of(profile: &UserProfile) -> ResultEngine<Scope> {
    match profile.account_type {
        AccountType::Personal => Ok(Scope::Personal(profile.uid.clone())),
        AccountType::Group => match &profile.group_id {
            Some(group_id) => Ok(Scope::Group(group_id.clone())),
            None => Err(EngineError::Unscoped(format!(
                "group account without a group: {}",
                profile.uid
            ))),
        },
    }
}

impl Engine {
    pub(super) async fn profile_on<C: ConnectionTrait>(
        &self,
        db: &C,
        uid: &str,
    ) -> ResultEngine<UserProfile> {
        let model = users::Entity::find_by_id(uid)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::Unscoped(format!("no profile for user: {uid}")))?;
        UserProfile::try_from(model)
    }

    /// Profile plus the scope it routes to, in one read.
    pub(super) async fn scoped_profile_on<C: ConnectionTrait>(
        &self,
        db: &C,
        uid: &str,
    ) -> ResultEngine<(UserProfile, Scope)> {
        let profile = self.profile_on(db, uid).await?;
        let scope = scope_of(&profile)?;
        Ok((profile, scope))
    }

    /// Resolves the caller's active scope from their profile.
    pub async fn resolve_scope(&self, uid: &str) -> ResultEngine<Scope> {
        let profile = self.profile_on(&self.database, uid).await?;
        scope_of(&profile)
    }
}
