use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::feed::RecordKind;
use crate::users::{self, AccountType, ProfilePatch, UserProfile};
use crate::{EngineError, ResultEngine, Scope, budgets, categories, expenses, incomes, periods};

use super::{Engine, normalize_email, normalize_required_text, with_tx};

impl Engine {
    /// Creates the profile for a fresh user and seeds the default
    /// categories into their personal scope, in one transaction.
    pub async fn create_profile(
        &self,
        uid: &str,
        email: &str,
        display_name: &str,
        currency: &str,
        language: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<UserProfile> {
        let profile = with_tx!(self, |db_tx| {
            async {
                if users::Entity::find_by_id(uid).one(&db_tx).await?.is_some() {
                    return Err(EngineError::InvalidInput(format!(
                        "profile already exists: {uid}"
                    )));
                }

                let profile = UserProfile {
                    uid: uid.to_string(),
                    email: normalize_email(email)?,
                    display_name: normalize_required_text(display_name, "display name")?,
                    currency: normalize_required_text(currency, "currency")?,
                    language: normalize_required_text(language, "language")?,
                    account_type: AccountType::Personal,
                    group_id: None,
                    group_role: None,
                    budget_period: None,
                    budget_start_date: None,
                    budget_end_date: None,
                    selected_budget_period_id: None,
                    created_at: now,
                };
                users::ActiveModel::from(&profile).insert(&db_tx).await?;

                let scope = Scope::Personal(uid.to_string());
                self.seed_default_categories(&db_tx, &scope, &profile.language)
                    .await?;
                Ok(profile)
            }
            .await
        })?;
        self.feed
            .publish(Scope::Personal(uid.to_string()), RecordKind::Profile);
        Ok(profile)
    }

    pub async fn user_profile(&self, uid: &str) -> ResultEngine<UserProfile> {
        self.profile_on(&self.database, uid).await
    }

    /// Merges the patch into the profile. Scope routing fields
    /// (account_type, group_id) belong to the group ops and cannot be
    /// changed here.
    pub async fn update_profile(
        &self,
        uid: &str,
        patch: ProfilePatch,
    ) -> ResultEngine<UserProfile> {
        let profile = with_tx!(self, |db_tx| {
            async {
                let stored = self.profile_on(&db_tx, uid).await?;
                let updated = UserProfile {
                    uid: stored.uid,
                    email: stored.email,
                    display_name: match patch.display_name {
                        Some(name) => normalize_required_text(&name, "display name")?,
                        None => stored.display_name,
                    },
                    currency: match patch.currency {
                        Some(currency) => normalize_required_text(&currency, "currency")?,
                        None => stored.currency,
                    },
                    language: match patch.language {
                        Some(language) => normalize_required_text(&language, "language")?,
                        None => stored.language,
                    },
                    account_type: stored.account_type,
                    group_id: stored.group_id,
                    group_role: stored.group_role,
                    budget_period: patch.budget_period.or(stored.budget_period),
                    budget_start_date: patch.budget_start_date.or(stored.budget_start_date),
                    budget_end_date: patch.budget_end_date.or(stored.budget_end_date),
                    selected_budget_period_id: patch
                        .selected_budget_period_id
                        .or(stored.selected_budget_period_id),
                    created_at: stored.created_at,
                };
                users::ActiveModel::from(&updated).update(&db_tx).await?;
                Ok::<_, EngineError>(updated)
            }
            .await
        })?;
        self.feed
            .publish(Scope::Personal(uid.to_string()), RecordKind::Profile);
        Ok(profile)
    }

    /// Deletes the user's personal-scope records, custom periods and the
    /// profile itself. Group-scoped records stay with the group.
    pub async fn delete_user_data(&self, uid: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            async {
                self.profile_on(&db_tx, uid).await?;
                let scope = Scope::Personal(uid.to_string());

                expenses::Entity::delete_many()
                    .filter(expenses::Column::ScopeKind.eq(scope.kind()))
                    .filter(expenses::Column::ScopeId.eq(scope.id()))
                    .exec(&db_tx)
                    .await?;
                incomes::Entity::delete_many()
                    .filter(incomes::Column::ScopeKind.eq(scope.kind()))
                    .filter(incomes::Column::ScopeId.eq(scope.id()))
                    .exec(&db_tx)
                    .await?;
                budgets::Entity::delete_many()
                    .filter(budgets::Column::ScopeKind.eq(scope.kind()))
                    .filter(budgets::Column::ScopeId.eq(scope.id()))
                    .exec(&db_tx)
                    .await?;
                categories::Entity::delete_many()
                    .filter(categories::Column::ScopeKind.eq(scope.kind()))
                    .filter(categories::Column::ScopeId.eq(scope.id()))
                    .exec(&db_tx)
                    .await?;
                periods::Entity::delete_many()
                    .filter(periods::Column::UserId.eq(uid))
                    .exec(&db_tx)
                    .await?;

                let active = users::ActiveModel {
                    uid: ActiveValue::Set(uid.to_string()),
                    ..Default::default()
                };
                active.delete(&db_tx).await?;
                Ok::<_, EngineError>(())
            }
            .await
        })?;
        self.feed
            .publish(Scope::Personal(uid.to_string()), RecordKind::Profile);
        Ok(())
    }
}
