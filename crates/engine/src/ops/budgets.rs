use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::budgets::{self, Budget, BudgetNew, BudgetPatch, period_window};
use crate::feed::RecordKind;
use crate::{EngineError, ResultEngine, Scope};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    pub async fn list_budgets(&self, uid: &str) -> ResultEngine<Vec<Budget>> {
        let scope = self.resolve_scope(uid).await?;
        let models = budgets::Entity::find()
            .filter(budgets::Column::ScopeKind.eq(scope.kind()))
            .filter(budgets::Column::ScopeId.eq(scope.id()))
            .order_by_desc(budgets::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Budget::try_from).collect()
    }

    pub async fn add_budget(
        &self,
        uid: &str,
        new: BudgetNew,
        now: DateTime<Utc>,
    ) -> ResultEngine<Budget> {
        let period = normalize_required_text(&new.period, "budget period")?;
        if period_window(new.budget_type, &period).is_none() {
            return Err(EngineError::InvalidInput(format!(
                "period {period} does not match a {} budget",
                new.budget_type.as_str()
            )));
        }

        let budget = with_tx!(self, |db_tx| {
            async {
                let scope = self.scoped_profile_on(&db_tx, uid).await?.1;
                let budget = Budget {
                    id: Uuid::new_v4(),
                    scope,
                    budget_type: new.budget_type,
                    period,
                    amount: new.amount,
                    currency: normalize_required_text(&new.currency, "currency")?,
                    user_id: uid.to_string(),
                    device: new.device,
                    edited_device: None,
                    created_at: now,
                    updated_at: now,
                };
                budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
                Ok::<_, EngineError>(budget)
            }
            .await
        })?;
        self.feed.publish(budget.scope.clone(), RecordKind::Budget);
        Ok(budget)
    }

    pub async fn update_budget(
        &self,
        uid: &str,
        id: Uuid,
        patch: BudgetPatch,
        now: DateTime<Utc>,
    ) -> ResultEngine<Budget> {
        let budget = with_tx!(self, |db_tx| {
            async {
                let scope = self.scoped_profile_on(&db_tx, uid).await?.1;
                let model = find_in_scope(&db_tx, &scope, id).await?;
                let stored = Budget::try_from(model)?;

                let budget_type = patch.budget_type.unwrap_or(stored.budget_type);
                let period = match patch.period {
                    Some(period) => normalize_required_text(&period, "budget period")?,
                    None => stored.period,
                };
                if period_window(budget_type, &period).is_none() {
                    return Err(EngineError::InvalidInput(format!(
                        "period {period} does not match a {} budget",
                        budget_type.as_str()
                    )));
                }

                let updated = Budget {
                    id: stored.id,
                    scope: stored.scope,
                    budget_type,
                    period,
                    amount: patch.amount.unwrap_or(stored.amount),
                    currency: match patch.currency {
                        Some(currency) => normalize_required_text(&currency, "currency")?,
                        None => stored.currency,
                    },
                    user_id: stored.user_id,
                    device: stored.device,
                    edited_device: patch.device.or(stored.edited_device),
                    created_at: stored.created_at,
                    updated_at: now,
                };
                budgets::ActiveModel::from(&updated).update(&db_tx).await?;
                Ok(updated)
            }
            .await
        })?;
        self.feed.publish(budget.scope.clone(), RecordKind::Budget);
        Ok(budget)
    }

    pub async fn remove_budget(&self, uid: &str, id: Uuid) -> ResultEngine<()> {
        let scope = with_tx!(self, |db_tx| {
            async {
                let scope = self.scoped_profile_on(&db_tx, uid).await?.1;
                let result = budgets::Entity::delete_by_id(id.to_string())
                    .filter(budgets::Column::ScopeKind.eq(scope.kind()))
                    .filter(budgets::Column::ScopeId.eq(scope.id()))
                    .exec(&db_tx)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(EngineError::KeyNotFound("budget not exists".to_string()));
                }
                Ok(scope)
            }
            .await
        })?;
        self.feed.publish(scope, RecordKind::Budget);
        Ok(())
    }
}

async fn find_in_scope<C: ConnectionTrait>(
    db: &C,
    scope: &Scope,
    id: Uuid,
) -> ResultEngine<budgets::Model> {
    budgets::Entity::find_by_id(id.to_string())
        .filter(budgets::Column::ScopeKind.eq(scope.kind()))
        .filter(budgets::Column::ScopeId.eq(scope.id()))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))
}
