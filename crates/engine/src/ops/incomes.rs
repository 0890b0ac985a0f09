use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::feed::RecordKind;
use crate::incomes::{self, Income, IncomeNew, IncomePatch};
use crate::{EngineError, ResultEngine, Scope};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    pub async fn list_incomes(&self, uid: &str) -> ResultEngine<Vec<Income>> {
        let scope = self.resolve_scope(uid).await?;
        let models = incomes::Entity::find()
            .filter(incomes::Column::ScopeKind.eq(scope.kind()))
            .filter(incomes::Column::ScopeId.eq(scope.id()))
            .order_by_desc(incomes::Column::Date)
            .order_by_desc(incomes::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Income::try_from).collect()
    }

    pub async fn add_income(
        &self,
        uid: &str,
        new: IncomeNew,
        now: DateTime<Utc>,
    ) -> ResultEngine<Income> {
        let income = with_tx!(self, |db_tx| {
            async {
                let scope = self.scoped_profile_on(&db_tx, uid).await?.1;
                let income = Income {
                    id: Uuid::new_v4(),
                    scope,
                    date: new.date,
                    amount: new.amount,
                    currency: normalize_required_text(&new.currency, "currency")?,
                    description: normalize_optional_text(new.description.as_deref()),
                    user_id: uid.to_string(),
                    device: new.device,
                    edited_device: None,
                    created_at: now,
                    updated_at: now,
                };
                incomes::ActiveModel::from(&income).insert(&db_tx).await?;
                Ok::<_, EngineError>(income)
            }
            .await
        })?;
        self.feed.publish(income.scope.clone(), RecordKind::Income);
        Ok(income)
    }

    pub async fn update_income(
        &self,
        uid: &str,
        id: Uuid,
        patch: IncomePatch,
        now: DateTime<Utc>,
    ) -> ResultEngine<Income> {
        let income = with_tx!(self, |db_tx| {
            async {
                let scope = self.scoped_profile_on(&db_tx, uid).await?.1;
                let model = find_in_scope(&db_tx, &scope, id).await?;
                let stored = Income::try_from(model)?;

                let updated = Income {
                    id: stored.id,
                    scope: stored.scope,
                    date: patch.date.unwrap_or(stored.date),
                    amount: patch.amount.unwrap_or(stored.amount),
                    currency: match patch.currency {
                        Some(currency) => normalize_required_text(&currency, "currency")?,
                        None => stored.currency,
                    },
                    description: match patch.description {
                        Some(description) => normalize_optional_text(Some(&description)),
                        None => stored.description,
                    },
                    user_id: stored.user_id,
                    device: stored.device,
                    edited_device: patch.device.or(stored.edited_device),
                    created_at: stored.created_at,
                    updated_at: now,
                };
                incomes::ActiveModel::from(&updated).update(&db_tx).await?;
                Ok::<_, EngineError>(updated)
            }
            .await
        })?;
        self.feed.publish(income.scope.clone(), RecordKind::Income);
        Ok(income)
    }

    pub async fn remove_income(&self, uid: &str, id: Uuid) -> ResultEngine<()> {
        let scope = with_tx!(self, |db_tx| {
            async {
                let scope = self.scoped_profile_on(&db_tx, uid).await?.1;
                let result = incomes::Entity::delete_by_id(id.to_string())
                    .filter(incomes::Column::ScopeKind.eq(scope.kind()))
                    .filter(incomes::Column::ScopeId.eq(scope.id()))
                    .exec(&db_tx)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(EngineError::KeyNotFound("income not exists".to_string()));
                }
                Ok(scope)
            }
            .await
        })?;
        self.feed.publish(scope, RecordKind::Income);
        Ok(())
    }
}

async fn find_in_scope<C: ConnectionTrait>(
    db: &C,
    scope: &Scope,
    id: Uuid,
) -> ResultEngine<incomes::Model> {
    incomes::Entity::find_by_id(id.to_string())
        .filter(incomes::Column::ScopeKind.eq(scope.kind()))
        .filter(incomes::Column::ScopeId.eq(scope.id()))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("income not exists".to_string()))
}
