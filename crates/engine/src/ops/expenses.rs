use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::expenses::{self, Expense, ExpenseNew, ExpensePatch};
use crate::feed::RecordKind;
use crate::{EngineError, ResultEngine, Scope};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    /// Lists every expense in the caller's scope, newest first.
    pub async fn list_expenses(&self, uid: &str) -> ResultEngine<Vec<Expense>> {
        let scope = self.resolve_scope(uid).await?;
        let models = expenses::Entity::find()
            .filter(expenses::Column::ScopeKind.eq(scope.kind()))
            .filter(expenses::Column::ScopeId.eq(scope.id()))
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Expense::try_from).collect()
    }

    pub async fn add_expense(
        &self,
        uid: &str,
        new: ExpenseNew,
        now: DateTime<Utc>,
    ) -> ResultEngine<Expense> {
        let expense = with_tx!(self, |db_tx| {
            async {
                let (profile, scope) = self.scoped_profile_on(&db_tx, uid).await?;
                let expense = Expense {
                    id: Uuid::new_v4(),
                    scope,
                    date: new.date,
                    category: normalize_required_text(&new.category, "category")?,
                    item_name: normalize_required_text(&new.item_name, "item name")?,
                    quantity: new.quantity,
                    unit: normalize_optional_text(new.unit.as_deref()),
                    price: new.price,
                    currency: normalize_required_text(&new.currency, "currency")?,
                    total_cost: new.quantity * new.price,
                    user_id: uid.to_string(),
                    created_by_name: Some(profile.display_name),
                    device: new.device,
                    edited_device: None,
                    created_at: now,
                    updated_at: now,
                };
                expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
                Ok::<_, EngineError>(expense)
            }
            .await
        })?;
        self.feed.publish(expense.scope.clone(), RecordKind::Expense);
        Ok(expense)
    }

    /// Merges the patch into the stored row. `total_cost` is recomputed
    /// from the patched quantity/price, reading the stored counterpart
    /// when only one of the two is supplied.
    pub async fn update_expense(
        &self,
        uid: &str,
        id: Uuid,
        patch: ExpensePatch,
        now: DateTime<Utc>,
    ) -> ResultEngine<Expense> {
        let expense = with_tx!(self, |db_tx| {
            async {
                let scope = self.scoped_profile_on(&db_tx, uid).await?.1;
                let model = find_in_scope(&db_tx, &scope, id).await?;
                let stored = Expense::try_from(model)?;

                let quantity = patch.quantity.unwrap_or(stored.quantity);
                let price = patch.price.unwrap_or(stored.price);

                let updated = Expense {
                    id: stored.id,
                    scope: stored.scope,
                    date: patch.date.unwrap_or(stored.date),
                    category: match patch.category {
                        Some(name) => normalize_required_text(&name, "category")?,
                        None => stored.category,
                    },
                    item_name: match patch.item_name {
                        Some(name) => normalize_required_text(&name, "item name")?,
                        None => stored.item_name,
                    },
                    quantity,
                    unit: match patch.unit {
                        Some(unit) => normalize_optional_text(Some(&unit)),
                        None => stored.unit,
                    },
                    price,
                    currency: match patch.currency {
                        Some(currency) => normalize_required_text(&currency, "currency")?,
                        None => stored.currency,
                    },
                    total_cost: quantity * price,
                    user_id: stored.user_id,
                    created_by_name: stored.created_by_name,
                    device: stored.device,
                    edited_device: patch.device.or(stored.edited_device),
                    created_at: stored.created_at,
                    updated_at: now,
                };
                expenses::ActiveModel::from(&updated).update(&db_tx).await?;
                Ok::<_, EngineError>(updated)
            }
            .await
        })?;
        self.feed.publish(expense.scope.clone(), RecordKind::Expense);
        Ok(expense)
    }

    pub async fn remove_expense(&self, uid: &str, id: Uuid) -> ResultEngine<()> {
        let scope = with_tx!(self, |db_tx| {
            async {
                let scope = self.scoped_profile_on(&db_tx, uid).await?.1;
                let result = expenses::Entity::delete_by_id(id.to_string())
                    .filter(expenses::Column::ScopeKind.eq(scope.kind()))
                    .filter(expenses::Column::ScopeId.eq(scope.id()))
                    .exec(&db_tx)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(EngineError::KeyNotFound("expense not exists".to_string()));
                }
                Ok(scope)
            }
            .await
        })?;
        self.feed.publish(scope, RecordKind::Expense);
        Ok(())
    }
}

async fn find_in_scope<C: ConnectionTrait>(
    db: &C,
    scope: &Scope,
    id: Uuid,
) -> ResultEngine<expenses::Model> {
    expenses::Entity::find_by_id(id.to_string())
        .filter(expenses::Column::ScopeKind.eq(scope.kind()))
        .filter(expenses::Column::ScopeId.eq(scope.id()))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))
}
