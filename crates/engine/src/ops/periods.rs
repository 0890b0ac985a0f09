use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::feed::RecordKind;
use crate::periods::{self, CustomBudgetPeriod, CustomBudgetPeriodNew};
use crate::users;
use crate::{EngineError, ResultEngine, Scope};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Custom budget periods always live under the user, never the group.
    pub async fn list_budget_periods(&self, uid: &str) -> ResultEngine<Vec<CustomBudgetPeriod>> {
        self.profile_on(&self.database, uid).await?;
        let models = periods::Entity::find()
            .filter(periods::Column::UserId.eq(uid))
            .order_by_desc(periods::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(CustomBudgetPeriod::try_from).collect()
    }

    pub async fn add_budget_period(
        &self,
        uid: &str,
        new: CustomBudgetPeriodNew,
        now: DateTime<Utc>,
    ) -> ResultEngine<CustomBudgetPeriod> {
        if new.start_date > new.end_date {
            return Err(EngineError::InvalidInput(
                "budget period start is after end".to_string(),
            ));
        }
        let period = with_tx!(self, |db_tx| {
            async {
                self.profile_on(&db_tx, uid).await?;
                let period = CustomBudgetPeriod {
                    id: Uuid::new_v4(),
                    user_id: uid.to_string(),
                    name: normalize_required_text(&new.name, "budget period name")?,
                    start_date: new.start_date,
                    end_date: new.end_date,
                    created_at: now,
                };
                periods::ActiveModel::from(&period).insert(&db_tx).await?;
                Ok::<_, EngineError>(period)
            }
            .await
        })?;
        self.feed
            .publish(Scope::Personal(uid.to_string()), RecordKind::Profile);
        Ok(period)
    }

    /// Deletes a custom period; a profile still selecting it is reset.
    pub async fn remove_budget_period(&self, uid: &str, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            async {
                let profile = self.profile_on(&db_tx, uid).await?;
                let result = periods::Entity::delete_by_id(id.to_string())
                    .filter(periods::Column::UserId.eq(uid))
                    .exec(&db_tx)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(EngineError::KeyNotFound(
                        "budget period not exists".to_string(),
                    ));
                }

                if profile.selected_budget_period_id.as_deref() == Some(id.to_string().as_str()) {
                    let active = users::ActiveModel {
                        uid: ActiveValue::Set(uid.to_string()),
                        selected_budget_period_id: ActiveValue::Set(None),
                        ..Default::default()
                    };
                    active.update(&db_tx).await?;
                }
                Ok(())
            }
            .await
        })?;
        self.feed
            .publish(Scope::Personal(uid.to_string()), RecordKind::Profile);
        Ok(())
    }
}
