use chrono::NaiveDateTime;

use crate::aggregate::{Summary, summarize};
use crate::date_range::{RangeToken, resolve_range};
use crate::ResultEngine;

use super::Engine;

impl Engine {
    /// The dashboard payload: records in the caller's scope filtered to
    /// the resolved range, aggregated per currency and category. `now`
    /// anchors the relative range tokens (and is explicit for tests).
    pub async fn summary(
        &self,
        uid: &str,
        token: RangeToken,
        custom_start: Option<&str>,
        custom_end: Option<&str>,
        now: NaiveDateTime,
    ) -> ResultEngine<Summary> {
        let range = resolve_range(token, custom_start, custom_end, now)?;

        let expenses: Vec<_> = self
            .list_expenses(uid)
            .await?
            .into_iter()
            .filter(|expense| range.contains(expense.date))
            .collect();
        let incomes: Vec<_> = self
            .list_incomes(uid)
            .await?
            .into_iter()
            .filter(|income| range.contains(income.date))
            .collect();
        let budgets = self.list_budgets(uid).await?;

        Ok(summarize(&expenses, &incomes, &budgets, &range))
    }
}
