//! Aggregation over already-filtered record sets.
//!
//! All maps are `BTreeMap` keyed by currency (and category) so report
//! output is deterministically ordered. Amounts are summed per currency,
//! never converted between currencies.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::budgets::{Budget, period_window};
use crate::date_range::DateRange;
use crate::expenses::Expense;
use crate::incomes::Income;

/// Non-finite amounts contribute zero instead of poisoning a whole sum.
fn finite(amount: f64) -> f64 {
    if amount.is_finite() { amount } else { 0.0 }
}

pub fn sum_expenses_by_currency(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.currency.clone()).or_insert(0.0) += finite(expense.total_cost);
    }
    totals
}

pub fn sum_incomes_by_currency(incomes: &[Income]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for income in incomes {
        *totals.entry(income.currency.clone()).or_insert(0.0) += finite(income.amount);
    }
    totals
}

pub fn sum_by_category_and_currency(
    expenses: &[Expense],
) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut totals: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for expense in expenses {
        *totals
            .entry(expense.category.clone())
            .or_default()
            .entry(expense.currency.clone())
            .or_insert(0.0) += finite(expense.total_cost);
    }
    totals
}

/// Per-currency `incomes - expenses` over the union of currencies seen on
/// either side; a currency missing from one side counts as zero there.
pub fn currency_delta(
    incomes: &BTreeMap<String, f64>,
    expenses: &BTreeMap<String, f64>,
) -> BTreeMap<String, f64> {
    let currencies: BTreeSet<&String> = incomes.keys().chain(expenses.keys()).collect();
    currencies
        .into_iter()
        .map(|currency| {
            let income = incomes.get(currency).copied().unwrap_or(0.0);
            let expense = expenses.get(currency).copied().unwrap_or(0.0);
            (currency.clone(), income - expense)
        })
        .collect()
}

/// Budgets whose period window overlaps the range; malformed periods are
/// skipped rather than failing the report.
pub fn budgets_in_range<'a>(budgets: &'a [Budget], range: &DateRange) -> Vec<&'a Budget> {
    budgets
        .iter()
        .filter(|budget| {
            period_window(budget.budget_type, &budget.period)
                .is_some_and(|(start, end)| range.overlaps(start, end))
        })
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_expenses: BTreeMap<String, f64>,
    pub total_incomes: BTreeMap<String, f64>,
    pub expenses_by_category: BTreeMap<String, BTreeMap<String, f64>>,
    pub total_budgets: BTreeMap<String, f64>,
    /// incomes - expenses, per currency.
    pub profit_loss: BTreeMap<String, f64>,
    /// budgets - expenses, per currency.
    pub remaining_balance: BTreeMap<String, f64>,
    /// profit_loss minus the magnitude of remaining_balance, per currency.
    pub net_profit: BTreeMap<String, f64>,
    pub expense_count: usize,
    pub income_count: usize,
    pub budget_count: usize,
}

/// Builds the full summary from records already filtered to `range`.
/// Budgets are passed unfiltered; the overlap test happens here.
pub fn summarize(
    expenses: &[Expense],
    incomes: &[Income],
    budgets: &[Budget],
    range: &DateRange,
) -> Summary {
    let total_expenses = sum_expenses_by_currency(expenses);
    let total_incomes = sum_incomes_by_currency(incomes);
    let expenses_by_category = sum_by_category_and_currency(expenses);

    let active_budgets = budgets_in_range(budgets, range);
    let mut total_budgets: BTreeMap<String, f64> = BTreeMap::new();
    for budget in &active_budgets {
        *total_budgets.entry(budget.currency.clone()).or_insert(0.0) += finite(budget.amount);
    }

    let profit_loss = currency_delta(&total_incomes, &total_expenses);
    let remaining_balance = currency_delta(&total_budgets, &total_expenses);

    // Remaining balance contributes its magnitude: an overspent budget
    // reduces net profit by the overrun, an underspent one by the slack.
    let currencies: BTreeSet<String> = profit_loss
        .keys()
        .chain(remaining_balance.keys())
        .cloned()
        .collect();
    let net_profit = currencies
        .into_iter()
        .map(|currency| {
            let profit = profit_loss.get(&currency).copied().unwrap_or(0.0);
            let remaining = remaining_balance.get(&currency).copied().unwrap_or(0.0);
            (currency, profit - remaining.abs())
        })
        .collect();

    Summary {
        total_expenses,
        total_incomes,
        expenses_by_category,
        total_budgets,
        profit_loss,
        remaining_balance,
        net_profit,
        expense_count: expenses.len(),
        income_count: incomes.len(),
        budget_count: active_budgets.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budgets::BudgetType;
    use crate::scope::Scope;
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn scope() -> Scope {
        Scope::Personal("u-1".to_string())
    }

    fn stamp() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn expense(currency: &str, category: &str, total: f64) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            scope: scope(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            category: category.to_string(),
            item_name: "item".to_string(),
            quantity: 1.0,
            unit: None,
            price: total,
            currency: currency.to_string(),
            total_cost: total,
            user_id: "u-1".to_string(),
            created_by_name: None,
            device: None,
            edited_device: None,
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    fn income(currency: &str, amount: f64) -> Income {
        Income {
            id: Uuid::new_v4(),
            scope: scope(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            amount,
            currency: currency.to_string(),
            description: None,
            user_id: "u-1".to_string(),
            device: None,
            edited_device: None,
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    fn budget(currency: &str, budget_type: BudgetType, period: &str, amount: f64) -> Budget {
        Budget {
            id: Uuid::new_v4(),
            scope: scope(),
            budget_type,
            period: period.to_string(),
            amount,
            currency: currency.to_string(),
            user_id: "u-1".to_string(),
            device: None,
            edited_device: None,
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    fn june() -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 30)
                .unwrap()
                .and_hms_milli_opt(23, 59, 59, 999)
                .unwrap(),
        }
    }

    #[test]
    fn delta_spans_the_currency_union() {
        let incomes = sum_incomes_by_currency(&[income("USD", 100.0)]);
        let expenses = sum_expenses_by_currency(&[expense("USD", "Food", 50.0), expense("THB", "Food", 20.0)]);
        let delta = currency_delta(&incomes, &expenses);
        assert_eq!(delta.get("USD"), Some(&50.0));
        assert_eq!(delta.get("THB"), Some(&-20.0));
        assert_eq!(delta.len(), 2);
    }

    #[test]
    fn non_finite_amounts_count_as_zero() {
        let totals = sum_expenses_by_currency(&[
            expense("USD", "Food", f64::NAN),
            expense("USD", "Food", 10.0),
            expense("USD", "Food", f64::INFINITY),
        ]);
        assert_eq!(totals.get("USD"), Some(&10.0));
    }

    #[test]
    fn category_totals_group_by_category_then_currency() {
        let totals = sum_by_category_and_currency(&[
            expense("USD", "Food", 10.0),
            expense("USD", "Food", 5.0),
            expense("THB", "Transportation", 200.0),
        ]);
        assert_eq!(totals["Food"]["USD"], 15.0);
        assert_eq!(totals["Transportation"]["THB"], 200.0);
    }

    #[test]
    fn budgets_filter_by_period_overlap() {
        let budgets = vec![
            budget("USD", BudgetType::Monthly, "2024-06", 300.0),
            budget("USD", BudgetType::Monthly, "2024-04", 300.0),
            budget("USD", BudgetType::Weekly, "2024-05-27", 50.0), // runs into June 2
            budget("USD", BudgetType::Yearly, "garbage", 99.0),
        ];
        let active = budgets_in_range(&budgets, &june());
        assert_eq!(active.len(), 2);
    }

    #[test]
    fn net_profit_subtracts_the_remaining_balance_magnitude() {
        let expenses = [expense("USD", "Food", 100.0)];
        let incomes = [income("USD", 250.0)];
        let budgets = [budget("USD", BudgetType::Monthly, "2024-06", 300.0)];
        let summary = summarize(&expenses, &incomes, &budgets, &june());

        assert_eq!(summary.profit_loss["USD"], 150.0);
        assert_eq!(summary.remaining_balance["USD"], 200.0);
        assert_eq!(summary.net_profit["USD"], -50.0);
    }

    #[test]
    fn overspent_budget_also_reduces_net_profit() {
        let expenses = [expense("USD", "Food", 400.0)];
        let incomes = [income("USD", 500.0)];
        let budgets = [budget("USD", BudgetType::Monthly, "2024-06", 300.0)];
        let summary = summarize(&expenses, &incomes, &budgets, &june());

        assert_eq!(summary.remaining_balance["USD"], -100.0);
        assert_eq!(summary.net_profit["USD"], 0.0);
    }

    #[test]
    fn summarize_is_idempotent_over_the_same_input() {
        let expenses = [expense("USD", "Food", 12.5), expense("THB", "Shopping", 80.0)];
        let incomes = [income("USD", 40.0)];
        let budgets = [budget("THB", BudgetType::Monthly, "2024-06", 100.0)];
        let first = summarize(&expenses, &incomes, &budgets, &june());
        let second = summarize(&expenses, &incomes, &budgets, &june());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        let summary = summarize(&[], &[], &[], &june());
        assert!(summary.total_expenses.is_empty());
        assert!(summary.net_profit.is_empty());
        assert_eq!(summary.expense_count, 0);
    }
}
