//! Budget arithmetic over a list of expenses.
//!
//! Everything here is pure: the functions take expenses and a limit and return
//! numbers, so the dashboard, the JSON API and the tests all agree on the
//! figures. Clamping for display lives on [BudgetSummary], not in the raw
//! computations.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{Expense, budget::MonthlyLimit, category::Category};

/// Spending at or above this percentage of the limit triggers a warning.
const WARNING_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Amounts that are not positive (e.g. zero from unreadable stored data) count as nothing.
fn effective_amount(expense: &Expense) -> Decimal {
    if expense.amount > Decimal::ZERO {
        expense.amount
    } else {
        Decimal::ZERO
    }
}

/// Sum the amounts of `expenses`, rounded to two decimal places.
///
/// An empty list totals zero. The sum saturates at [Decimal::MAX].
pub fn compute_total(expenses: &[Expense]) -> Decimal {
    expenses
        .iter()
        .map(effective_amount)
        .fold(Decimal::ZERO, Decimal::saturating_add)
        .round_dp(2)
}

/// How much of `limit` is left after spending `total`.
///
/// The result is negative when the limit has been exceeded.
pub fn compute_remaining(limit: MonthlyLimit, total: Decimal) -> Decimal {
    limit.amount().saturating_sub(total)
}

/// `total` as a percentage of `limit`.
///
/// Returns zero when the limit is zero. The result is not capped at 100 and
/// saturates at [Decimal::MAX].
pub fn compute_percent(limit: MonthlyLimit, total: Decimal) -> Decimal {
    let limit = limit.amount();

    if limit <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    total
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(limit))
        .or_else(|| {
            total
                .checked_div(limit)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        })
        .unwrap_or(Decimal::MAX)
}

/// Total spending per category.
///
/// Only categories with at least one expense appear in the map. Iterating the
/// map yields categories in alphabetical order of their labels.
pub fn group_by_category(expenses: &[Expense]) -> BTreeMap<Category, Decimal> {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        let total = totals.entry(expense.category).or_insert(Decimal::ZERO);
        *total = total.saturating_add(effective_amount(expense));
    }

    totals
}

/// Sort expenses with the most recent date first.
///
/// The sort is stable, so expenses on the same day keep their relative order.
pub fn sort_by_date_descending(mut expenses: Vec<Expense>) -> Vec<Expense> {
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
    expenses
}

/// How spending compares with the monthly limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// Under 80% of the limit.
    OnTrack,
    /// At least 80% of the limit.
    Warning,
    /// At least 100% of the limit.
    Exceeded,
}

impl BudgetStatus {
    fn from_percent(percent: Decimal) -> Self {
        if percent >= Decimal::ONE_HUNDRED {
            BudgetStatus::Exceeded
        } else if percent >= WARNING_PERCENT {
            BudgetStatus::Warning
        } else {
            BudgetStatus::OnTrack
        }
    }

    /// The message shown under the budget progress bar.
    pub fn message(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "You're on track! Keep up the good spending habits.",
            BudgetStatus::Warning => "Warning! You've reached 80% of your monthly budget.",
            BudgetStatus::Exceeded => {
                "Budget exceeded! You've spent more than your monthly limit."
            }
        }
    }
}

/// Everything the dashboard and the statistics endpoint show about a budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    pub limit: MonthlyLimit,
    pub total: Decimal,
    /// Unclamped, negative when over budget.
    pub remaining: Decimal,
    /// Unclamped, above 100 when over budget.
    pub percent: Decimal,
    pub transaction_count: usize,
    pub category_totals: BTreeMap<Category, Decimal>,
    /// The expenses, most recent first.
    pub expenses: Vec<Expense>,
}

impl BudgetSummary {
    /// Compute the summary for `expenses` against `limit`.
    pub fn summarize(limit: MonthlyLimit, expenses: Vec<Expense>) -> Self {
        let total = compute_total(&expenses);
        let category_totals = group_by_category(&expenses);

        Self {
            limit,
            total,
            remaining: compute_remaining(limit, total),
            percent: compute_percent(limit, total),
            transaction_count: expenses.len(),
            category_totals,
            expenses: sort_by_date_descending(expenses),
        }
    }

    /// The remaining amount, shown as zero once the limit is exceeded.
    pub fn display_remaining(&self) -> Decimal {
        self.remaining.max(Decimal::ZERO)
    }

    /// The percentage spent, capped at 100.
    pub fn display_percent(&self) -> Decimal {
        if self.limit.amount() <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        self.percent.min(Decimal::ONE_HUNDRED)
    }

    pub fn status(&self) -> BudgetStatus {
        BudgetStatus::from_percent(self.percent)
    }
}
