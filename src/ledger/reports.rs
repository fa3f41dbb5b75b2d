//! Chart aggregations over a user's expenses.
//!
//! Inputs are already filtered to the requested user and period by the
//! store; these functions only bucket and sum. Every bucket of the closed
//! category set (or all twelve months) is present in the output, zero-filled
//! when nothing was spent there.
//!
//! Sums are accumulated in `i128`, so no combination of stored costs can
//! overflow while summing. A total that does not fit the `i64` wire type is
//! reported as [`TotalOverflow`].

use serde::Serialize;
use thiserror::Error;

use crate::config::ShareMode;
use crate::ledger::types::{Category, Expense, MONTH_LABELS};

/// Bar and pie chart point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryPoint {
    pub label: &'static str,
    pub value: i64,
}

/// Line chart point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthPoint {
    pub label: &'static str,
    pub cost: i64,
}

/// A bucket total too large for a 64-bit chart value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Total for {label} is too large to report")]
pub struct TotalOverflow {
    pub label: &'static str,
}

fn narrow(label: &'static str, sum: i128) -> Result<i64, TotalOverflow> {
    i64::try_from(sum).map_err(|_| TotalOverflow { label })
}

fn sums_by_category(expenses: &[Expense]) -> [i128; Category::ALL.len()] {
    let mut sums = [0i128; Category::ALL.len()];
    for expense in expenses {
        sums[expense.category as usize] += i128::from(expense.cost);
    }
    sums
}

/// Total cost per category.
pub fn category_totals(expenses: &[Expense]) -> Result<Vec<CategoryPoint>, TotalOverflow> {
    let sums = sums_by_category(expenses);
    Category::ALL
        .into_iter()
        .map(|category| {
            Ok(CategoryPoint {
                label: category.label(),
                value: narrow(category.label(), sums[category as usize])?,
            })
        })
        .collect()
}

/// Total cost per calendar month, January first.
///
/// Expenses with a month outside 1..=12 are ignored.
pub fn monthly_totals(expenses: &[Expense]) -> Result<Vec<MonthPoint>, TotalOverflow> {
    let mut sums = [0i128; 12];
    for expense in expenses {
        if let Some(slot) = usize::try_from(expense.month - 1)
            .ok()
            .and_then(|idx| sums.get_mut(idx))
        {
            *slot += i128::from(expense.cost);
        }
    }

    MONTH_LABELS
        .into_iter()
        .zip(sums)
        .map(|(label, cost)| {
            Ok(MonthPoint {
                label,
                cost: narrow(label, cost)?,
            })
        })
        .collect()
}

/// Each category's share of the overall total.
///
/// Both modes use floor division. With `FloorRatio` a share is `sum / total`,
/// which is 0 for every category unless one category holds the entire total.
/// A zero total yields all-zero shares. Shares never exceed 100, so this
/// cannot overflow even when the totals themselves would.
pub fn category_shares(expenses: &[Expense], mode: ShareMode) -> Vec<CategoryPoint> {
    let sums = sums_by_category(expenses);
    let total: i128 = sums.iter().sum();

    Category::ALL
        .into_iter()
        .map(|category| {
            let sum = sums[category as usize];
            let share = if total == 0 {
                0
            } else {
                match mode {
                    ShareMode::FloorRatio => sum.div_euclid(total),
                    ShareMode::Percent => (sum * 100).div_euclid(total),
                }
            };
            CategoryPoint {
                label: category.label(),
                value: i64::try_from(share).unwrap_or(0),
            }
        })
        .collect()
}
