//! Budget rows. At most one per (user, month, year), enforced by a unique index.

use sqlx::SqliteConnection;

use crate::ledger::Budget;

/// Fetch the budget for a period, creating it with amount 0 on first access.
///
/// Returns the row and whether this call created it.
pub async fn get_or_create(
    conn: &mut SqliteConnection,
    user_id: &str,
    year: i32,
    month: i32,
) -> Result<(Budget, bool), sqlx::Error> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO budgets (month, year, user_id, amount)
        VALUES (?, ?, ?, 0)
        ON CONFLICT (user_id, month, year) DO NOTHING
        "#,
    )
    .bind(month)
    .bind(year)
    .bind(user_id)
    .execute(&mut *conn)
    .await?
    .rows_affected()
        == 1;

    let budget = sqlx::query_as::<_, Budget>(
        r#"
        SELECT budget_id, month, year, user_id, amount
        FROM budgets
        WHERE user_id = ? AND year = ? AND month = ?
        "#,
    )
    .bind(user_id)
    .bind(year)
    .bind(month)
    .fetch_one(&mut *conn)
    .await?;

    Ok((budget, inserted))
}

/// Returns `false` if the user owns no such budget.
pub async fn update_amount(
    conn: &mut SqliteConnection,
    budget_id: i64,
    user_id: &str,
    amount: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE budgets SET amount = ? WHERE budget_id = ? AND user_id = ?")
        .bind(amount)
        .bind(budget_id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
