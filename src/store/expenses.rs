//! Expense rows. Every query is scoped by owning user.

use sqlx::SqliteConnection;

use crate::ledger::{Expense, ExpenseChanges, NewExpense, Period};

const COLUMNS: &str = "expense_id, cost, title, category, month, year, user_id";

pub async fn insert(conn: &mut SqliteConnection, new: &NewExpense) -> Result<Expense, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO expenses (cost, title, category, month, year, user_id)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.cost)
    .bind(&new.title)
    .bind(new.category)
    .bind(new.month)
    .bind(new.year)
    .bind(&new.user_id)
    .execute(&mut *conn)
    .await?;

    Ok(Expense {
        expense_id: result.last_insert_rowid(),
        cost: new.cost,
        title: new.title.clone(),
        category: new.category,
        month: new.month,
        year: new.year,
        user_id: new.user_id.clone(),
    })
}

/// All of a user's expenses inside `period`, oldest first.
pub async fn list_for_period(
    conn: &mut SqliteConnection,
    user_id: &str,
    period: Period,
) -> Result<Vec<Expense>, sqlx::Error> {
    let filter = match period {
        Period::Month { .. } => "year = ? AND month = ?",
        Period::MonthOfAnyYear { .. } => "month = ?",
        Period::Year { .. } => "year = ?",
    };
    let sql = format!("SELECT {COLUMNS} FROM expenses WHERE user_id = ? AND {filter} ORDER BY expense_id");

    let query = sqlx::query_as::<_, Expense>(&sql).bind(user_id);
    let query = match period {
        Period::Month { year, month } => query.bind(year).bind(month),
        Period::MonthOfAnyYear { month } => query.bind(month),
        Period::Year { year } => query.bind(year),
    };

    query.fetch_all(&mut *conn).await
}

/// Overwrite title, cost and category. Returns `false` if the user owns no such expense.
pub async fn update(
    conn: &mut SqliteConnection,
    expense_id: i64,
    user_id: &str,
    changes: &ExpenseChanges,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE expenses SET title = ?, cost = ?, category = ? WHERE expense_id = ? AND user_id = ?",
    )
    .bind(&changes.title)
    .bind(changes.cost)
    .bind(changes.category)
    .bind(expense_id)
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns `false` if the user owns no such expense.
pub async fn delete(
    conn: &mut SqliteConnection,
    expense_id: i64,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM expenses WHERE expense_id = ? AND user_id = ?")
        .bind(expense_id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Category;
    use crate::store::{memory_pool, UnitOfWork};

    fn groceries(user_id: &str, cost: i64, month: i32, year: i32) -> NewExpense {
        NewExpense {
            user_id: user_id.into(),
            cost,
            title: "shop".into(),
            category: Category::Groceries,
            month,
            year,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_by_period() {
        let pool = memory_pool().await;
        let mut uow = UnitOfWork::begin(&pool).await.unwrap();

        let first = insert(uow.conn(), &groceries("u1", 50, 3, 2024)).await.unwrap();
        insert(uow.conn(), &groceries("u1", 20, 3, 2023)).await.unwrap();
        insert(uow.conn(), &groceries("u1", 10, 4, 2024)).await.unwrap();
        insert(uow.conn(), &groceries("u2", 99, 3, 2024)).await.unwrap();
        assert!(first.expense_id > 0);

        let march_2024 = list_for_period(uow.conn(), "u1", Period::Month { year: 2024, month: 3 })
            .await
            .unwrap();
        assert_eq!(march_2024, vec![first]);

        let any_march = list_for_period(uow.conn(), "u1", Period::MonthOfAnyYear { month: 3 })
            .await
            .unwrap();
        assert_eq!(any_march.iter().map(|e| e.cost).collect::<Vec<_>>(), vec![50, 20]);

        let year = list_for_period(uow.conn(), "u1", Period::Year { year: 2024 }).await.unwrap();
        assert_eq!(year.len(), 2);
        assert!(year.iter().all(|e| e.user_id == "u1"));
    }

    #[tokio::test]
    async fn test_category_persists_with_label() {
        let pool = memory_pool().await;
        let mut uow = UnitOfWork::begin(&pool).await.unwrap();

        let mut new = groceries("u1", 5, 1, 2024);
        new.category = Category::HousingRent;
        insert(uow.conn(), &new).await.unwrap();

        let stored: String = sqlx::query_scalar("SELECT category FROM expenses")
            .fetch_one(&mut *uow.conn())
            .await
            .unwrap();
        assert_eq!(stored, "Housing/Rent");
    }

    #[tokio::test]
    async fn test_update_and_delete_are_owner_scoped() {
        let pool = memory_pool().await;
        let mut uow = UnitOfWork::begin(&pool).await.unwrap();

        let expense = insert(uow.conn(), &groceries("u1", 50, 3, 2024)).await.unwrap();
        let changes = ExpenseChanges {
            cost: 75,
            title: "bigger shop".into(),
            category: Category::TakeOut,
        };

        assert!(!update(uow.conn(), expense.expense_id, "u2", &changes).await.unwrap());
        assert!(!delete(uow.conn(), expense.expense_id, "u2").await.unwrap());
        assert!(!update(uow.conn(), expense.expense_id + 100, "u1", &changes).await.unwrap());

        assert!(update(uow.conn(), expense.expense_id, "u1", &changes).await.unwrap());
        let stored = list_for_period(uow.conn(), "u1", Period::Year { year: 2024 }).await.unwrap();
        assert_eq!(stored[0].cost, 75);
        assert_eq!(stored[0].title, "bigger shop");
        assert_eq!(stored[0].category, Category::TakeOut);
        assert_eq!(stored[0].month, 3);

        assert!(delete(uow.conn(), expense.expense_id, "u1").await.unwrap());
        assert!(!delete(uow.conn(), expense.expense_id, "u1").await.unwrap());
    }
}
