//! User rows.

use sqlx::SqliteConnection;


/// Insert a user with empty profile fields. Returns `false` if it already existed.
pub async fn register(conn: &mut SqliteConnection, user_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (user_id, display_name, profile_picture)
        VALUES (?, '', '')
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
pub(crate) async fn find(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Option<crate::ledger::User>, sqlx::Error> {
    sqlx::query_as::<_, crate::ledger::User>(
        "SELECT user_id, display_name, profile_picture FROM users WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await
}

/// Returns `false` when no such user exists.
pub async fn update_display_name(
    conn: &mut SqliteConnection,
    user_id: &str,
    display_name: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET display_name = ? WHERE user_id = ?")
        .bind(display_name)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
