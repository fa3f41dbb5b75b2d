//! Relational persistence.
//!
//! # Data Flow
//! ```text
//! startup: DatabaseConfig → connect() → SqlitePool → init_schema()
//! request: pool → UnitOfWork::begin() → users / expenses / budgets → commit()
//! ```
//!
//! # Design Decisions
//! - Every repository function takes `&mut SqliteConnection`, so callers
//!   decide the transaction boundary
//! - One transaction per request; dropping a `UnitOfWork` rolls it back
//! - Runtime-checked queries (no compile-time database needed)

pub mod budgets;
pub mod expenses;
pub mod users;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, Transaction};

use crate::config::DatabaseConfig;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id         TEXT PRIMARY KEY NOT NULL,
        display_name    TEXT NOT NULL DEFAULT '',
        profile_picture TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS expenses (
        expense_id INTEGER PRIMARY KEY AUTOINCREMENT,
        cost       INTEGER NOT NULL,
        title      TEXT NOT NULL,
        category   TEXT NOT NULL,
        month      INTEGER NOT NULL,
        year       INTEGER NOT NULL,
        user_id    TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS expenses_by_period ON expenses (user_id, year, month)",
    r#"
    CREATE TABLE IF NOT EXISTS budgets (
        budget_id INTEGER PRIMARY KEY AUTOINCREMENT,
        month     INTEGER NOT NULL,
        year      INTEGER NOT NULL,
        user_id   TEXT NOT NULL,
        amount    INTEGER NOT NULL DEFAULT 0
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS budgets_one_per_period ON budgets (user_id, month, year)",
];

/// Open the pool and make sure the schema exists.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

    let pool_options = if config.is_in_memory() {
        // Each in-memory connection is its own database.
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    let pool = pool_options.connect_with(options).await?;
    init_schema(&pool).await?;

    tracing::info!(
        url = %config.url,
        in_memory = config.is_in_memory(),
        "Database ready"
    );

    Ok(pool)
}

/// Create tables and indexes that do not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// A request-scoped transaction.
///
/// Handlers commit explicitly; anything not committed is rolled back on drop.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub async fn begin(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    /// Connection to run repository calls against.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    connect(&config).await.expect("in-memory database")
}
