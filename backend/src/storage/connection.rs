use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use super::repositories::{IncomeCategoryRepository, LedgerRepository, SavingsGoalRepository};
use super::traits::Connection;

/// DbConnection manages the SQLite pool shared by all repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Connecting to database {}", url))?;

        Self::setup_schema(&pool).await?;
        info!("Database ready at {}", url);

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize an isolated in-memory database for tests.
    ///
    /// A single connection that never expires keeps the in-memory database
    /// alive for the lifetime of the pool.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS income_categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                code TEXT NOT NULL,
                title TEXT NOT NULL,
                percent INTEGER NOT NULL CHECK (percent >= 0 AND percent <= 100),
                position INTEGER NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (user_id, code)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Lookup of a user's active categories in display order
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_income_categories_user_active
            ON income_categories(user_id, is_active, position);
            "#,
        )
        .execute(pool)
        .await?;

        // Ledger postings; amounts are stored in minor units
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS income_postings (
                id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                category_code TEXT NOT NULL,
                amount_minor INTEGER NOT NULL,
                posted_at TEXT NOT NULL,
                batch_id TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_income_postings_user_posted_at
            ON income_postings(user_id, posted_at DESC);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_income_postings_user_code
            ON income_postings(user_id, category_code);
            "#,
        )
        .execute(pool)
        .await?;

        // Goals are keyed by code so they outlive a deactivated category
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS savings_goals (
                user_id INTEGER NOT NULL,
                category_code TEXT NOT NULL,
                goal_minor INTEGER NOT NULL CHECK (goal_minor >= 0),
                purpose TEXT NOT NULL DEFAULT '',
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, category_code)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type IncomeCategoryRepository = IncomeCategoryRepository;
    type LedgerRepository = LedgerRepository;
    type SavingsGoalRepository = SavingsGoalRepository;

    fn create_income_category_repository(&self) -> Self::IncomeCategoryRepository {
        IncomeCategoryRepository::new(self.clone())
    }

    fn create_ledger_repository(&self) -> Self::LedgerRepository {
        LedgerRepository::new(self.clone())
    }

    fn create_savings_goal_repository(&self) -> Self::SavingsGoalRepository {
        SavingsGoalRepository::new(self.clone())
    }
}
