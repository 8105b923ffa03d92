use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;

use crate::domain::models::ledger::{CategoryTotal, LedgerPosting};
use crate::domain::models::money::Money;
use crate::storage::connection::DbConnection;
use crate::storage::traits::LedgerStorage;

/// Repository for income ledger postings
#[derive(Clone)]
pub struct LedgerRepository {
    db: DbConnection,
}

impl LedgerRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerStorage for LedgerRepository {
    async fn record_income_allocation(&self, posting: &LedgerPosting) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO income_postings (id, user_id, category_code, amount_minor, posted_at, batch_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&posting.id)
        .bind(posting.user_id)
        .bind(&posting.category_code)
        .bind(posting.amount.minor())
        .bind(&posting.posted_at)
        .bind(&posting.batch_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_postings(&self, user_id: i64, limit: Option<u32>) -> Result<Vec<LedgerPosting>> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map(i64::from).unwrap_or(-1);
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, category_code, amount_minor, posted_at, batch_id
            FROM income_postings
            WHERE user_id = ?
            ORDER BY posted_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        let postings = rows
            .iter()
            .map(|row| LedgerPosting {
                id: row.get("id"),
                user_id: row.get("user_id"),
                category_code: row.get("category_code"),
                amount: Money::from_minor(row.get("amount_minor")),
                posted_at: row.get("posted_at"),
                batch_id: row.get("batch_id"),
            })
            .collect();

        Ok(postings)
    }

    async fn category_totals(&self, user_id: i64) -> Result<Vec<CategoryTotal>> {
        let rows = sqlx::query(
            r#"
            SELECT category_code, SUM(amount_minor) AS total, COUNT(*) AS postings
            FROM income_postings
            WHERE user_id = ?
            GROUP BY category_code
            ORDER BY category_code ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let totals = rows
            .iter()
            .map(|row| CategoryTotal {
                category_code: row.get("category_code"),
                amount: Money::from_minor(row.get("total")),
                postings: row.get::<i64, _>("postings") as u32,
            })
            .collect();

        Ok(totals)
    }
}
