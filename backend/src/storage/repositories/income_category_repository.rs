use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::income_category::IncomeCategory;
use crate::storage::connection::DbConnection;
use crate::storage::traits::IncomeCategoryStorage;

/// Repository for income category operations
#[derive(Clone)]
pub struct IncomeCategoryRepository {
    db: DbConnection,
}

impl IncomeCategoryRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> IncomeCategory {
        IncomeCategory {
            id: row.get("id"),
            user_id: row.get("user_id"),
            code: row.get("code"),
            title: row.get("title"),
            percent: row.get::<i64, _>("percent") as u32,
            position: row.get("position"),
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl IncomeCategoryStorage for IncomeCategoryRepository {
    async fn list_income_categories(&self, user_id: i64) -> Result<Vec<IncomeCategory>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, code, title, percent, position, is_active, created_at, updated_at
            FROM income_categories
            WHERE user_id = ? AND is_active = TRUE
            ORDER BY position ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::from_row).collect())
    }

    async fn list_all_income_categories(&self, user_id: i64) -> Result<Vec<IncomeCategory>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, code, title, percent, position, is_active, created_at, updated_at
            FROM income_categories
            WHERE user_id = ?
            ORDER BY position ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::from_row).collect())
    }

    async fn get_income_category(&self, user_id: i64, category_id: i64) -> Result<Option<IncomeCategory>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, code, title, percent, position, is_active, created_at, updated_at
            FROM income_categories
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::from_row))
    }

    async fn store_income_category(&self, category: &IncomeCategory) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO income_categories (user_id, code, title, percent, position, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(category.user_id)
        .bind(&category.code)
        .bind(&category.title)
        .bind(category.percent as i64)
        .bind(category.position)
        .bind(category.is_active)
        .bind(&category.created_at)
        .bind(&category.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update_income_category(&self, category: &IncomeCategory) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE income_categories
            SET title = ?, percent = ?, position = ?, is_active = ?, updated_at = ?
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(&category.title)
        .bind(category.percent as i64)
        .bind(category.position)
        .bind(category.is_active)
        .bind(&category.updated_at)
        .bind(category.user_id)
        .bind(category.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn deactivate_income_category(&self, user_id: i64, category_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE income_categories
            SET is_active = FALSE, updated_at = ?
            WHERE user_id = ? AND id = ? AND is_active = TRUE
            "#,
        )
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(user_id)
        .bind(category_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn next_position(&self, user_id: i64) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COALESCE(MAX(position), 0) + 1 AS next FROM income_categories WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(row.get("next"))
    }
}
