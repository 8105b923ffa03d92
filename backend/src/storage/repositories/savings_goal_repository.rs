use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;

use crate::domain::models::money::Money;
use crate::domain::models::savings_goal::SavingsGoal;
use crate::storage::connection::DbConnection;
use crate::storage::traits::SavingsGoalStorage;

/// Repository for per-category savings goals
#[derive(Clone)]
pub struct SavingsGoalRepository {
    db: DbConnection,
}

impl SavingsGoalRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SavingsGoalStorage for SavingsGoalRepository {
    async fn upsert_savings_goal(&self, goal: &SavingsGoal) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO savings_goals (user_id, category_code, goal_minor, purpose, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (user_id, category_code)
            DO UPDATE SET goal_minor = excluded.goal_minor,
                          purpose = excluded.purpose,
                          updated_at = excluded.updated_at
            "#,
        )
        .bind(goal.user_id)
        .bind(&goal.category_code)
        .bind(goal.goal.minor())
        .bind(&goal.purpose)
        .bind(&goal.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_savings_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, category_code, goal_minor, purpose, updated_at
            FROM savings_goals
            WHERE user_id = ?
            ORDER BY category_code ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let goals = rows
            .iter()
            .map(|row| SavingsGoal {
                user_id: row.get("user_id"),
                category_code: row.get("category_code"),
                goal: Money::from_minor(row.get("goal_minor")),
                purpose: row.get("purpose"),
                updated_at: row.get("updated_at"),
            })
            .collect();

        Ok(goals)
    }

    async fn reset_savings_goals(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE savings_goals
            SET goal_minor = 0, purpose = '', updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected())
    }
}
