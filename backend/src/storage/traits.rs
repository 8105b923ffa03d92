//! # Storage Traits
//!
//! Storage abstractions used by the domain layer. The allocation engine only
//! ever reads categories through [`IncomeCategoryStorage`] and writes postings
//! through [`LedgerStorage`]; the SQLite repositories are one implementation.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::income_category::IncomeCategory;
use crate::domain::models::ledger::{CategoryTotal, LedgerPosting};
use crate::domain::models::savings_goal::SavingsGoal;

/// Category configuration store, owned by the settings side of the app
#[async_trait]
pub trait IncomeCategoryStorage: Send + Sync {
    /// Active categories for a user ordered by position, then id
    async fn list_income_categories(&self, user_id: i64) -> Result<Vec<IncomeCategory>>;

    /// Every category ever created for a user, including deactivated ones
    async fn list_all_income_categories(&self, user_id: i64) -> Result<Vec<IncomeCategory>>;

    async fn get_income_category(&self, user_id: i64, category_id: i64) -> Result<Option<IncomeCategory>>;

    /// Insert a new category and return its id. The `id` field of the input is ignored.
    async fn store_income_category(&self, category: &IncomeCategory) -> Result<i64>;

    async fn update_income_category(&self, category: &IncomeCategory) -> Result<()>;

    /// Returns true if an active category was found and deactivated
    async fn deactivate_income_category(&self, user_id: i64, category_id: i64) -> Result<bool>;

    /// Position one past the highest position in use for the user
    async fn next_position(&self, user_id: i64) -> Result<i64>;
}

/// Ledger of confirmed income allocations
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Persist a single posting
    async fn record_income_allocation(&self, posting: &LedgerPosting) -> Result<()>;

    /// Most recent postings first
    async fn list_postings(&self, user_id: i64, limit: Option<u32>) -> Result<Vec<LedgerPosting>>;

    /// Sum of postings per category code, ordered by code
    async fn category_totals(&self, user_id: i64) -> Result<Vec<CategoryTotal>>;
}

/// Per-category savings goals
#[async_trait]
pub trait SavingsGoalStorage: Send + Sync {
    /// Insert or replace the goal for `(user_id, category_code)`
    async fn upsert_savings_goal(&self, goal: &SavingsGoal) -> Result<()>;

    /// All goals of a user ordered by category code, including zero goals
    async fn list_savings_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>>;

    /// Set every goal of the user back to zero with an empty purpose; returns the rows touched
    async fn reset_savings_goals(&self, user_id: i64) -> Result<u64>;
}

/// Factory for the repositories of one storage backend.
///
/// Services are generic over this trait so that the domain layer never names
/// a concrete backend.
pub trait Connection: Send + Sync + Clone {
    type IncomeCategoryRepository: IncomeCategoryStorage + Clone;
    type LedgerRepository: LedgerStorage + Clone;
    type SavingsGoalRepository: SavingsGoalStorage + Clone;

    fn create_income_category_repository(&self) -> Self::IncomeCategoryRepository;

    fn create_ledger_repository(&self) -> Self::LedgerRepository;

    fn create_savings_goal_repository(&self) -> Self::SavingsGoalRepository;
}
