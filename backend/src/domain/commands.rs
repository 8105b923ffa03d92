//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer and are not
//! exposed over the API. The REST layer maps the DTOs from the `shared` crate
//! to these types.

pub mod income {
    use crate::domain::models::allocation::ConfirmationResult;
    use crate::domain::models::ledger::CategoryBalance;

    /// Input for previewing an allocation.
    #[derive(Debug, Clone)]
    pub struct CalculateAllocationCommand {
        pub user_id: i64,
        pub amount: f64,
    }

    /// Input for committing an allocation to the ledger.
    #[derive(Debug, Clone)]
    pub struct ConfirmAllocationCommand {
        pub user_id: i64,
        pub amount: f64,
    }

    /// Result of a confirm, with the savings goals it completed.
    #[derive(Debug, Clone)]
    pub struct ConfirmAllocationResult {
        pub confirmation: ConfirmationResult,
        /// Balances of confirmed categories whose goal is now reached
        pub reached_goals: Vec<CategoryBalance>,
    }

    /// Input for setting the savings goal of a category. A goal of zero clears it.
    #[derive(Debug, Clone)]
    pub struct SetSavingsGoalCommand {
        pub user_id: i64,
        pub category_code: String,
        pub goal: f64,
        pub purpose: String,
    }

    #[derive(Debug, Clone)]
    pub struct ResetSavingsGoalsResult {
        pub reset_count: u64,
        pub success_message: String,
    }

    /// Query parameters for listing ledger postings.
    #[derive(Debug, Clone)]
    pub struct ListPostingsQuery {
        pub user_id: i64,
        pub limit: Option<u32>,
    }
}

pub mod categories {
    use crate::domain::models::income_category::IncomeCategory;

    /// Input for creating a new income category.
    #[derive(Debug, Clone)]
    pub struct CreateIncomeCategoryCommand {
        pub user_id: i64,
        pub title: String,
        pub percent: Option<u32>,
    }

    /// Input for updating a category. `None` fields are left unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateIncomeCategoryCommand {
        pub user_id: i64,
        pub category_id: i64,
        pub title: Option<String>,
        pub percent: Option<u32>,
        pub position: Option<i64>,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteIncomeCategoryCommand {
        pub user_id: i64,
        pub category_id: i64,
    }

    /// Result of listing a user's active categories.
    #[derive(Debug, Clone)]
    pub struct IncomeCategoryListResult {
        pub categories: Vec<IncomeCategory>,
        pub total_percent: u32,
    }

    /// Result of creating or updating a category.
    #[derive(Debug, Clone)]
    pub struct IncomeCategoryResult {
        pub category: IncomeCategory,
        /// Sum of all active percents after the change
        pub total_percent: u32,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteIncomeCategoryResult {
        pub deleted_id: i64,
        pub total_percent: u32,
        pub success_message: String,
    }
}
