// Repository modules
pub mod income_category_repository;
pub mod ledger_repository;
pub mod savings_goal_repository;

// Re-export repository types
pub use income_category_repository::IncomeCategoryRepository;
pub use ledger_repository::LedgerRepository;
pub use savings_goal_repository::SavingsGoalRepository;
