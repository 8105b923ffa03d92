//! # Storage Module
//!
//! Handles data persistence for the income allocation service.
//!
//! The domain layer only depends on the traits in [`traits`]; the SQLite
//! implementation lives in [`connection`] and [`repositories`].
//!
//! ## Tables
//!
//! - **income_categories**: per-user allocation categories and their percents.
//!   Deleting a category only deactivates it so that old postings keep a title.
//! - **income_postings**: one row per confirmed allocation line, amounts in
//!   minor currency units.
//! - **savings_goals**: optional goal amount and purpose per category code.

pub mod connection;
pub mod repositories;
pub mod traits;

// Re-export the main types that other modules need
pub use connection::DbConnection;
pub use repositories::{IncomeCategoryRepository, LedgerRepository, SavingsGoalRepository};
pub use traits::{Connection, IncomeCategoryStorage, LedgerStorage, SavingsGoalStorage};
