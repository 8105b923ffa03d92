//! Domain models produced by the allocation engine.
use super::money::Money;

/// One category's share of an income amount.
///
/// `code`, `title` and `percent` are copied from the category when the line is
/// computed, so later edits to the category never change an existing line.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationLine {
    pub code: String,
    pub title: String,
    pub percent: u32,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    pub amount: Money,
    /// Lines in category position order
    pub allocations: Vec<AllocationLine>,
    /// Raw sum of category percents, never clamped
    pub total_percent: u32,
}

impl CalculationResult {
    pub fn allocated_total(&self) -> Money {
        self.allocations.iter().map(|line| line.amount).sum()
    }
}

/// Lines committed to the ledger by a single confirm call
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationResult {
    pub batch_id: String,
    pub posted_at: String,
    pub amount: Money,
    pub total_percent: u32,
    pub applied: Vec<AllocationLine>,
}

#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("Invalid amount {0}: must be a finite number greater than zero and within the allowed maximum")]
    InvalidAmount(f64),
    #[error("No income categories configured")]
    NoCategoriesConfigured,
    #[error("Invalid percent {percent} for category '{code}': must be between 0 and 100")]
    InvalidCategoryWeight { code: String, percent: u32 },
    #[error("Duplicate income category code '{0}'")]
    DuplicateCategoryCode(String),
    /// A ledger write failed; `applied` were written before it, `not_attempted`
    /// were never tried
    #[error("Failed to record income allocation: {reason}")]
    PersistenceFailure {
        applied: Vec<AllocationLine>,
        failed: AllocationLine,
        not_attempted: Vec<AllocationLine>,
        reason: String,
    },
    #[error("Failed to load income categories: {0}")]
    Storage(anyhow::Error),
}
