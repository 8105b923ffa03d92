//! Savings goals attached to income categories.
//!
//! A goal is keyed by category code rather than id, like ledger postings, so
//! it survives the category being deactivated. A goal of zero means "no goal".

use super::money::Money;

#[derive(Debug, Clone, PartialEq)]
pub struct SavingsGoal {
    pub user_id: i64,
    pub category_code: String,
    pub goal: Money,
    pub purpose: String,
    pub updated_at: String, // RFC 3339 timestamp
}

impl SavingsGoal {
    pub const MAX_PURPOSE_CHARS: usize = 64;

    /// Trim and check a goal purpose; an empty purpose is allowed
    pub fn validate_purpose(purpose: &str) -> Result<String, GoalValidationError> {
        let trimmed = purpose.trim();
        let chars = trimmed.chars().count();
        if chars > Self::MAX_PURPOSE_CHARS {
            return Err(GoalValidationError::PurposeTooLong(chars));
        }
        Ok(trimmed.to_string())
    }
}

/// Percent of `goal` covered by `current`, capped at 100. Zero without a goal.
pub fn goal_progress(current: Money, goal: Money) -> u32 {
    if !goal.is_positive() || current.minor() <= 0 {
        return 0;
    }
    let percent = current.minor() as i128 * 100 / goal.minor() as i128;
    percent.min(100) as u32
}

pub fn goal_reached(current: Money, goal: Money) -> bool {
    goal.is_positive() && current >= goal
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GoalValidationError {
    #[error("Invalid goal {0}: must be a finite number, zero or greater, within the allowed maximum")]
    InvalidGoal(f64),
    #[error("Purpose must be at most 64 characters, got {0}")]
    PurposeTooLong(usize),
}
