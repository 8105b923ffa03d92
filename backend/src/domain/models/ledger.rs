//! Domain models for ledger postings.
use uuid::Uuid;

use super::money::Money;
use super::savings_goal::{goal_progress, goal_reached, SavingsGoal};

/// A confirmed allocation amount booked against a category
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerPosting {
    pub id: String,
    pub user_id: i64,
    pub category_code: String,
    pub amount: Money,
    pub posted_at: String, // RFC 3339 timestamp
    /// Shared by every posting written by the same confirm call
    pub batch_id: String,
}

impl LedgerPosting {
    pub fn new(user_id: i64, category_code: &str, amount: Money, posted_at: &str, batch_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            category_code: category_code.to_string(),
            amount,
            posted_at: posted_at.to_string(),
            batch_id: batch_id.to_string(),
        }
    }
}

/// Aggregated postings for one category code
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category_code: String,
    pub amount: Money,
    pub postings: u32,
}

/// A category total joined with the category's current title and savings goal
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBalance {
    pub code: String,
    pub title: String,
    pub amount: Money,
    pub postings: u32,
    /// Zero when no goal is set
    pub goal: Money,
    pub purpose: String,
    /// Percent of the goal saved so far, 0-100
    pub progress: u32,
    pub goal_reached: bool,
}

impl CategoryBalance {
    pub fn new(code: String, title: String, amount: Money, postings: u32, goal: Option<&SavingsGoal>) -> Self {
        let (goal, purpose) = goal
            .map(|g| (g.goal, g.purpose.clone()))
            .unwrap_or_default();
        Self {
            progress: goal_progress(amount, goal),
            goal_reached: goal_reached(amount, goal),
            code,
            title,
            amount,
            postings,
            goal,
            purpose,
        }
    }
}
