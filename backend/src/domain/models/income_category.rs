//! Domain model for an income category.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeCategory {
    pub id: i64,
    pub user_id: i64,
    pub code: String,
    pub title: String,
    pub percent: u32,
    pub position: i64,
    pub is_active: bool,
    pub created_at: String, // RFC 3339 timestamp
    pub updated_at: String, // RFC 3339 timestamp
}

impl IncomeCategory {
    pub const MAX_TITLE_CHARS: usize = 32;
    pub const MAX_PERCENT: u32 = 100;

    /// Generate a short stable code for a new category, e.g. `inc_3f9a1c2e`
    pub fn generate_code() -> String {
        let id = Uuid::new_v4().simple().to_string();
        format!("inc_{}", &id[..8])
    }

    /// Trim and check a category title, returning the cleaned value
    pub fn validate_title(title: &str) -> Result<String, CategoryValidationError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(CategoryValidationError::EmptyTitle);
        }
        let chars = trimmed.chars().count();
        if chars > Self::MAX_TITLE_CHARS {
            return Err(CategoryValidationError::TitleTooLong(chars));
        }
        Ok(trimmed.to_string())
    }

    pub fn validate_percent(percent: u32) -> Result<u32, CategoryValidationError> {
        if percent > Self::MAX_PERCENT {
            return Err(CategoryValidationError::PercentOutOfRange(percent));
        }
        Ok(percent)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CategoryValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Title must be at most 32 characters, got {0}")]
    TitleTooLong(usize),
    #[error("Invalid percent {0}: must be between 0 and 100")]
    PercentOutOfRange(u32),
}
