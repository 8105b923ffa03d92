//! Income category management.
//!
//! Owns writes to the category store. The allocation engine only ever reads
//! categories, so everything that changes them goes through this service.
//!
//! ## Business Rules
//!
//! - Titles are trimmed and must be 1-32 characters
//! - Percents are whole numbers from 0 to 100; new categories default to 0
//! - The sum of percents is not enforced; results report it so callers can warn
//! - Deleting deactivates, and the last active category cannot be removed

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::categories::{
    CreateIncomeCategoryCommand, DeleteIncomeCategoryCommand, DeleteIncomeCategoryResult,
    IncomeCategoryListResult, IncomeCategoryResult, UpdateIncomeCategoryCommand,
};
use crate::domain::models::income_category::{CategoryValidationError, IncomeCategory};
use crate::storage::{Connection, IncomeCategoryStorage};

#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    #[error(transparent)]
    Validation(#[from] CategoryValidationError),
    #[error("Income category {0} not found")]
    CategoryNotFound(i64),
    #[error("Cannot delete the last income category")]
    LastCategory,
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Service for managing a user's income categories
#[derive(Clone)]
pub struct IncomeCategoryService<C: Connection> {
    category_repository: C::IncomeCategoryRepository,
}

impl<C: Connection> IncomeCategoryService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            category_repository: connection.create_income_category_repository(),
        }
    }

    pub async fn list_categories(&self, user_id: i64) -> Result<IncomeCategoryListResult, CategoryServiceError> {
        let categories = self.category_repository.list_income_categories(user_id).await?;
        let total_percent = categories.iter().map(|c| c.percent).sum();
        Ok(IncomeCategoryListResult {
            categories,
            total_percent,
        })
    }

    pub async fn create_category(
        &self,
        command: CreateIncomeCategoryCommand,
    ) -> Result<IncomeCategoryResult, CategoryServiceError> {
        info!("Creating income category for user {}: {:?}", command.user_id, command.title);

        let title = IncomeCategory::validate_title(&command.title)?;
        let percent = IncomeCategory::validate_percent(command.percent.unwrap_or(0))?;
        let position = self.category_repository.next_position(command.user_id).await?;
        let now = Utc::now().to_rfc3339();

        let mut category = IncomeCategory {
            id: 0,
            user_id: command.user_id,
            code: IncomeCategory::generate_code(),
            title,
            percent,
            position,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        };
        category.id = self.category_repository.store_income_category(&category).await?;

        let total_percent = self.total_percent(command.user_id).await?;
        Ok(IncomeCategoryResult {
            success_message: format!("Category '{}' created", category.title),
            category,
            total_percent,
        })
    }

    pub async fn update_category(
        &self,
        command: UpdateIncomeCategoryCommand,
    ) -> Result<IncomeCategoryResult, CategoryServiceError> {
        info!("Updating income category {} for user {}", command.category_id, command.user_id);

        let mut category = self
            .category_repository
            .get_income_category(command.user_id, command.category_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or(CategoryServiceError::CategoryNotFound(command.category_id))?;

        if let Some(title) = &command.title {
            category.title = IncomeCategory::validate_title(title)?;
        }
        if let Some(percent) = command.percent {
            category.percent = IncomeCategory::validate_percent(percent)?;
        }
        if let Some(position) = command.position {
            category.position = position;
        }
        category.updated_at = Utc::now().to_rfc3339();

        self.category_repository.update_income_category(&category).await?;

        let total_percent = self.total_percent(command.user_id).await?;
        Ok(IncomeCategoryResult {
            success_message: format!("Category '{}' updated", category.title),
            category,
            total_percent,
        })
    }

    pub async fn delete_category(
        &self,
        command: DeleteIncomeCategoryCommand,
    ) -> Result<DeleteIncomeCategoryResult, CategoryServiceError> {
        info!("Deleting income category {} for user {}", command.category_id, command.user_id);

        let active = self.category_repository.list_income_categories(command.user_id).await?;
        if !active.iter().any(|c| c.id == command.category_id) {
            return Err(CategoryServiceError::CategoryNotFound(command.category_id));
        }
        if active.len() == 1 {
            return Err(CategoryServiceError::LastCategory);
        }

        if !self
            .category_repository
            .deactivate_income_category(command.user_id, command.category_id)
            .await?
        {
            return Err(CategoryServiceError::CategoryNotFound(command.category_id));
        }

        let total_percent = self.total_percent(command.user_id).await?;
        Ok(DeleteIncomeCategoryResult {
            deleted_id: command.category_id,
            total_percent,
            success_message: "Category deleted".to_string(),
        })
    }

    async fn total_percent(&self, user_id: i64) -> Result<u32, CategoryServiceError> {
        let total: u32 = self
            .category_repository
            .list_income_categories(user_id)
            .await?
            .iter()
            .map(|c| c.percent)
            .sum();
        if total != 100 {
            warn!("Income categories for user {} add up to {}%", user_id, total);
        }
        Ok(total)
    }
}
