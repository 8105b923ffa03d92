//! Read-only snapshot of a user's income categories.
//!
//! The allocation engine never looks at the category store directly; callers
//! load the categories once per request and hand the engine a
//! `CategoryWeights`. Building the snapshot validates it and fixes the line
//! order, so a calculation is fully determined by the snapshot and the amount.

use std::collections::HashSet;

use crate::domain::models::allocation::AllocationError;
use crate::domain::models::income_category::IncomeCategory;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryWeights {
    categories: Vec<IncomeCategory>,
}

impl CategoryWeights {
    /// Build a snapshot from the given categories.
    ///
    /// Inactive categories are dropped. The rest are ordered by position, then
    /// id. Fails if a percent is above 100 or a code appears twice. The sum of
    /// percents is deliberately not checked.
    pub fn new(categories: Vec<IncomeCategory>) -> Result<Self, AllocationError> {
        let mut categories: Vec<IncomeCategory> =
            categories.into_iter().filter(|c| c.is_active).collect();

        {
            let mut seen = HashSet::with_capacity(categories.len());
            for category in &categories {
                if category.percent > IncomeCategory::MAX_PERCENT {
                    return Err(AllocationError::InvalidCategoryWeight {
                        code: category.code.clone(),
                        percent: category.percent,
                    });
                }
                if !seen.insert(category.code.as_str()) {
                    return Err(AllocationError::DuplicateCategoryCode(category.code.clone()));
                }
            }
        }

        categories.sort_by_key(|c| (c.position, c.id));
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[IncomeCategory] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Raw sum of all percents; may be above or below 100
    pub fn total_percent(&self) -> u32 {
        self.categories.iter().map(|c| c.percent).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total_percent() == 100
    }
}
