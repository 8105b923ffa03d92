//! Income service domain logic.
//!
//! Orchestrates the allocation engine for a single user: loads the user's
//! current categories from the category store, builds a [`CategoryWeights`]
//! snapshot and hands it to the calculator or the confirmer. Also serves the
//! read side of the ledger (postings and per-category balances) and the
//! savings goals shown next to those balances.
//!
//! ## Business Rules
//!
//! - Categories are read fresh on every call; nothing is cached between
//!   a calculate and the following confirm
//! - The amount is validated before the category store is touched
//! - Balances are keyed by category code so deactivated categories keep
//!   their history
//! - Goals can only be set on active categories; a goal of zero clears it

use anyhow::Result;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::allocation_calculator::AllocationCalculator;
use crate::domain::allocation_confirmer::AllocationConfirmer;
use crate::domain::category_weights::CategoryWeights;
use crate::domain::commands::income::{
    CalculateAllocationCommand, ConfirmAllocationCommand, ConfirmAllocationResult,
    ListPostingsQuery, ResetSavingsGoalsResult, SetSavingsGoalCommand,
};
use crate::domain::models::allocation::{AllocationError, CalculationResult};
use crate::domain::models::ledger::{CategoryBalance, LedgerPosting};
use crate::domain::models::money::{Currency, Money};
use crate::domain::models::savings_goal::{GoalValidationError, SavingsGoal};
use crate::storage::{Connection, IncomeCategoryStorage, LedgerStorage, SavingsGoalStorage};

#[derive(Debug, thiserror::Error)]
pub enum SavingsGoalError {
    #[error(transparent)]
    Validation(#[from] GoalValidationError),
    #[error("Income category '{0}' not found")]
    CategoryNotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Service for calculating and confirming income allocations
#[derive(Clone)]
pub struct IncomeService<C: Connection> {
    category_repository: C::IncomeCategoryRepository,
    ledger_repository: C::LedgerRepository,
    goal_repository: C::SavingsGoalRepository,
    calculator: AllocationCalculator,
    confirmer: AllocationConfirmer<C::LedgerRepository>,
}

impl<C: Connection> IncomeService<C> {
    pub fn new(connection: Arc<C>, calculator: AllocationCalculator) -> Self {
        let category_repository = connection.create_income_category_repository();
        let ledger_repository = connection.create_ledger_repository();
        let goal_repository = connection.create_savings_goal_repository();
        let confirmer = AllocationConfirmer::new(calculator.clone(), ledger_repository.clone());
        Self {
            category_repository,
            ledger_repository,
            goal_repository,
            calculator,
            confirmer,
        }
    }

    pub fn currency(&self) -> &Currency {
        self.calculator.currency()
    }

    /// Preview how `amount` would be split across the user's categories
    pub async fn calculate(
        &self,
        command: CalculateAllocationCommand,
    ) -> Result<CalculationResult, AllocationError> {
        let amount = self.calculator.validate_amount(command.amount)?;
        let weights = self.load_weights(command.user_id).await?;

        if !weights.is_empty() && !weights.is_balanced() {
            warn!(
                "User {} categories add up to {}%, allocation will not cover the full amount",
                command.user_id,
                weights.total_percent()
            );
        }

        Ok(self.calculator.allocate(amount, &weights))
    }

    /// Split `amount` across the user's categories and record it in the ledger.
    ///
    /// On success also reports the confirmed categories whose savings goal is
    /// now reached.
    pub async fn confirm(
        &self,
        command: ConfirmAllocationCommand,
    ) -> Result<ConfirmAllocationResult, AllocationError> {
        info!("Confirming income allocation for user {}", command.user_id);

        self.calculator.validate_amount(command.amount)?;
        let weights = self.load_weights(command.user_id).await?;
        let confirmation = self
            .confirmer
            .confirm(command.user_id, command.amount, &weights)
            .await?;

        // The postings are already written, so a failed lookup only loses the goal report
        let reached_goals = match self.list_balances(command.user_id).await {
            Ok(balances) => balances
                .into_iter()
                .filter(|b| b.goal_reached)
                .filter(|b| confirmation.applied.iter().any(|line| line.code == b.code))
                .collect(),
            Err(e) => {
                warn!("Could not check savings goals for user {}: {}", command.user_id, e);
                Vec::new()
            }
        };

        for balance in &reached_goals {
            info!(
                "User {} reached savings goal for category '{}'",
                command.user_id, balance.code
            );
        }

        Ok(ConfirmAllocationResult {
            confirmation,
            reached_goals,
        })
    }

    /// Per-category totals of everything confirmed so far, with savings goals.
    ///
    /// Categories with a goal but no postings yet are listed with a zero amount.
    pub async fn list_balances(&self, user_id: i64) -> Result<Vec<CategoryBalance>> {
        let totals = self.ledger_repository.category_totals(user_id).await?;
        let goals: HashMap<String, SavingsGoal> = self
            .goal_repository
            .list_savings_goals(user_id)
            .await?
            .into_iter()
            .map(|g| (g.category_code.clone(), g))
            .collect();
        let titles: HashMap<String, String> = self
            .category_repository
            .list_all_income_categories(user_id)
            .await?
            .into_iter()
            .map(|c| (c.code, c.title))
            .collect();

        let mut amounts: BTreeMap<String, (Money, u32)> = totals
            .into_iter()
            .map(|total| (total.category_code, (total.amount, total.postings)))
            .collect();
        for goal in goals.values().filter(|g| g.goal.is_positive()) {
            amounts
                .entry(goal.category_code.clone())
                .or_insert((Money::zero(), 0));
        }

        let balances = amounts
            .into_iter()
            .map(|(code, (amount, postings))| {
                let title = titles.get(&code).cloned().unwrap_or_else(|| code.clone());
                let goal = goals.get(&code);
                CategoryBalance::new(code, title, amount, postings, goal)
            })
            .collect();

        Ok(balances)
    }

    pub async fn list_postings(&self, query: ListPostingsQuery) -> Result<Vec<LedgerPosting>> {
        self.ledger_repository
            .list_postings(query.user_id, query.limit)
            .await
    }

    /// Set or replace the savings goal of an active category
    pub async fn set_goal(
        &self,
        command: SetSavingsGoalCommand,
    ) -> Result<CategoryBalance, SavingsGoalError> {
        info!(
            "Setting savings goal for user {} category '{}': {}",
            command.user_id, command.category_code, command.goal
        );

        let goal = self.validate_goal(command.goal)?;
        let purpose = SavingsGoal::validate_purpose(&command.purpose)?;

        let category = self
            .category_repository
            .list_income_categories(command.user_id)
            .await?
            .into_iter()
            .find(|c| c.code == command.category_code)
            .ok_or_else(|| SavingsGoalError::CategoryNotFound(command.category_code.clone()))?;

        let savings_goal = SavingsGoal {
            user_id: command.user_id,
            category_code: category.code.clone(),
            goal,
            purpose,
            updated_at: Utc::now().to_rfc3339(),
        };
        self.goal_repository.upsert_savings_goal(&savings_goal).await?;

        let (amount, postings) = self
            .ledger_repository
            .category_totals(command.user_id)
            .await?
            .into_iter()
            .find(|t| t.category_code == category.code)
            .map(|t| (t.amount, t.postings))
            .unwrap_or((Money::zero(), 0));

        Ok(CategoryBalance::new(
            category.code,
            category.title,
            amount,
            postings,
            Some(&savings_goal),
        ))
    }

    /// Clear every savings goal of the user
    pub async fn reset_goals(&self, user_id: i64) -> Result<ResetSavingsGoalsResult, SavingsGoalError> {
        let reset_count = self.goal_repository.reset_savings_goals(user_id).await?;
        info!("Reset {} savings goals for user {}", reset_count, user_id);

        Ok(ResetSavingsGoalsResult {
            reset_count,
            success_message: format!("Reset {} savings goals", reset_count),
        })
    }

    fn validate_goal(&self, goal: f64) -> Result<Money, GoalValidationError> {
        if !goal.is_finite() || goal < 0.0 || goal > self.calculator.max_amount() {
            return Err(GoalValidationError::InvalidGoal(goal));
        }
        self.currency()
            .to_minor(goal)
            .ok_or(GoalValidationError::InvalidGoal(goal))
    }

    async fn load_weights(&self, user_id: i64) -> Result<CategoryWeights, AllocationError> {
        let categories = self
            .category_repository
            .list_income_categories(user_id)
            .await
            .map_err(AllocationError::Storage)?;
        CategoryWeights::new(categories)
    }
}
