//! Commits an income allocation to the ledger.
//!
//! The confirmer never accepts a pre-computed allocation from the caller. It
//! re-runs the calculator against the snapshot it is handed (which the service
//! loads fresh from the category store) and writes one posting per non-zero
//! line, in position order.
//!
//! ## Failure policy
//!
//! Writes are not transactional. The first failing write stops the loop and
//! the returned [`AllocationError::PersistenceFailure`] lists the lines that
//! were written, the line that failed and the lines never attempted. Nothing
//! is retried or rolled back.
//!
//! Confirming is not idempotent: every call gets its own batch id, so two
//! identical calls produce two sets of postings.

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::allocation_calculator::AllocationCalculator;
use crate::domain::category_weights::CategoryWeights;
use crate::domain::models::allocation::{AllocationError, ConfirmationResult};
use crate::domain::models::ledger::LedgerPosting;
use crate::storage::LedgerStorage;

#[derive(Clone)]
pub struct AllocationConfirmer<L: LedgerStorage> {
    calculator: AllocationCalculator,
    ledger: L,
}

impl<L: LedgerStorage> AllocationConfirmer<L> {
    pub fn new(calculator: AllocationCalculator, ledger: L) -> Self {
        Self { calculator, ledger }
    }

    pub async fn confirm(
        &self,
        user_id: i64,
        amount: f64,
        weights: &CategoryWeights,
    ) -> Result<ConfirmationResult, AllocationError> {
        let amount = self.calculator.validate_amount(amount)?;
        if weights.is_empty() {
            return Err(AllocationError::NoCategoriesConfigured);
        }

        let calculation = self.calculator.allocate(amount, weights);
        let batch_id = Uuid::new_v4().to_string();
        let posted_at = Utc::now().to_rfc3339();

        let mut pending = calculation
            .allocations
            .into_iter()
            .filter(|line| !line.amount.is_zero());
        let mut applied = Vec::new();

        while let Some(line) = pending.next() {
            let posting = LedgerPosting::new(user_id, &line.code, line.amount, &posted_at, &batch_id);
            if let Err(e) = self.ledger.record_income_allocation(&posting).await {
                let not_attempted: Vec<_> = pending.collect();
                error!(
                    "Ledger write failed for user {} category '{}' in batch {}: {} ({} applied, {} not attempted)",
                    user_id,
                    line.code,
                    batch_id,
                    e,
                    applied.len(),
                    not_attempted.len()
                );
                return Err(AllocationError::PersistenceFailure {
                    applied,
                    failed: line,
                    not_attempted,
                    reason: e.to_string(),
                });
            }
            applied.push(line);
        }

        info!(
            "Confirmed {} for user {}: {} postings in batch {}",
            self.calculator.currency().format(amount),
            user_id,
            applied.len(),
            batch_id
        );

        Ok(ConfirmationResult {
            batch_id,
            posted_at,
            amount,
            total_percent: calculation.total_percent,
            applied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation_calculator::DEFAULT_MAX_AMOUNT;
    use crate::domain::category_weights::test_support::categories;
    use crate::domain::models::ledger::CategoryTotal;
    use crate::domain::models::money::{Currency, Money};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// In-memory ledger that can be told to fail on the n-th write
    #[derive(Clone, Default)]
    struct MockLedger {
        postings: Arc<Mutex<Vec<LedgerPosting>>>,
        attempts: Arc<Mutex<usize>>,
        fail_on: Option<usize>,
    }

    impl MockLedger {
        fn failing_on(index: usize) -> Self {
            Self {
                fail_on: Some(index),
                ..Default::default()
            }
        }

        fn postings(&self) -> Vec<LedgerPosting> {
            self.postings.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LedgerStorage for MockLedger {
        async fn record_income_allocation(&self, posting: &LedgerPosting) -> anyhow::Result<()> {
            let attempt = {
                let mut attempts = self.attempts.lock().unwrap();
                *attempts += 1;
                *attempts - 1
            };
            if self.fail_on == Some(attempt) {
                anyhow::bail!("disk full");
            }
            self.postings.lock().unwrap().push(posting.clone());
            Ok(())
        }

        async fn list_postings(&self, _user_id: i64, _limit: Option<u32>) -> anyhow::Result<Vec<LedgerPosting>> {
            Ok(self.postings())
        }

        async fn category_totals(&self, _user_id: i64) -> anyhow::Result<Vec<CategoryTotal>> {
            Ok(Vec::new())
        }
    }

    fn confirmer(ledger: MockLedger) -> AllocationConfirmer<MockLedger> {
        let calculator = AllocationCalculator::new(Currency::default(), DEFAULT_MAX_AMOUNT);
        AllocationConfirmer::new(calculator, ledger)
    }

    fn weights(input: &[(&str, u32)]) -> CategoryWeights {
        CategoryWeights::new(categories(input)).unwrap()
    }

    #[tokio::test]
    async fn test_confirm_writes_one_posting_per_line() {
        let ledger = MockLedger::default();
        let result = confirmer(ledger.clone())
            .confirm(42, 1000.0, &weights(&[("save", 60), ("spend", 40)]))
            .await
            .unwrap();

        assert_eq!(result.applied.len(), 2);
        assert_eq!(result.amount, Money::from_minor(100_000));
        assert_eq!(result.total_percent, 100);

        let postings = ledger.postings();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].category_code, "save");
        assert_eq!(postings[0].amount, Money::from_minor(60_000));
        assert_eq!(postings[1].category_code, "spend");
        assert_eq!(postings[1].amount, Money::from_minor(40_000));
        assert!(postings.iter().all(|p| p.user_id == 42));
        assert!(postings.iter().all(|p| p.batch_id == result.batch_id));
        assert!(postings.iter().all(|p| p.posted_at == result.posted_at));
    }

    #[tokio::test]
    async fn test_confirm_without_categories_writes_nothing() {
        let ledger = MockLedger::default();
        let result = confirmer(ledger.clone())
            .confirm(42, 100.0, &CategoryWeights::default())
            .await;

        assert!(matches!(result, Err(AllocationError::NoCategoriesConfigured)));
        assert!(ledger.postings().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_amount_is_checked_before_categories() {
        let ledger = MockLedger::default();
        let result = confirmer(ledger.clone())
            .confirm(42, -5.0, &CategoryWeights::default())
            .await;

        assert!(matches!(result, Err(AllocationError::InvalidAmount(_))));
        assert!(ledger.postings().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_twice_creates_two_batches() {
        let ledger = MockLedger::default();
        let confirmer = confirmer(ledger.clone());
        let weights = weights(&[("save", 60), ("spend", 40)]);

        let first = confirmer.confirm(42, 1000.0, &weights).await.unwrap();
        let second = confirmer.confirm(42, 1000.0, &weights).await.unwrap();

        assert_ne!(first.batch_id, second.batch_id);
        assert_eq!(ledger.postings().len(), 4);
        let total: Money = ledger.postings().iter().map(|p| p.amount).sum();
        assert_eq!(total, Money::from_minor(200_000));
    }

    #[tokio::test]
    async fn test_zero_lines_are_not_persisted() {
        let ledger = MockLedger::default();
        let result = confirmer(ledger.clone())
            .confirm(42, 100.0, &weights(&[("save", 100), ("fun", 0)]))
            .await
            .unwrap();

        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.applied[0].code, "save");
        assert_eq!(ledger.postings().len(), 1);
    }

    #[tokio::test]
    async fn test_all_zero_lines_confirm_with_nothing_applied() {
        let ledger = MockLedger::default();
        let result = confirmer(ledger.clone())
            .confirm(42, 100.0, &weights(&[("a", 0), ("b", 0)]))
            .await
            .unwrap();

        assert!(result.applied.is_empty());
        assert!(ledger.postings().is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_reports_applied_and_pending_lines() {
        let ledger = MockLedger::failing_on(1);
        let result = confirmer(ledger.clone())
            .confirm(42, 100.0, &weights(&[("a", 20), ("b", 30), ("c", 50)]))
            .await;

        match result {
            Err(AllocationError::PersistenceFailure {
                applied,
                failed,
                not_attempted,
                reason,
            }) => {
                assert_eq!(applied.len(), 1);
                assert_eq!(applied[0].code, "a");
                assert_eq!(failed.code, "b");
                assert_eq!(failed.amount, Money::from_minor(3_000));
                assert_eq!(not_attempted.len(), 1);
                assert_eq!(not_attempted[0].code, "c");
                assert_eq!(reason, "disk full");
            }
            other => panic!("expected persistence failure, got {:?}", other),
        }

        // Only the first line reached the ledger
        let postings = ledger.postings();
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].category_code, "a");
    }

    #[tokio::test]
    async fn test_failure_on_first_write_applies_nothing() {
        let ledger = MockLedger::failing_on(0);
        let result = confirmer(ledger.clone())
            .confirm(42, 100.0, &weights(&[("a", 60), ("b", 40)]))
            .await;

        match result {
            Err(AllocationError::PersistenceFailure {
                applied,
                failed,
                not_attempted,
                ..
            }) => {
                assert!(applied.is_empty());
                assert_eq!(failed.code, "a");
                assert_eq!(not_attempted.len(), 1);
            }
            other => panic!("expected persistence failure, got {:?}", other),
        }
        assert!(ledger.postings().is_empty());
    }
}
