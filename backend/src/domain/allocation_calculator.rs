//! Income allocation calculator.
//!
//! Splits an income amount across a [`CategoryWeights`] snapshot. The
//! calculator is a pure function of its inputs: no storage access, no clock,
//! so it can be called repeatedly and concurrently.
//!
//! ## Rounding policy
//!
//! Each line is `amount * percent / 100` rounded half-up to the currency's
//! minor unit. The lines are then reconciled against the expected total,
//! `amount * total_percent / 100` rounded the same way:
//!
//! - with a total of 100% the lines always sum to exactly `amount`;
//! - with any other total the lines sum to the rounded expected total, which
//!   is within one minor unit of the exact value.
//!
//! The remainder goes to the last line (in position order) that has a
//! non-zero percent. If the lines overshoot, the excess is taken back from the
//! end, never pushing a line below zero.

use tracing::debug;

use crate::domain::category_weights::CategoryWeights;
use crate::domain::models::allocation::{AllocationError, AllocationLine, CalculationResult};
use crate::domain::models::money::{Currency, Money};

/// Default upper bound for a single income amount, in major units
pub const DEFAULT_MAX_AMOUNT: f64 = 10_000_000.0;

#[derive(Debug, Clone)]
pub struct AllocationCalculator {
    currency: Currency,
    max_amount: f64,
}

impl AllocationCalculator {
    pub fn new(currency: Currency, max_amount: f64) -> Self {
        Self {
            currency,
            max_amount,
        }
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn max_amount(&self) -> f64 {
        self.max_amount
    }

    /// Check an incoming amount and convert it to minor units.
    ///
    /// Rejects zero, negative and non-finite amounts, amounts above the
    /// configured maximum, and amounts that round to zero minor units.
    pub fn validate_amount(&self, amount: f64) -> Result<Money, AllocationError> {
        if !amount.is_finite() || amount <= 0.0 || amount > self.max_amount {
            return Err(AllocationError::InvalidAmount(amount));
        }
        self.currency
            .to_minor(amount)
            .filter(Money::is_positive)
            .ok_or(AllocationError::InvalidAmount(amount))
    }

    /// Validate `amount` and split it across `weights`
    pub fn calculate(
        &self,
        amount: f64,
        weights: &CategoryWeights,
    ) -> Result<CalculationResult, AllocationError> {
        let amount = self.validate_amount(amount)?;
        Ok(self.allocate(amount, weights))
    }

    /// Split an already validated amount across `weights`
    pub fn allocate(&self, amount: Money, weights: &CategoryWeights) -> CalculationResult {
        let total_percent = weights.total_percent();

        let mut allocations: Vec<AllocationLine> = weights
            .categories()
            .iter()
            .map(|category| AllocationLine {
                code: category.code.clone(),
                title: category.title.clone(),
                percent: category.percent,
                amount: amount.percent_of(category.percent),
            })
            .collect();

        let expected_total = amount.percent_of(total_percent);
        reconcile(&mut allocations, expected_total);

        debug!(
            "Allocated {} across {} categories ({}%)",
            self.currency.format(amount),
            allocations.len(),
            total_percent
        );

        CalculationResult {
            amount,
            allocations,
            total_percent,
        }
    }
}

/// Adjust `lines` so that their amounts sum to `expected_total`
fn reconcile(lines: &mut [AllocationLine], expected_total: Money) {
    let allocated: Money = lines.iter().map(|line| line.amount).sum();
    let mut drift = expected_total.minor() - allocated.minor();

    if drift > 0 {
        if let Some(last) = lines.iter_mut().rev().find(|line| line.percent > 0) {
            last.amount += Money::from_minor(drift);
        }
        return;
    }

    for line in lines.iter_mut().rev().filter(|line| line.percent > 0) {
        if drift == 0 {
            break;
        }
        let take = line.amount.minor().min(-drift);
        line.amount -= Money::from_minor(take);
        drift += take;
    }
}
