use shared::{AllocationItem, CalculateResponse, ConfirmResponse};

use super::ledger_mapper::LedgerMapper;
use crate::domain::commands::income::ConfirmAllocationResult;
use crate::domain::models::allocation::{AllocationLine, CalculationResult};
use crate::domain::models::money::Currency;

pub struct AllocationMapper;

impl AllocationMapper {
    /// Convert a domain allocation line to the wire item, amounts in major units
    pub fn to_item(line: &AllocationLine, currency: &Currency) -> AllocationItem {
        AllocationItem {
            code: line.code.clone(),
            title: line.title.clone(),
            percent: line.percent,
            amount: currency.to_major(line.amount),
        }
    }

    pub fn to_items(lines: &[AllocationLine], currency: &Currency) -> Vec<AllocationItem> {
        lines.iter().map(|line| Self::to_item(line, currency)).collect()
    }

    pub fn to_calculate_response(result: &CalculationResult, currency: &Currency) -> CalculateResponse {
        CalculateResponse {
            amount: currency.to_major(result.amount),
            allocations: Self::to_items(&result.allocations, currency),
            total_percent: result.total_percent,
        }
    }

    pub fn to_confirm_response(result: ConfirmAllocationResult, currency: &Currency) -> ConfirmResponse {
        ConfirmResponse {
            ok: true,
            applied: Self::to_items(&result.confirmation.applied, currency),
            failed: None,
            not_attempted: Vec::new(),
            error: None,
            reached_goals: result
                .reached_goals
                .into_iter()
                .map(|balance| LedgerMapper::to_balance_dto(balance, currency))
                .collect(),
        }
    }

    /// Response for a confirm that stopped part way through
    pub fn to_failed_confirm_response(
        applied: &[AllocationLine],
        failed: &AllocationLine,
        not_attempted: &[AllocationLine],
        message: String,
        currency: &Currency,
    ) -> ConfirmResponse {
        ConfirmResponse {
            ok: false,
            applied: Self::to_items(applied, currency),
            failed: Some(Self::to_item(failed, currency)),
            not_attempted: Self::to_items(not_attempted, currency),
            error: Some(message),
            reached_goals: Vec::new(),
        }
    }
}
