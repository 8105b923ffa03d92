use shared::{
    CategoryBalance as CategoryBalanceDto, CategoryBalancesResponse, LedgerPosting as LedgerPostingDto,
    LedgerPostingListResponse,
};

use crate::domain::models::ledger::{CategoryBalance, LedgerPosting};
use crate::domain::models::money::Currency;

pub struct LedgerMapper;

impl LedgerMapper {
    pub fn to_balance_dto(domain: CategoryBalance, currency: &Currency) -> CategoryBalanceDto {
        CategoryBalanceDto {
            code: domain.code,
            title: domain.title,
            amount: currency.to_major(domain.amount),
            postings: domain.postings,
            goal: currency.to_major(domain.goal),
            purpose: domain.purpose,
            progress: domain.progress,
            goal_reached: domain.goal_reached,
        }
    }

    pub fn to_balances_response(balances: Vec<CategoryBalance>, currency: &Currency) -> CategoryBalancesResponse {
        CategoryBalancesResponse {
            balances: balances
                .into_iter()
                .map(|balance| Self::to_balance_dto(balance, currency))
                .collect(),
        }
    }

    pub fn to_posting_dto(domain: LedgerPosting, currency: &Currency) -> LedgerPostingDto {
        LedgerPostingDto {
            id: domain.id,
            category_code: domain.category_code,
            amount: currency.to_major(domain.amount),
            posted_at: domain.posted_at,
            batch_id: domain.batch_id,
        }
    }

    pub fn to_postings_response(postings: Vec<LedgerPosting>, currency: &Currency) -> LedgerPostingListResponse {
        LedgerPostingListResponse {
            postings: postings
                .into_iter()
                .map(|posting| Self::to_posting_dto(posting, currency))
                .collect(),
        }
    }
}
