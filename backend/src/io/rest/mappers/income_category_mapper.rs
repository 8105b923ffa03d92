use shared::{
    DeleteIncomeCategoryResponse, IncomeCategory as IncomeCategoryDto, IncomeCategoryListResponse,
    IncomeCategoryResponse,
};

use crate::domain::commands::categories::{
    DeleteIncomeCategoryResult, IncomeCategoryListResult, IncomeCategoryResult,
};
use crate::domain::models::income_category::IncomeCategory;

pub struct IncomeCategoryMapper;

impl IncomeCategoryMapper {
    /// Convert a domain category to the wire DTO; ownership and audit fields stay internal
    pub fn to_dto(domain: IncomeCategory) -> IncomeCategoryDto {
        IncomeCategoryDto {
            id: domain.id,
            code: domain.code,
            title: domain.title,
            percent: domain.percent,
            position: domain.position,
        }
    }

    pub fn to_list_response(result: IncomeCategoryListResult) -> IncomeCategoryListResponse {
        IncomeCategoryListResponse {
            categories: result.categories.into_iter().map(Self::to_dto).collect(),
            total_percent: result.total_percent,
        }
    }

    pub fn to_response(result: IncomeCategoryResult) -> IncomeCategoryResponse {
        IncomeCategoryResponse {
            category: Self::to_dto(result.category),
            total_percent: result.total_percent,
            success_message: result.success_message,
        }
    }

    pub fn to_delete_response(result: DeleteIncomeCategoryResult) -> DeleteIncomeCategoryResponse {
        DeleteIncomeCategoryResponse {
            deleted_id: result.deleted_id,
            total_percent: result.total_percent,
            success_message: result.success_message,
        }
    }
}
