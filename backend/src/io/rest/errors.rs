//! Translation of domain errors into HTTP responses.
//!
//! Every error body is `{ "error": "<message>" }`, except a failed confirm,
//! which answers with a full `ConfirmResponse` (built in `income_apis`).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};

use crate::domain::income_category_service::CategoryServiceError;
use crate::domain::income_service::SavingsGoalError;
use crate::domain::models::allocation::AllocationError;
use shared::ErrorResponse;

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn allocation_status(err: &AllocationError) -> StatusCode {
    match err {
        AllocationError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        AllocationError::NoCategoriesConfigured
        | AllocationError::InvalidCategoryWeight { .. }
        | AllocationError::DuplicateCategoryCode(_) => StatusCode::CONFLICT,
        AllocationError::PersistenceFailure { .. } | AllocationError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Plain error response for anything other than a persistence failure
pub fn allocation_error_response(err: &AllocationError) -> Response {
    let status = allocation_status(err);
    if status.is_server_error() {
        error!("Income allocation failed: {}", err);
        return error_response(status, "Internal error while processing income");
    }
    warn!("Rejected income request: {}", err);
    error_response(status, err.to_string())
}

pub fn category_error_response(err: &CategoryServiceError) -> Response {
    let status = match err {
        CategoryServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        CategoryServiceError::CategoryNotFound(_) => StatusCode::NOT_FOUND,
        CategoryServiceError::LastCategory => StatusCode::CONFLICT,
        CategoryServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("Income category operation failed: {}", err);
        return error_response(status, "Internal error while updating categories");
    }
    warn!("Rejected income category request: {}", err);
    error_response(status, err.to_string())
}

pub fn goal_error_response(err: &SavingsGoalError) -> Response {
    let status = match err {
        SavingsGoalError::Validation(_) => StatusCode::BAD_REQUEST,
        SavingsGoalError::CategoryNotFound(_) => StatusCode::NOT_FOUND,
        SavingsGoalError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("Savings goal operation failed: {}", err);
        return error_response(status, "Internal error while updating savings goals");
    }
    warn!("Rejected savings goal request: {}", err);
    error_response(status, err.to_string())
}
